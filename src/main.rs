// Copyright (c) 2026 rezky_nightky

mod canvas;
mod cell;
mod charset;
mod column;
mod config;
mod engine;
mod error;
mod frame;
mod layer;
mod logging;
mod overlay;
mod palette;
mod random;
mod runtime;
mod surface;
mod terminal;
mod ticker;

use std::env;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::canvas::TerminalCanvas;
use crate::config::{
    color_enabled_stdout, color_mode_label, default_params_usage_for_help, detect_color_mode,
    detect_color_mode_auto, print_help_detail, print_list_charsets, print_list_colors, Args,
    Settings,
};
use crate::error::Result;
use crate::layer::RainLayer;
use crate::overlay::MessageOverlay;
use crate::palette::{terminal_color, TierPalette};
use crate::random::SystemRandom;
use crate::runtime::{ColorMode, ColorScheme};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// How long to block on input while the rain is paused.
const IDLE_POLL: Duration = Duration::from_millis(250);

const SCHEME_KEYS: [ColorScheme; 6] = [
    ColorScheme::Ice,
    ColorScheme::Green,
    ColorScheme::Amber,
    ColorScheme::Red,
    ColorScheme::Purple,
    ColorScheme::Mono,
];

fn build_info() -> String {
    let sha = env!("KANARAIN_GIT_SHA");
    if sha.is_empty() {
        env!("KANARAIN_BUILD").to_string()
    } else {
        format!("{} ({})", env!("KANARAIN_BUILD"), sha)
    }
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let mut argv: Vec<std::ffi::OsString> = env::args_os().collect();
    for arg in argv.iter_mut().skip(1) {
        if arg == "-mB" || arg == "-mb" {
            *arg = "--message-no-border".into();
        }
    }

    let matches = cmd.get_matches_from(argv);
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn print_bitcolor(args: &Args) -> Result<()> {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let auto = detect_color_mode_auto();
    let effective = detect_color_mode(args)?;

    println!("BITCOLOR CHECK:");
    println!(
        "  COLORTERM: {}",
        if colorterm.is_empty() {
            "(unset)"
        } else {
            &colorterm
        }
    );
    println!(
        "  TERM: {}",
        if term.is_empty() { "(unset)" } else { &term }
    );
    println!("  auto_detected: {}", color_mode_label(auto));
    if args.colormode.is_some() {
        println!("  forced: {}", color_mode_label(effective));
    }
    println!("  effective: {}", color_mode_label(effective));
    Ok(())
}

/// Foreground and background for the message box.
fn overlay_colors(
    mode: ColorMode,
    palette: &TierPalette,
    default_background: bool,
) -> (
    Option<crossterm::style::Color>,
    Option<crossterm::style::Color>,
) {
    let bg = if default_background {
        None
    } else {
        terminal_color(mode, palette.background)
    };
    (terminal_color(mode, palette.head), bg)
}

enum KeyAction {
    Quit,
    TogglePause,
    Reseed,
    Scheme(ColorScheme),
    None,
}

fn key_action(code: KeyCode, modifiers: KeyModifiers, screensaver: bool) -> KeyAction {
    if screensaver {
        return KeyAction::Quit;
    }
    match (code, modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => KeyAction::Quit,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Char('p'), _) => KeyAction::TogglePause,
        (KeyCode::Char(' '), _) => KeyAction::Reseed,
        (KeyCode::Char(d @ '1'..='6'), _) => {
            let ix = d as usize - '1' as usize;
            KeyAction::Scheme(SCHEME_KEYS[ix])
        }
        _ => KeyAction::None,
    }
}

fn run() -> Result<()> {
    let args = parse_args();

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        return print_bitcolor(&args);
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let settings = Settings::from_args(&args)?;
    logging::init(args.log_file.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        color_mode = color_mode_label(settings.color_mode),
        glyphs = settings.glyphs.len(),
        span = settings.span,
        "starting"
    );

    let mut term = Terminal::new()?;
    let (cols, rows) = term.size()?;

    let canvas = TerminalCanvas::new(
        settings.color_mode,
        settings.engine.cell_width_px,
        settings.engine.cell_height_px,
        settings.span,
        settings.default_background,
    );
    let viewport = canvas.viewport_for(cols, rows);
    let rng = match settings.seed {
        Some(seed) => SystemRandom::seeded(seed),
        None => SystemRandom::from_entropy(),
    };

    let mut palette = TierPalette::for_scheme(settings.color_scheme);
    let mut layer = RainLayer::mount(
        Some(canvas),
        viewport,
        settings.engine,
        settings.glyphs.clone(),
        palette,
        rng,
        settings.interval,
        Instant::now(),
    );

    debug!(active = layer.is_active(), "rain layer ready");

    let mut overlay = settings.message.as_ref().map(|(text, border)| {
        let mut o = MessageOverlay::new(text, *border, settings.span);
        o.layout(cols, rows);
        o
    });

    let end_time = settings.duration.map(|d| Instant::now() + d);
    let mut dirty = false;

    'run: loop {
        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            debug!("duration elapsed");
            break;
        }

        let mut timeout = layer.time_until_tick(now).unwrap_or(IDLE_POLL);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }

        if Terminal::poll_event(timeout)? {
            // Drain everything queued so a burst of resizes costs one reseed.
            let mut pending_resize: Option<(u16, u16)> = None;
            loop {
                match Terminal::read_event()? {
                    Event::Resize(w, h) => pending_resize = Some((w, h)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        match key_action(k.code, k.modifiers, settings.screensaver) {
                            KeyAction::Quit => break 'run,
                            KeyAction::TogglePause => {
                                layer.toggle_pause(Instant::now());
                                debug!(running = layer.is_running(), "pause toggled");
                            }
                            KeyAction::Reseed => {
                                layer.reseed();
                                dirty = true;
                            }
                            KeyAction::Scheme(scheme) => {
                                palette = TierPalette::for_scheme(scheme);
                                layer.set_palette(palette);
                                debug!(?scheme, "color scheme changed");
                            }
                            KeyAction::None => {}
                        }
                    }
                    _ => {}
                }
                if !Terminal::poll_event(Duration::ZERO)? {
                    break;
                }
            }

            if let Some((w, h)) = pending_resize {
                if let Some(vp) = layer.canvas_mut().map(|c| c.viewport_for(w, h)) {
                    layer.handle_resize(vp);
                }
                if let Some(o) = overlay.as_mut() {
                    o.layout(w, h);
                }
                dirty = true;
            }
        }

        if layer.pump(Instant::now()) || dirty {
            dirty = false;
            let (fg, bg) =
                overlay_colors(settings.color_mode, &palette, settings.default_background);
            if let Some(canvas) = layer.canvas_mut() {
                if let Some(o) = overlay.as_ref().filter(|o| o.is_visible()) {
                    o.draw(canvas.frame_mut(), fg, bg);
                }
                term.draw(canvas.frame())?;
            }
        }
    }

    layer.teardown();
    drop(term);
    info!("exiting");
    Ok(())
}

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            restore_terminal_best_effort();
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_pick_schemes_in_order() {
        let pick = |c| match key_action(KeyCode::Char(c), KeyModifiers::NONE, false) {
            KeyAction::Scheme(s) => Some(s),
            _ => None,
        };
        assert_eq!(pick('1'), Some(ColorScheme::Ice));
        assert_eq!(pick('6'), Some(ColorScheme::Mono));
        assert_eq!(pick('7'), None);
    }

    #[test]
    fn screensaver_quits_on_any_key() {
        assert!(matches!(
            key_action(KeyCode::Char('p'), KeyModifiers::NONE, true),
            KeyAction::Quit
        ));
        assert!(matches!(
            key_action(KeyCode::Char('p'), KeyModifiers::NONE, false),
            KeyAction::TogglePause
        ));
        assert!(matches!(
            key_action(KeyCode::Char('c'), KeyModifiers::CONTROL, false),
            KeyAction::Quit
        ));
    }
}

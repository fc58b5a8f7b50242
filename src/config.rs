// Copyright (c) 2026 rezky_nightky

use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::charset::{build_chars, charset_from_str, glyph_span, user_ranges};
use crate::engine::{EngineSettings, DEFAULT_CELL_PX, DEFAULT_RESET_THRESHOLD};
use crate::error::RainError;
use crate::palette::parse_color_scheme;
use crate::runtime::{ColorMode, ColorScheme, ResizePolicy};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  kanarain --interval-ms 50 --cell-width 14 --cell-height 14 --reset-threshold 0.975 --opacity 1 --color ice --color-bg black --charset kana --resize-policy reinit";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  kanarain") {
            out.push_str("  \x1b[1;34mkanarain\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "kanarain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'i',
        long = "interval-ms",
        default_value_t = 50,
        help_heading = "TIMING",
        help = "Milliseconds between ticks (min 5 max 1000)"
    )]
    pub interval_ms: u64,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "cell-width",
        default_value_t = DEFAULT_CELL_PX,
        help_heading = "GEOMETRY",
        help = "Glyph cell width in pixels (min 1 max 256)"
    )]
    pub cell_width: u32,

    #[arg(
        long = "cell-height",
        default_value_t = DEFAULT_CELL_PX,
        help_heading = "GEOMETRY",
        help = "Glyph cell height in pixels (min 1 max 256)"
    )]
    pub cell_height: u32,

    #[arg(
        short = 'F',
        long = "fullwidth",
        help_heading = "GEOMETRY",
        help = "Give every glyph two terminal columns (auto for wide charsets)"
    )]
    pub fullwidth: bool,

    #[arg(
        long = "resize-policy",
        default_value_t = ResizePolicy::Reinit,
        value_enum,
        help_heading = "GEOMETRY",
        help = "On resize: reinit reseeds all columns, preserve keeps them"
    )]
    pub resize_policy: ResizePolicy,

    #[arg(
        long = "reset-threshold",
        default_value_t = DEFAULT_RESET_THRESHOLD,
        help_heading = "RAIN",
        help = "Exited columns restart once a random draw exceeds this (min 0 max 1)"
    )]
    pub reset_threshold: f64,

    #[arg(
        long = "seed",
        help_heading = "RAIN",
        help = "Seed the random source (debugging aid)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'o',
        long = "opacity",
        default_value_t = 1.0,
        help_heading = "APPEARANCE",
        help = "Layer opacity (min 0 max 1)"
    )]
    pub opacity: f64,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "ice",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: auto-detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "charset",
        default_value = "kana",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Extra glyph ranges as hex codepoint pairs, e.g. 30,39"
    )]
    pub chars: Option<String>,

    #[arg(
        short = 'm',
        long = "message",
        help_heading = "GENERAL",
        help = "Message drawn in front of the rain"
    )]
    pub message: Option<String>,

    #[arg(
        long = "message-no-border",
        help_heading = "GENERAL",
        help = "Draw message box without border (use with --message)"
    )]
    pub message_no_border: bool,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Append tracing output to this file (filter with KANARAIN_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help, limits and value lists, then exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(long = "info", help_heading = "HELP", help = "Print version info and exit")]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// Everything the run loop needs, validated.
#[derive(Clone, Debug)]
pub struct Settings {
    pub engine: EngineSettings,
    pub interval: Duration,
    pub duration: Option<Duration>,
    pub color_mode: ColorMode,
    pub color_scheme: ColorScheme,
    pub default_background: bool,
    pub glyphs: Vec<char>,
    pub span: u16,
    pub seed: Option<u64>,
    pub message: Option<(String, bool)>,
    pub screensaver: bool,
}

fn require_range<T: PartialOrd + Display + Copy>(
    name: &'static str,
    v: T,
    min: T,
    max: T,
) -> Result<T, RainError> {
    if v < min || v > max {
        return Err(RainError::InvalidSetting {
            name,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

fn require_f64_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64, RainError> {
    if !v.is_finite() {
        return Err(RainError::NonFinite { name, value: v });
    }
    require_range(name, v, min, max)
}

pub fn default_to_ascii() -> bool {
    let lang = std::env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

pub fn color_mode_from_flag(m: u16) -> Result<ColorMode, RainError> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        other => Err(RainError::ColorMode(other)),
    }
}

pub fn detect_color_mode(args: &Args) -> Result<ColorMode, RainError> {
    match args.colormode {
        Some(m) => color_mode_from_flag(m),
        None => Ok(detect_color_mode_auto()),
    }
}

pub fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, RainError> {
        let interval_ms = require_range("--interval-ms", args.interval_ms, 5, 1000)?;
        let cell_width_px = require_range("--cell-width", args.cell_width, 1, 256)?;
        let cell_height_px = require_range("--cell-height", args.cell_height, 1, 256)?;
        let reset_threshold =
            require_f64_range("--reset-threshold", args.reset_threshold, 0.0, 1.0)?;
        let layer_opacity = require_f64_range("--opacity", args.opacity, 0.0, 1.0)?;

        let duration = match args.duration {
            Some(s) if !s.is_finite() => {
                return Err(RainError::NonFinite {
                    name: "--duration",
                    value: s,
                })
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        let ascii = default_to_ascii();
        let ranges = match &args.chars {
            Some(spec) => user_ranges(spec)?,
            None => Vec::new(),
        };
        let charset = charset_from_str(&args.charset, ascii)?;
        let glyphs = build_chars(charset, &ranges, ascii);
        let span = if args.fullwidth { 2 } else { glyph_span(&glyphs) };

        Ok(Self {
            engine: EngineSettings {
                cell_width_px,
                cell_height_px,
                reset_threshold,
                layer_opacity,
                resize_policy: args.resize_policy,
            },
            interval: Duration::from_millis(interval_ms),
            duration,
            color_mode: detect_color_mode(args)?,
            color_scheme: parse_color_scheme(&args.color)?,
            default_background: args.color_bg == ColorBg::DefaultBackground,
            glyphs,
            span,
            seed: args.seed,
            message: args
                .message
                .as_ref()
                .map(|m| (m.clone(), !args.message_no_border)),
            screensaver: args.screensaver,
        })
    }
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("auto         Auto-select (ascii when LANG is not UTF-8, otherwise kana)");
    println!("kana         Hiragana + katakana + kanji numerals (alias: nihongo)");
    println!("hiragana     Hiragana");
    println!("katakana     Katakana (full width)");
    println!("kanji        Kanji numerals and common ideographs");
    println!("matrix       Letters + digits + half-width katakana");
    println!("halfwidth    Half-width katakana");
    println!("ascii        Letters + digits + punctuation");
    println!("english      Letters only");
    println!("digits       Digits only (aliases: dec, decimal)");
    println!("binary       0 and 1 (aliases: bin, 01)");
    println!("hex          0-9 and A-F (alias: hexadecimal)");
    println!("greek        Greek");
    println!("cyrillic     Cyrillic");
    println!("symbols      Math/technical symbols");
    println!("blocks       Block elements");
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("ice          Cyan head over blue tiers (aliases: cyan, blue)");
    println!("green        Green theme (alias: matrix)");
    println!("amber        Amber theme (alias: gold)");
    println!("red          Red theme");
    println!("purple       Purple theme (alias: violet)");
    println!("mono         Grayscale theme (aliases: gray, grey)");
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  kanarain [OPTIONS]\n\nKEYS:\n  q, Esc    quit\n  p         pause / resume\n  space     reseed every column\n  1-6       ice, green, amber, red, purple, mono\n\nLIMITS / VALID RANGES:\n",
        DEFAULT_PARAMS_USAGE
    );
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }
    println!("  --interval-ms <ms>         min 5 max 1000");
    println!("  --duration <seconds>       min 0.1 max 86400 (<=0 disables)");
    println!("  --cell-width <px>          min 1 max 256");
    println!("  --cell-height <px>         min 1 max 256");
    println!("  --reset-threshold <p>      min 0 max 1");
    println!("  --opacity <a>              min 0 max 1");
    println!("  --colormode <0|16|8|24>    allowed values only (8==256, 24==32)");
    println!();
    print_list_charsets();
    println!();
    print_list_colors();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["kanarain"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_the_ice_kana_rain() {
        let s = Settings::from_args(&parse(&["--colormode", "24", "--charset", "kana"])).unwrap();
        assert_eq!(s.interval, Duration::from_millis(50));
        assert_eq!(s.engine.cell_width_px, 14);
        assert_eq!(s.engine.cell_height_px, 14);
        assert_eq!(s.engine.reset_threshold, 0.975);
        assert_eq!(s.engine.layer_opacity, 1.0);
        assert_eq!(s.engine.resize_policy, ResizePolicy::Reinit);
        assert_eq!(s.color_scheme, ColorScheme::Ice);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.span, 2);
        assert!(s.duration.is_none());
        assert!(s.message.is_none());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let e = Settings::from_args(&parse(&["--interval-ms", "2"])).unwrap_err();
        assert!(matches!(e, RainError::InvalidSetting { name: "--interval-ms", .. }));
        let e = Settings::from_args(&parse(&["--reset-threshold", "1.5"])).unwrap_err();
        assert!(matches!(e, RainError::InvalidSetting { .. }));
        let e = Settings::from_args(&parse(&["--opacity", "NaN"])).unwrap_err();
        assert!(matches!(e, RainError::NonFinite { .. }));
    }

    #[test]
    fn bad_names_are_rejected() {
        assert!(matches!(
            Settings::from_args(&parse(&["--color", "plaid"])),
            Err(RainError::ColorScheme(_))
        ));
        assert!(matches!(
            Settings::from_args(&parse(&["--charset", "klingon"])),
            Err(RainError::Charset(_))
        ));
        assert!(matches!(
            Settings::from_args(&parse(&["--colormode", "7"])),
            Err(RainError::ColorMode(7))
        ));
    }

    #[test]
    fn narrow_charset_uses_single_columns_unless_forced() {
        let s = Settings::from_args(&parse(&["--charset", "binary"])).unwrap();
        assert_eq!(s.span, 1);
        let s = Settings::from_args(&parse(&["--charset", "binary", "-F"])).unwrap();
        assert_eq!(s.span, 2);
    }

    #[test]
    fn resize_policy_and_message_flags() {
        let s = Settings::from_args(&parse(&[
            "--resize-policy",
            "preserve",
            "-m",
            "hello",
            "--message-no-border",
            "--duration",
            "0",
        ]))
        .unwrap();
        assert_eq!(s.engine.resize_policy, ResizePolicy::Preserve);
        assert_eq!(s.message, Some(("hello".to_string(), false)));
        assert!(s.duration.is_none());
    }

    #[test]
    fn colormode_aliases() {
        assert_eq!(color_mode_from_flag(8).unwrap(), ColorMode::Color256);
        assert_eq!(color_mode_from_flag(256).unwrap(), ColorMode::Color256);
        assert_eq!(color_mode_from_flag(32).unwrap(), ColorMode::TrueColor);
        assert_eq!(color_mode_from_flag(0).unwrap(), ColorMode::Mono);
    }
}

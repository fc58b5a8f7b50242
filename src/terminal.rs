// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::frame::Frame;

/// What is currently on screen, so only changed cells get written.
struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank_with_bg(None); width as usize * height as usize],
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Option<LastFrame>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let size_changed = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);
        if size_changed {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = None;
        }
        let full = self.last.is_none();
        let last = self
            .last
            .get_or_insert_with(|| LastFrame::new(frame.width, frame.height));

        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_bg: Option<Option<Color>> = None;
        let mut cur_bold = false;
        let mut cur_pos: Option<(u16, u16)> = None;

        for y in 0..frame.height {
            let mut x = 0u16;
            while x < frame.width {
                let idx = y as usize * frame.width as usize + x as usize;
                let cell = frame.cell_at_index(idx);
                let w = cell.ch.width().unwrap_or(1).clamp(1, 2) as u16;

                if full || last.cells[idx] != cell {
                    last.cells[idx] = cell;

                    if cur_pos != Some((x, y)) {
                        self.stdout.queue(cursor::MoveTo(x, y))?;
                    }
                    if cur_fg != Some(cell.fg) {
                        self.stdout
                            .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                        cur_fg = Some(cell.fg);
                    }
                    if cur_bg != Some(cell.bg) {
                        self.stdout
                            .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                        cur_bg = Some(cell.bg);
                    }
                    if cell.bold != cur_bold {
                        self.stdout.queue(SetAttribute(if cell.bold {
                            Attribute::Bold
                        } else {
                            Attribute::NormalIntensity
                        }))?;
                        cur_bold = cell.bold;
                    }
                    self.stdout.queue(Print(cell.ch))?;

                    let next_x = x.saturating_add(w);
                    cur_pos = (next_x < frame.width).then_some((next_x, y));
                }

                // A wide glyph covers the next cell; keep its shadow in sync.
                if w == 2 && x + 1 < frame.width {
                    let shadow = idx + 1;
                    last.cells[shadow] = frame.cell_at_index(shadow);
                }
                x = x.saturating_add(w);
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

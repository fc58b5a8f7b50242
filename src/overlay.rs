// Copyright (c) 2026 rezky_nightky

//! Foreground message box drawn over the rain after every tick.

use crossterm::style::Color;

use crate::cell::Cell;
use crate::frame::Frame;

const PAD_X: u16 = 2;
const PAD_Y: u16 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
struct MsgChr {
    line: u16,
    col: u16,
    val: char,
}

#[derive(Clone, Debug)]
pub struct MessageOverlay {
    text: String,
    border: bool,
    span: u16,
    chars: Vec<MsgChr>,
}

impl MessageOverlay {
    /// `span` is the terminal width of one rain glyph; the box starts on a
    /// glyph boundary so no wide glyph straddles its left edge.
    pub fn new(text: &str, border: bool, span: u16) -> Self {
        Self {
            text: text.to_string(),
            border,
            span: span.max(1),
            chars: Vec::new(),
        }
    }

    /// Lays the box out centred on a `cols` x `lines` grid.
    pub fn layout(&mut self, cols: u16, lines: u16) {
        self.chars.clear();

        let border: u16 = if self.border { 1 } else { 0 };
        let frame_w = 2 * border + 2 * PAD_X;
        let frame_h = 2 * border + 2 * PAD_Y;
        if cols <= frame_w || lines <= frame_h {
            return;
        }

        let max_content_w = cols - frame_w;
        let max_content_h = lines - frame_h;

        let mut content_lines: Vec<Vec<char>> = Vec::new();
        'outer: for raw_line in self.text.split('\n') {
            let chars: Vec<char> = raw_line.chars().collect();
            if chars.is_empty() {
                if content_lines.len() as u16 >= max_content_h {
                    break;
                }
                content_lines.push(Vec::new());
                continue;
            }
            for chunk in chars.chunks(max_content_w as usize) {
                if content_lines.len() as u16 >= max_content_h {
                    break 'outer;
                }
                content_lines.push(chunk.to_vec());
            }
        }
        if content_lines.is_empty() {
            content_lines.push(Vec::new());
        }

        let content_w = content_lines
            .iter()
            .map(|l| l.len() as u16)
            .max()
            .unwrap_or(1)
            .max(1);
        let content_h = content_lines.len() as u16;

        let box_w = content_w + frame_w;
        let box_h = content_h + frame_h;
        let start_col = (cols / 2 - box_w / 2) / self.span * self.span;
        let start_line = lines / 2 - box_h / 2;

        for y in 0..box_h {
            for x in 0..box_w {
                let mut ch = ' ';
                if border == 1 {
                    let edge_y = y == 0 || y + 1 == box_h;
                    let edge_x = x == 0 || x + 1 == box_w;
                    ch = match (edge_y, edge_x) {
                        (true, true) => '+',
                        (true, false) => '-',
                        (false, true) => '|',
                        (false, false) => ' ',
                    };
                }

                let top = border + PAD_Y;
                let left = border + PAD_X;
                if (top..top + content_h).contains(&y) && (left..left + content_w).contains(&x) {
                    let line_chars = &content_lines[(y - top) as usize];
                    let left_pad = (content_w as usize - line_chars.len()) / 2;
                    let ix = (x - left) as usize;
                    if ix >= left_pad && ix < left_pad + line_chars.len() {
                        ch = line_chars[ix - left_pad];
                    }
                }

                self.chars.push(MsgChr {
                    line: start_line + y,
                    col: start_col + x,
                    val: ch,
                });
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, fg: Option<Color>, bg: Option<Color>) {
        for mc in &self.chars {
            let blank = mc.val == ' ';
            frame.set(
                mc.col,
                mc.line,
                Cell {
                    ch: mc.val,
                    fg: if blank { None } else { fg },
                    bg,
                    bold: !blank,
                },
            );
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.chars.is_empty()
    }
}

//! Terminal render sink.
//!
//! Draws the eye as a small box of cells with crossterm. Like a diff
//! renderer, it composes the whole eye into rows and only writes rows that
//! changed since the previous frame.
//!
//! ```text
//! .-----------.
//! |===========|   <- eyelid rows
//! |     @     |   <- pupil, moved by the gaze
//! |           |
//! '-----------'
//! ```

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use super::{RenderSink, VisualClasses};
use crate::constants::{DEFAULT_EYE_CLAMP_X, DEFAULT_EYE_CLAMP_Y};
use crate::types::{EyelidState, MascotState, MascotView};

const MIN_WIDTH: u16 = 7;
const MIN_HEIGHT: u16 = 5;

/// One composed frame of the eye.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    rows: Vec<String>,
    color: Color,
}

pub struct TerminalSink<W: Write> {
    out: W,
    origin: (u16, u16),
    size: (u16, u16),
    range: (f64, f64),
    view: MascotView,
    thinking_offset: Option<f64>,
    previous: Option<Frame>,
}

impl<W: Write> TerminalSink<W> {
    /// Eye of `width x height` cells with its top-left corner at `origin`.
    pub fn new(out: W, origin: (u16, u16), width: u16, height: u16) -> Self {
        Self {
            out,
            origin,
            size: (width.max(MIN_WIDTH), height.max(MIN_HEIGHT)),
            range: (DEFAULT_EYE_CLAMP_X, DEFAULT_EYE_CLAMP_Y),
            view: MascotView::default(),
            thinking_offset: None,
            previous: None,
        }
    }

    /// Gaze range that maps to the inner edge of the eye.
    pub fn with_range(mut self, x: f64, y: f64) -> Self {
        self.range = (x.max(f64::EPSILON), y.max(f64::EPSILON));
        self
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Current composed rows, top to bottom.
    pub fn rows(&self) -> Vec<String> {
        self.compose().rows
    }

    /// Force the next frame to redraw every row.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn compose(&self) -> Frame {
        let (width, height) = (self.size.0 as usize, self.size.1 as usize);
        let inner_w = width - 2;
        let inner_h = height - 2;
        let classes = VisualClasses::from_view(&self.view);

        let mut interior = vec![vec![' '; inner_w]; inner_h];

        let (lid_top, lid_bottom) = lid_rows(self.view.eyelid_state, inner_h);
        let closed = matches!(
            self.view.eyelid_state,
            EyelidState::Closed | EyelidState::Blinking
        );

        if closed {
            interior[inner_h / 2].fill('-');
        } else {
            for row in interior.iter_mut().take(lid_top) {
                row.fill('=');
            }
            for row in interior.iter_mut().skip(inner_h - lid_bottom) {
                row.fill('=');
            }

            let gaze_x = self.view.position.x + self.thinking_offset.unwrap_or(0.0);
            let col = project(gaze_x, self.range.0, inner_w);
            let row = project(self.view.position.y, self.range.1, inner_h);
            if row >= lid_top && row < inner_h - lid_bottom {
                interior[row][col] = pupil_glyph(self.view.state);
            }
        }

        let mut rows = Vec::with_capacity(height);
        rows.push(format!(".{}.", "-".repeat(inner_w)));
        for line in interior {
            rows.push(format!("|{}|", line.into_iter().collect::<String>()));
        }
        rows.push(format!("'{}'", "-".repeat(inner_w)));

        let color = if classes.contains(VisualClasses::REDDENED) {
            Color::Red
        } else if classes.contains(VisualClasses::ALERT) {
            Color::Yellow
        } else {
            Color::Reset
        };

        Frame { rows, color }
    }

    fn draw(&mut self) -> io::Result<()> {
        let frame = self.compose();
        let (x, y) = self.origin;

        for (i, row) in frame.rows.iter().enumerate() {
            let unchanged = self
                .previous
                .as_ref()
                .is_some_and(|prev| prev.color == frame.color && prev.rows.get(i) == Some(row));
            if unchanged {
                continue;
            }
            queue!(
                self.out,
                MoveTo(x, y + i as u16),
                SetForegroundColor(frame.color),
                Print(row),
                ResetColor
            )?;
        }

        self.out.flush()?;
        self.previous = Some(frame);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        let (x, y) = self.origin;
        let blank = " ".repeat(self.size.0 as usize);
        for i in 0..self.size.1 {
            queue!(self.out, MoveTo(x, y + i), Print(&blank))?;
        }
        self.out.flush()?;
        self.previous = None;
        Ok(())
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, view: &MascotView) {
        self.view = *view;
        if let Err(err) = self.draw() {
            log::warn!("terminal render failed: {err}");
        }
    }

    fn set_thinking_offset(&mut self, offset: Option<f64>) {
        self.thinking_offset = offset;
        if let Err(err) = self.draw() {
            log::warn!("terminal render failed: {err}");
        }
    }

    fn detach(&mut self) {
        if let Err(err) = self.clear() {
            log::warn!("terminal clear failed: {err}");
        }
    }
}

/// Rows covered by the upper and lower lid.
fn lid_rows(eyelid: EyelidState, inner_h: usize) -> (usize, usize) {
    let third = inner_h.div_ceil(3);
    match eyelid {
        EyelidState::Squinting => (third, third),
        EyelidState::SquintingLight => ((inner_h / 4).max(1), 0),
        EyelidState::Thinking => (third, 0),
        _ => (0, 0),
    }
}

/// Map a gaze coordinate in `[-range, range]` onto `0..cells`.
fn project(value: f64, range: f64, cells: usize) -> usize {
    let half = (cells as f64 - 1.0) / 2.0;
    let t = (value / range).clamp(-1.0, 1.0);
    (half + t * half).round().clamp(0.0, cells as f64 - 1.0) as usize
}

fn pupil_glyph(state: MascotState) -> char {
    match state {
        MascotState::Neutral => '@',
        MascotState::Alert => 'O',
        MascotState::Relaxed => 'o',
        MascotState::Poke => 'x',
        MascotState::Thinking => '*',
    }
}

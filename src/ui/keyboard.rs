use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use keybored::keyboard::{KeyPos, KeyboardState, ROWS};

use super::theme::Palette;

/// Rows needed to draw the keyboard, without a border
pub const KEYBOARD_HEIGHT: u16 = 5;

pub struct KeyboardView<'a> {
    state: &'a KeyboardState,
    now: Instant,
    palette: Palette,
    highlight: bool,
    bordered: bool,
}

impl<'a> KeyboardView<'a> {
    pub fn new(state: &'a KeyboardState, now: Instant, palette: Palette) -> Self {
        Self {
            state,
            now,
            palette,
            highlight: true,
            bordered: false,
        }
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    fn row_line(&self, row: usize) -> Line<'static> {
        let spans = ROWS[row]
            .iter()
            .enumerate()
            .flat_map(|(col, cap)| {
                let lit = self.highlight && self.state.is_lit(KeyPos { row, col }, self.now);
                let style = if lit {
                    self.palette.key_lit
                } else {
                    self.palette.key
                };
                [
                    Span::styled(
                        format!("{:^width$}", cap.label, width = cap.width as usize),
                        style,
                    ),
                    Span::raw(" "),
                ]
            })
            .collect::<Vec<Span>>();
        Line::from(spans)
    }
}

impl Widget for KeyboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = if self.bordered {
            Block::default().borders(Borders::ALL)
        } else {
            Block::default()
        };
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = (0..ROWS.len()).map(|row| self.row_line(row)).collect();
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

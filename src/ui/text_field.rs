use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use keybored::score::{self, Letter};
use keybored::session::Session;

use super::theme::Palette;

/// Rows of text shown at once
pub const VISIBLE_LINES: usize = 3;

/// Letters of word `idx` as they should be drawn
pub fn word_letters(session: &Session, idx: usize) -> Vec<(char, Letter)> {
    let Some(target) = session.words().get(idx) else {
        return Vec::new();
    };

    if idx < session.word_index() {
        match session.typed(idx) {
            Some(typed) if typed.is_skipped() => typed
                .display()
                .chars()
                .map(|c| (c, Letter::Incorrect))
                .collect(),
            Some(typed) => score::classify_committed(typed, target),
            None => target.chars().map(|c| (c, Letter::Missing)).collect(),
        }
    } else if idx == session.word_index() && !session.has_finished() {
        score::classify_in_progress(session.input(), target)
    } else {
        target.chars().map(|c| (c, Letter::Pending)).collect()
    }
}

fn letters_width(letters: &[(char, Letter)]) -> usize {
    letters.iter().map(|(c, _)| c.width().unwrap_or(0)).sum()
}

/// Greedy wrap of the given word widths into lines of at most `width` cells,
/// one space between words. A word wider than the line gets a line of its own.
pub fn layout_lines(word_widths: &[usize], width: usize) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (idx, &w) in word_widths.iter().enumerate() {
        let needed = if idx == start { w } else { used + 1 + w };
        if idx > start && needed > width {
            lines.push(start..idx);
            start = idx;
            used = w;
        } else {
            used = needed;
        }
    }
    if start < word_widths.len() {
        lines.push(start..word_widths.len());
    }
    lines
}

/// Window of `rows` lines that keeps the current word on its second line once
/// typing has moved past the first
pub fn visible_window(lines: &[Range<usize>], current_word: usize, rows: usize) -> Range<usize> {
    let current_line = lines
        .iter()
        .position(|line| line.contains(&current_word))
        .unwrap_or_else(|| lines.len().saturating_sub(1));
    let start = current_line
        .saturating_sub(1)
        .min(lines.len().saturating_sub(rows));
    start..(start + rows).min(lines.len())
}

pub struct TextField<'a> {
    session: &'a Session,
    palette: Palette,
    bordered: bool,
}

impl<'a> TextField<'a> {
    pub fn new(session: &'a Session, palette: Palette, bordered: bool) -> Self {
        Self {
            session,
            palette,
            bordered,
        }
    }

    fn style_for(&self, letter: Letter) -> Style {
        match letter {
            Letter::Correct => self.palette.correct,
            Letter::Incorrect => self.palette.incorrect,
            Letter::Excess => self.palette.excess,
            Letter::Missing | Letter::Pending => self.palette.dim,
        }
    }

    fn word_spans(&self, idx: usize, letters: &[(char, Letter)]) -> Vec<Span<'static>> {
        let cursor = (idx == self.session.word_index() && !self.session.has_finished())
            .then(|| self.session.input().chars().count());

        let mut spans: Vec<Span> = letters
            .iter()
            .enumerate()
            .map(|(pos, &(c, letter))| {
                let style = if cursor == Some(pos) {
                    self.palette.cursor
                } else {
                    self.style_for(letter)
                };
                Span::styled(c.to_string(), style)
            })
            .collect();

        // cursor sits on the separator once the word is fully typed
        if cursor.is_some_and(|pos| pos >= letters.len()) {
            spans.push(Span::styled(" ", self.palette.cursor));
        } else {
            spans.push(Span::raw(" "));
        }
        spans
    }
}

impl Widget for TextField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = if self.bordered {
            Block::default().borders(Borders::ALL)
        } else {
            Block::default()
        };
        let inner = block.inner(area);
        block.render(area, buf);

        // keep one cell free for the trailing cursor
        let width = (inner.width as usize).saturating_sub(1).max(1);
        let letters: Vec<Vec<(char, Letter)>> = (0..self.session.words().len())
            .map(|idx| word_letters(self.session, idx))
            .collect();
        let widths: Vec<usize> = letters.iter().map(|l| letters_width(l)).collect();
        let lines = layout_lines(&widths, width);
        let window = visible_window(&lines, self.session.word_index(), VISIBLE_LINES);

        let text: Vec<Line> = lines[window]
            .iter()
            .map(|line| {
                Line::from(
                    line.clone()
                        .flat_map(|idx| self.word_spans(idx, &letters[idx]))
                        .collect::<Vec<Span>>(),
                )
            })
            .collect();

        Paragraph::new(text).render(inner, buf);
    }
}

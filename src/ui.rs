pub mod keyboard;
pub mod scores;
pub mod screen;
pub mod text_field;
pub mod theme;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use keybored::config::Settings;
use keybored::session::{Mode, Session};

use crate::{App, AppState};
use keyboard::{KeyboardView, KEYBOARD_HEIGHT};
use text_field::{TextField, VISIBLE_LINES};
use theme::Palette;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Timer plus whichever live stats are switched on
pub fn stats_line(session: &Session, settings: &Settings) -> String {
    let progress = match session.config().mode {
        Mode::Time => format!("{}s", session.timer()),
        Mode::Words => format!("{}/{}", session.word_index(), session.config().goal),
    };
    let score = session.score();

    let mut parts = vec![progress];
    if settings.game.show_wpm {
        parts.push(format!("{} wpm", score.standard_wpm));
    }
    if settings.game.show_accuracy {
        parts.push(format!("{}% acc", score.accuracy_percent));
    }
    parts.iter().join("   ")
}

pub fn settings_line(settings: &Settings) -> String {
    let config = settings.session_config();
    [
        format!("{} {}", config.mode, config.goal),
        format!("keyboard: {}", on_off(settings.keyboard.visible)),
        format!("highlight: {}", on_off(settings.keyboard.highlight_keys)),
        format!("compact: {}", on_off(settings.ui.compact_mode)),
        format!("theme: {}", settings.theme.mode),
        format!("wpm: {}", on_off(settings.game.show_wpm)),
        format!("acc: {}", on_off(settings.game.show_accuracy)),
    ]
    .iter()
    .join(" | ")
}

fn centered(text: String, style: ratatui::style::Style) -> Paragraph<'static> {
    Paragraph::new(Span::styled(text, style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

impl App {
    fn render_loading(&self, palette: Palette, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        match &self.notice {
            Some(notice) => {
                centered(notice.clone(), palette.incorrect).render(chunks[1], buf);
                centered("(n) try again  (esc) quit".to_string(), palette.dim)
                    .render(chunks[2], buf);
            }
            None => centered("fetching words...".to_string(), palette.dim).render(chunks[1], buf),
        }
    }

    fn render_typing(
        &self,
        session: &Session,
        settings: &Settings,
        palette: Palette,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let compact = settings.ui.compact_mode;
        let border = |on: bool| if on { 2 } else { 0 };
        let text_height = VISIBLE_LINES as u16 + border(settings.text.container);
        let keyboard_height = if settings.keyboard.visible {
            KEYBOARD_HEIGHT + border(settings.keyboard.container)
        } else {
            0
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(if compact { 0 } else { 1 }), // title
                Constraint::Min(0),
                Constraint::Length(1), // stats
                Constraint::Length(1),
                Constraint::Length(text_height),
                Constraint::Length(1),
                Constraint::Length(keyboard_height),
                Constraint::Min(0),
                Constraint::Length(if compact { 0 } else { 1 }), // legend
            ])
            .split(area);

        if !compact {
            let config = session.config();
            centered(format!("keybored · {} {}", config.mode, config.goal), palette.accent)
                .render(chunks[0], buf);
            centered(
                "(tab) new text  (enter) restart  (esc) quit".to_string(),
                palette.dim,
            )
            .render(chunks[8], buf);
        }

        centered(stats_line(session, settings), palette.accent).render(chunks[2], buf);
        TextField::new(session, palette, settings.text.container).render(chunks[4], buf);

        if settings.keyboard.visible {
            KeyboardView::new(&self.keyboard, self.now, palette)
                .highlight(settings.keyboard.highlight_keys)
                .bordered(settings.keyboard.container)
                .render(chunks[6], buf);
        }
    }

    fn render_results(&self, settings: &Settings, palette: Palette, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1), // score
                Constraint::Length(1), // mode and best
                Constraint::Length(1),
                Constraint::Length(1), // settings
                Constraint::Length(1),
                Constraint::Length(3), // legend
                Constraint::Min(0),
            ])
            .split(area);

        if let Some(record) = self.scores.records().last() {
            centered(
                format!("{} wpm   {}% acc", record.wpm, record.accuracy),
                palette.correct,
            )
            .render(chunks[1], buf);

            let best = self
                .scores
                .best_wpm(record.mode, record.goal)
                .unwrap_or(record.wpm);
            centered(
                format!("{} {}   best {} wpm", record.mode, record.goal, best),
                palette.text,
            )
            .render(chunks[2], buf);
        }

        centered(settings_line(settings), palette.dim).render(chunks[4], buf);

        let legend = Paragraph::new(vec![
            Line::from("(r) retry  (n) new  (s) scores  (esc) quit"),
            Line::from(
                "(m) mode  (g) goal  (k) keyboard  (h) highlight  (o) keyboard frame  (f) text frame  (c) compact  (t) theme  (w) wpm  (a) acc  (d) defaults",
            ),
        ])
        .style(palette.dim)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        legend.render(chunks[6], buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let settings = self.effective_settings();
        let palette = Palette::for_mode(settings.theme.mode);

        match (&self.state, &self.driver) {
            (AppState::Typing, Some(driver)) => {
                self.render_typing(driver.session(), &settings, palette, area, buf)
            }
            (AppState::Results | AppState::Scores, _) => {
                self.render_results(&settings, palette, area, buf)
            }
            _ => self.render_loading(palette, area, buf),
        }
    }
}

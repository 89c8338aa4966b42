use ratatui::style::{Color, Modifier, Style};

use keybored::config::ThemeMode;

/// Styles for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Style,
    pub dim: Style,
    pub correct: Style,
    pub incorrect: Style,
    pub excess: Style,
    pub cursor: Style,
    pub accent: Style,
    pub key: Style,
    pub key_lit: Style,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
            ThemeMode::Auto => Self::auto(),
        }
    }

    fn dark() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            correct: bold.fg(Color::Green),
            incorrect: bold.fg(Color::Red),
            excess: bold.fg(Color::Rgb(255, 165, 0)),
            cursor: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
            accent: bold.fg(Color::Cyan),
            key: Style::default().fg(Color::Gray),
            key_lit: Style::default().fg(Color::Black).bg(Color::Cyan),
        }
    }

    fn light() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            correct: bold.fg(Color::Rgb(0, 128, 0)),
            incorrect: bold.fg(Color::Rgb(200, 0, 0)),
            excess: bold.fg(Color::Rgb(200, 110, 0)),
            cursor: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
            accent: bold.fg(Color::Blue),
            key: Style::default().fg(Color::DarkGray),
            key_lit: Style::default().fg(Color::White).bg(Color::Blue),
        }
    }

    /// Follows the terminal's own colours and only relies on modifiers and
    /// the basic ANSI palette
    fn auto() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            text: Style::default(),
            dim: Style::default().add_modifier(Modifier::DIM),
            correct: bold.fg(Color::Green),
            incorrect: bold.fg(Color::Red),
            excess: bold.fg(Color::Yellow),
            cursor: bold.add_modifier(Modifier::DIM | Modifier::UNDERLINED),
            accent: bold.fg(Color::Magenta),
            key: Style::default().add_modifier(Modifier::DIM),
            key_lit: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        }
    }
}

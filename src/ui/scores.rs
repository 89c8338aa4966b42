use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use keybored::scores::ScoreRecord;

use super::theme::Palette;
use crate::App;

/// Pure presenter for a single score row
pub fn present_row(record: &ScoreRecord, palette: &Palette, best: bool) -> Row<'static> {
    let wpm_style = if best { palette.correct } else { palette.text };

    Row::new(vec![
        Cell::from(
            record
                .date
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ),
        Cell::from(record.mode.to_string()),
        Cell::from(record.goal.to_string()),
        Cell::from(record.wpm.to_string()).style(wpm_style),
        Cell::from(format!("{}%", record.accuracy)),
    ])
}

/// Render the score history, newest first
pub fn render_scores(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let palette = Palette::for_mode(app.settings.theme.mode);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Table
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let title = Paragraph::new(format!("Score History ({} sessions)", app.scores.records().len()))
        .block(Block::default().borders(Borders::ALL).title("Scores"))
        .style(palette.accent)
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if app.scores.is_empty() {
        let no_data = Paragraph::new("No scores yet. Finish a session to record one.")
            .alignment(Alignment::Center)
            .style(palette.dim);
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = app.scores.records().len().saturating_sub(table_height);
        if app.scores_scroll > max_scroll {
            app.scores_scroll = max_scroll;
        }

        let header = Row::new(vec!["Date", "Mode", "Goal", "WPM", "Acc"])
            .style(palette.accent.add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = app
            .scores
            .newest_first()
            .skip(app.scores_scroll)
            .take(table_height)
            .map(|record| {
                let best = app.scores.best_wpm(record.mode, record.goal) == Some(record.wpm);
                present_row(record, &palette, best)
            })
            .collect();

        let widths = [
            Constraint::Length(17), // Date
            Constraint::Length(6),  // Mode
            Constraint::Length(5),  // Goal
            Constraint::Length(5),  // WPM
            Constraint::Min(5),     // Acc
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().patch(palette.text))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (b/backspace) back  (n) new  (r) retry  (esc) quit")
        .alignment(Alignment::Center)
        .style(palette.dim)
        .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}

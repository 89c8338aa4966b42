use ratatui::Frame;

use crate::{ui::scores::render_scores, App, AppState};

/// A UI Screen boundary: responsible for rendering one application state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Loading, typing and results share the App widget
pub struct AppScreen;

impl Screen for AppScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Score history screen - uses dedicated renderer
pub struct ScoresScreen;

impl Screen for ScoresScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_scores(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Loading | AppState::Typing | AppState::Results => Box::new(AppScreen),
        AppState::Scores => Box::new(ScoresScreen),
    }
}

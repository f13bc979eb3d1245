use ratatui::Frame;

use crate::{app::AppState, App};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Setup, breathing and completion all draw through the App widget
pub struct SessionScreen;

impl Screen for SessionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        crate::ui::history::render_history(app, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Setup | AppState::Breathing | AppState::Finished => Box::new(SessionScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}

/// Draw whatever the current state needs
pub fn draw(app: &App, f: &mut Frame) {
    current_screen(app.state).render(app, f);
}

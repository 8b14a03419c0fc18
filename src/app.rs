use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use log::debug;
use nrl_api::session::Refresh;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_matches_loaded(&mut self, refresh: Refresh) {
        debug!("{} matches ({:?})", refresh.matches.len(), refresh.source);
        self.state.apply_refresh(refresh);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.apply_error(message);
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

use chrono::{DateTime, Local};
use nrl_api::session::{Refresh, Source};
use nrl_api::{MatchRecord, SeasonState};

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

/// What the renderer reads. Only written from network responses.
#[derive(Debug, Default)]
pub struct AppState {
    /// At least one cycle has finished, successfully or not.
    pub loaded: bool,
    pub show_logs: bool,
    pub matches: Vec<MatchRecord>,
    pub season_state: SeasonState,
    pub source: Option<Source>,
    pub last_updated: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a finished result. The previous list is replaced, never edited.
    pub fn apply_refresh(&mut self, refresh: Refresh) {
        self.loaded = true;
        // Set only when upstream failed and placeholders stood in.
        self.last_error = refresh.last_error;
        self.matches = refresh.matches;
        self.season_state = refresh.season_state;
        self.source = Some(refresh.source);
        self.last_updated = Some(refresh.fetched_at.with_timezone(&Local));
    }

    /// Keep showing the last good list; the error is shown alongside it.
    pub fn apply_error(&mut self, message: String) {
        self.loaded = true;
        self.last_error = Some(message);
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == Some(Source::Fallback)
    }
}

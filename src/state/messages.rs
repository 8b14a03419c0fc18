use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nrl_api::session::Refresh;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    Refresh,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// A finished match list, from upstream or from placeholders.
    MatchesLoaded { refresh: Refresh },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}

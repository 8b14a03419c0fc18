//! Filter, order and cap a normalized match list. Pure functions of
//! (list, config); nothing here does I/O.

use crate::config::{Config, Mode};
use crate::{MatchRecord, MatchStatus, SeasonState};
use std::cmp::Ordering;

/// Mode filter, focus filter, sort, then truncate to `maximum_entries`.
pub fn apply(matches: Vec<MatchRecord>, config: &Config, state: SeasonState) -> Vec<MatchRecord> {
    let mut matches: Vec<MatchRecord> = matches
        .into_iter()
        .filter(|m| mode_allows(config.mode, m.status))
        .filter(|m| in_focus(m, &config.focus_on))
        .collect();
    sort_matches(&mut matches, state);
    matches.truncate(config.maximum_entries);
    matches
}

pub fn mode_allows(mode: Mode, status: MatchStatus) -> bool {
    match mode {
        Mode::All => true,
        Mode::Live => status == MatchStatus::Live,
        Mode::Upcoming => status == MatchStatus::Scheduled,
        Mode::Completed => status == MatchStatus::Completed,
    }
}

/// An empty focus list keeps everything.
pub fn in_focus(m: &MatchRecord, focus_on: &[String]) -> bool {
    focus_on.is_empty() || focus_on.iter().any(|team| m.involves(team))
}

/// Stable sort, so equal keys keep upstream order.
pub fn sort_matches(matches: &mut [MatchRecord], state: SeasonState) {
    matches.sort_by(|a, b| compare(a, b, state));
}

/// During the finals window finals fixtures lead; otherwise live, then
/// upcoming, then results. Within a status, upcoming matches run soonest
/// first and results most recent first.
pub fn compare(a: &MatchRecord, b: &MatchRecord, state: SeasonState) -> Ordering {
    let finals_first = if state == SeasonState::Finals {
        b.is_finals().cmp(&a.is_finals())
    } else {
        Ordering::Equal
    };

    finals_first
        .then_with(|| a.status.rank().cmp(&b.status.rank()))
        .then_with(|| match a.status {
            MatchStatus::Completed => b.kickoff_time.cmp(&a.kickoff_time),
            _ => a.kickoff_time.cmp(&b.kickoff_time),
        })
}

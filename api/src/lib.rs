pub mod client;
pub mod config;
pub mod fallback;
pub mod normalize;
pub mod nrl;
pub mod schedule;
pub mod season;
pub mod session;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the NRL wire format
// ---------------------------------------------------------------------------

/// One match, ready for display. Produced fresh on every refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub home_team: TeamSide,
    pub away_team: TeamSide,
    pub status: MatchStatus,
    pub kickoff_time: DateTime<Utc>,
    /// Presentation label derived from `status` and `kickoff_time`.
    pub display_time: String,
    pub round: String,
    pub venue: String,
    /// Synthetic record from the fallback generator, not upstream data.
    pub placeholder: bool,
}

impl MatchRecord {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// Finals rounds are named ("Grand Final", "Qualifying Final", ...) rather than numbered.
    pub fn is_finals(&self) -> bool {
        let round = self.round.to_lowercase();
        round.contains("final") && !round.starts_with("round")
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team.matches(team) || self.away_team.matches(team)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSide {
    pub name: String,
    pub id: Option<String>,
    pub score: Option<u32>,
    pub ladder_position: Option<u32>,
    pub logo_ref: Option<String>,
}

impl TeamSide {
    /// Case-insensitive name match, or exact id match.
    pub fn matches(&self, team: &str) -> bool {
        let team = team.trim();
        self.name.eq_ignore_ascii_case(team) || self.id.as_deref() == Some(team)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
    Unknown,
}

impl MatchStatus {
    /// Sort rank: live first, then upcoming, then results.
    pub fn rank(&self) -> u8 {
        match self {
            MatchStatus::Live => 0,
            MatchStatus::Scheduled => 1,
            MatchStatus::Completed => 2,
            MatchStatus::Cancelled => 3,
            MatchStatus::Unknown => 4,
        }
    }

    pub fn has_started(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Completed)
    }
}

/// Where in the competition year a date falls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeasonState {
    #[default]
    InSeason,
    Finals,
    OffSeason,
}

impl SeasonState {
    pub fn label(&self) -> &'static str {
        match self {
            SeasonState::InSeason => "In Season",
            SeasonState::Finals => "Finals",
            SeasonState::OffSeason => "Off Season",
        }
    }
}

//! Upstream match entries → [`MatchRecord`].
//!
//! The upstream schema drifts between endpoints and seasons, so every logical
//! attribute is read through a declared priority list of JSON paths. The first
//! path holding a usable value wins.

use crate::client::{ApiError, ApiResult};
use crate::config::{CompletedLabel, Config};
use crate::{MatchRecord, MatchStatus, TeamSide};
use chrono::{DateTime, Days, FixedOffset, NaiveDateTime, Utc};
use log::{debug, warn};
use serde_json::Value;

/// A path into a JSON object, one key per level.
pub type FieldPath = &'static [&'static str];

pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const UNKNOWN_VENUE: &str = "TBA";
pub const UNKNOWN_ROUND: &str = "TBC";

/// Field resolution priority lists, one per logical attribute.
pub mod fields {
    use super::FieldPath;

    pub const HOME_TEAM: &[FieldPath] = &[&["homeTeam"], &["home"], &["teamA"]];
    pub const AWAY_TEAM: &[FieldPath] = &[&["awayTeam"], &["away"], &["teamB"]];

    // Relative to a team object. Nickname before the full name.
    pub const TEAM_NAME: &[FieldPath] =
        &[&["nickName"], &["teamName"], &["name"], &["displayName"], &["shortName"]];
    pub const TEAM_ID: &[FieldPath] = &[&["teamId"], &["id"]];
    pub const TEAM_SCORE: &[FieldPath] = &[&["score"]];
    pub const LADDER_POSITION: &[FieldPath] =
        &[&["ladderPosition"], &["teamPosition"], &["position"]];
    pub const LOGO: &[FieldPath] = &[&["logo"], &["logoUrl"], &["theme", "logo"]];

    // Relative to the match entry.
    pub const HOME_SCORE: &[FieldPath] = &[&["scores", "home"], &["homeScore"]];
    pub const AWAY_SCORE: &[FieldPath] = &[&["scores", "away"], &["awayScore"]];
    pub const STATUS: &[FieldPath] = &[&["gameState"], &["matchState"], &["status"], &["state"]];
    pub const KICKOFF: &[FieldPath] =
        &[&["kickOffDate"], &["clock", "kickOffTimeLong"], &["startTime"], &["date"]];
    pub const ROUND: &[FieldPath] = &[&["roundTitle"], &["roundNumber"], &["round"]];
    pub const VENUE: &[FieldPath] = &[&["venue", "name"], &["venue"], &["venueName"]];
}

/// Upstream status vocabulary, compared with case, spaces and separators removed.
///
/// Anything not listed here (and a missing status) maps to `Scheduled`: an
/// unknown state must never be hidden away as a finished match. A status that
/// is not a string at all maps to `Unknown`.
const STATUS_TABLE: &[(&str, MatchStatus)] = &[
    ("pregame", MatchStatus::Scheduled),
    ("upcoming", MatchStatus::Scheduled),
    ("scheduled", MatchStatus::Scheduled),
    ("postponed", MatchStatus::Scheduled),
    ("inprogress", MatchStatus::Live),
    ("halftime", MatchStatus::Live),
    ("live", MatchStatus::Live),
    ("fulltime", MatchStatus::Completed),
    ("final", MatchStatus::Completed),
    ("postgame", MatchStatus::Completed),
    ("cancelled", MatchStatus::Cancelled),
    ("canceled", MatchStatus::Cancelled),
];

/// Everything the normalizer needs besides the entry itself.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    pub show_scores: bool,
    pub completed_label: CompletedLabel,
}

impl NormalizeContext {
    pub fn new(config: &Config, now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: config.display_offset(now),
            show_scores: config.show_scores,
            completed_label: config.completed_label,
        }
    }
}

/// Normalize a batch. Entries that can't be turned into a record are logged
/// and dropped; the rest keep their upstream order.
pub fn normalize_all(entries: &[Value], ctx: &NormalizeContext) -> Vec<MatchRecord> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match normalize(entry, ctx) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("dropping match entry #{index}: {e}");
                None
            }
        })
        .collect()
}

pub fn normalize(entry: &Value, ctx: &NormalizeContext) -> ApiResult<MatchRecord> {
    if !entry.is_object() {
        return Err(ApiError::RecordShape(format!("expected an object, got {entry}")));
    }
    let home = team_object(entry, fields::HOME_TEAM, "home")?;
    let away = team_object(entry, fields::AWAY_TEAM, "away")?;

    let status = resolve_status(entry, fields::STATUS);
    let kickoff_time = resolve_with(entry, fields::KICKOFF, parse_kickoff).unwrap_or_else(|| {
        if let Some(raw) = resolve(entry, fields::KICKOFF) {
            debug!("unparseable kickoff {raw}, using now");
        }
        ctx.now
    });

    let home_team = map_team(home, entry, fields::HOME_SCORE, status, ctx);
    let away_team = map_team(away, entry, fields::AWAY_SCORE, status, ctx);

    Ok(MatchRecord {
        home_team,
        away_team,
        status,
        display_time: display_time(status, kickoff_time, ctx),
        kickoff_time,
        round: resolve_with(entry, fields::ROUND, round_label)
            .unwrap_or_else(|| UNKNOWN_ROUND.to_owned()),
        venue: resolve_string(entry, fields::VENUE).unwrap_or_else(|| UNKNOWN_VENUE.to_owned()),
        placeholder: false,
    })
}

fn team_object<'a>(entry: &'a Value, paths: &[FieldPath], side: &str) -> ApiResult<&'a Value> {
    resolve(entry, paths)
        .filter(|team| team.is_object())
        .ok_or_else(|| ApiError::RecordShape(format!("missing {side} team object")))
}

fn map_team(
    team: &Value,
    entry: &Value,
    entry_score_paths: &[FieldPath],
    status: MatchStatus,
    ctx: &NormalizeContext,
) -> TeamSide {
    let score = if !ctx.show_scores || !status.has_started() {
        None
    } else {
        // Underway or finished: a missing score means nobody has scored yet.
        Some(
            resolve_u32(team, fields::TEAM_SCORE)
                .or_else(|| resolve_u32(entry, entry_score_paths))
                .unwrap_or(0),
        )
    };

    TeamSide {
        name: resolve_string(team, fields::TEAM_NAME).unwrap_or_else(|| UNKNOWN_TEAM.to_owned()),
        id: resolve_string(team, fields::TEAM_ID),
        score,
        ladder_position: resolve_u32(team, fields::LADDER_POSITION),
        logo_ref: resolve_string(team, fields::LOGO),
    }
}

// ---------------------------------------------------------------------------
// Field resolution
// ---------------------------------------------------------------------------

/// First non-null value found along `paths`, usable or not.
pub fn resolve<'a>(value: &'a Value, paths: &[FieldPath]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, *path).filter(|v| !v.is_null()))
}

/// First candidate along `paths` that `parse` accepts. A present but
/// unusable value does not hide the paths after it.
pub fn resolve_with<T>(
    value: &Value,
    paths: &[FieldPath],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    paths.iter().find_map(|path| lookup(value, *path).and_then(&parse))
}

/// First candidate that reads as a non-empty string (numbers are stringified).
pub fn resolve_string(value: &Value, paths: &[FieldPath]) -> Option<String> {
    resolve_with(value, paths, |found| match found {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First candidate that reads as a non-negative integer, numeric strings included.
pub fn resolve_u32(value: &Value, paths: &[FieldPath]) -> Option<u32> {
    resolve_with(value, paths, |found| match found {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

fn lookup<'a>(value: &'a Value, path: FieldPath) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

// ---------------------------------------------------------------------------
// Attribute mapping
// ---------------------------------------------------------------------------

/// The first candidate naming a known status wins. Otherwise any other text
/// (or no status at all) reads as `Scheduled`, and only non-string values
/// read as `Unknown`. Blank strings count as absent.
pub fn resolve_status(entry: &Value, paths: &[FieldPath]) -> MatchStatus {
    if let Some(status) = resolve_with(entry, paths, |v| v.as_str().and_then(lookup_status)) {
        return status;
    }
    let text = resolve_with(entry, paths, |v| {
        v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
    });
    match resolve(entry, paths) {
        Some(other) if text.is_none() && !other.is_string() => {
            debug!("status {other} is not a string");
            MatchStatus::Unknown
        }
        _ => {
            if let Some(text) = text {
                debug!("unrecognized status {text:?}, treating as scheduled");
            }
            MatchStatus::Scheduled
        }
    }
}

pub fn parse_status(s: &str) -> MatchStatus {
    lookup_status(s).unwrap_or(MatchStatus::Scheduled)
}

fn lookup_status(s: &str) -> Option<MatchStatus> {
    let key: String = s
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    STATUS_TABLE.iter().find(|(name, _)| *name == key).map(|(_, status)| *status)
}

fn parse_kickoff(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn round_label(value: &Value) -> Option<String> {
    let label = match value {
        Value::Number(n) => return Some(format!("Round {n}")),
        Value::String(s) if !s.trim().is_empty() => s.trim(),
        _ => return None,
    };

    if label.parse::<u32>().is_ok() {
        return Some(format!("Round {label}"));
    }
    let expanded = match label.to_uppercase().as_str() {
        "GF" => "Grand Final",
        "PF" => "Preliminary Final",
        "SF" => "Semi Final",
        "QF" => "Qualifying Final",
        "EF" => "Elimination Final",
        _ => label,
    };
    Some(expanded.to_owned())
}

/// Presentation label for a match, in the display offset.
pub fn display_time(status: MatchStatus, kickoff: DateTime<Utc>, ctx: &NormalizeContext) -> String {
    let local = kickoff.with_timezone(&ctx.offset);
    match status {
        MatchStatus::Live => "LIVE".to_owned(),
        MatchStatus::Completed => match ctx.completed_label {
            CompletedLabel::FullTime => "FT".to_owned(),
            CompletedLabel::KickOff => local.format("%H:%M").to_string(),
        },
        MatchStatus::Cancelled => "CANCELLED".to_owned(),
        MatchStatus::Unknown => "TBC".to_owned(),
        MatchStatus::Scheduled => {
            let today = ctx.now.with_timezone(&ctx.offset).date_naive();
            let date = local.date_naive();
            if date == today {
                format!("Today {}", local.format("%H:%M"))
            } else if today.checked_add_days(Days::new(1)) == Some(date) {
                format!("Tomorrow {}", local.format("%H:%M"))
            } else {
                local.format("%a %-d %b %H:%M").to_string()
            }
        }
    }
}

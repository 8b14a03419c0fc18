use crate::season::SeasonCalendar;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use log::warn;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_MAXIMUM_ENTRIES: usize = 10;
pub const DEFAULT_BASE_URL: &str = "https://www.nrl.com";
const DEFAULT_UPDATE_INTERVAL_MS: u64 = 5 * 60 * 1000;
const DEFAULT_LIVE_INTERVAL_MS: u64 = 60 * 1000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
const MIN_UPDATE_INTERVAL_MS: u64 = 10_000;

/// Which matches the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    All,
    Live,
    Upcoming,
    Completed,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Mode::All),
            "live" => Some(Mode::Live),
            "upcoming" => Some(Mode::Upcoming),
            "completed" => Some(Mode::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Live => "live",
            Mode::Upcoming => "upcoming",
            Mode::Completed => "completed",
        }
    }
}

/// Label shown in place of a kickoff time once a match has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletedLabel {
    #[default]
    FullTime,
    KickOff,
}

/// Config exactly as the user wrote it. Fields are untyped so that a value of
/// the wrong type is corrected by `Config::from_raw` instead of failing the
/// whole file. Absent fields are `Null` and take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    pub mode: Value,
    #[serde(rename = "focus_on", alias = "focusOn")]
    pub focus_on: Value,
    pub maximum_entries: Value,
    pub update_interval: Value,
    pub update_interval_live: Value,
    pub show_scores: Value,
    pub show_venue: Value,
    pub show_ladder_position: Value,
    pub colored: Value,
    pub completed_label: Value,
    pub fallback: Value,
    pub development: Value,
    pub request_timeout: Value,
    pub utc_offset_minutes: Value,
    pub season: Value,
    pub base_url: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCalendar {
    pub start_month: u32,
    pub finals_start_month: u32,
    pub end_month: u32,
}

impl Default for RawCalendar {
    fn default() -> Self {
        let calendar = SeasonCalendar::default();
        Self {
            start_month: calendar.start_month,
            finals_start_month: calendar.finals_start_month,
            end_month: calendar.end_month,
        }
    }
}

/// Validated configuration. Read-only for the lifetime of a refresh session.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub focus_on: Vec<String>,
    pub maximum_entries: usize,
    pub update_interval: Duration,
    pub update_interval_live: Duration,
    pub show_scores: bool,
    pub show_venue: bool,
    pub show_ladder_position: bool,
    pub colored: bool,
    pub completed_label: CompletedLabel,
    pub fallback: bool,
    pub development: bool,
    pub request_timeout: Duration,
    /// Fixed display offset. `None` follows the host's local offset, which is
    /// looked up per refresh so daylight saving changes are picked up.
    pub utc_offset: Option<FixedOffset>,
    pub calendar: SeasonCalendar,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

impl Config {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: RawConfig = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Validate a raw config, resetting anything unusable to a safe default.
    /// Each correction is logged; none of them is an error.
    pub fn from_raw(raw: RawConfig) -> Self {
        let mode = match &raw.mode {
            Value::Null => Mode::All,
            Value::String(s) => Mode::parse(s).unwrap_or_else(|| {
                warn!("invalid mode {s:?}, falling back to \"all\"");
                Mode::All
            }),
            other => {
                warn!("mode must be a string, got {other}; falling back to \"all\"");
                Mode::All
            }
        };

        let focus_on = match raw.focus_on {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
                    Value::Number(n) => Some(n.to_string()),
                    other => {
                        warn!("ignoring focus_on entry {other}");
                        None
                    }
                })
                .collect(),
            // `false` is the documented "no focus" value.
            Value::Null | Value::Bool(false) => Vec::new(),
            other => {
                warn!("focus_on must be a list of team names or ids, got {other}; ignoring it");
                Vec::new()
            }
        };

        let maximum_entries = match read_int("maximumEntries", &raw.maximum_entries) {
            None => DEFAULT_MAXIMUM_ENTRIES,
            Some(n) => match usize::try_from(n) {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!("maximumEntries must be positive, got {n}; using {DEFAULT_MAXIMUM_ENTRIES}");
                    DEFAULT_MAXIMUM_ENTRIES
                }
            },
        };

        let completed_label = match &raw.completed_label {
            Value::Null => CompletedLabel::FullTime,
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "ft" | "fulltime" | "full time" => CompletedLabel::FullTime,
                "kickoff" | "kick off" | "time" => CompletedLabel::KickOff,
                other => {
                    warn!("invalid completedLabel {other:?}, using \"FT\"");
                    CompletedLabel::FullTime
                }
            },
            other => {
                warn!("completedLabel must be a string, got {other}; using \"FT\"");
                CompletedLabel::FullTime
            }
        };

        let utc_offset = read_int("utcOffsetMinutes", &raw.utc_offset_minutes).and_then(|minutes| {
            let offset = i32::try_from(minutes)
                .ok()
                .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)));
            if offset.is_none() {
                warn!("utcOffsetMinutes {minutes} out of range, using local offset");
            }
            offset
        });

        let season: RawCalendar = read("season", raw.season, RawCalendar::default());
        let calendar = SeasonCalendar::new(season.start_month, season.finals_start_month, season.end_month)
            .unwrap_or_else(|| {
                warn!("invalid season calendar {season:?}, using defaults");
                SeasonCalendar::default()
            });

        let millis = |name: &str, value: &Value, default: u64| {
            read_int(name, value).map_or(default, |n| u64::try_from(n).unwrap_or(0))
        };

        Self {
            mode,
            focus_on,
            maximum_entries,
            update_interval: clamp_interval(
                "updateInterval",
                millis("updateInterval", &raw.update_interval, DEFAULT_UPDATE_INTERVAL_MS),
            ),
            update_interval_live: clamp_interval(
                "updateIntervalLive",
                millis("updateIntervalLive", &raw.update_interval_live, DEFAULT_LIVE_INTERVAL_MS),
            ),
            show_scores: read("showScores", raw.show_scores, true),
            show_venue: read("showVenue", raw.show_venue, true),
            show_ladder_position: read("showLadderPosition", raw.show_ladder_position, true),
            colored: read("colored", raw.colored, true),
            completed_label,
            fallback: read("fallback", raw.fallback, true),
            development: read("development", raw.development, false),
            request_timeout: Duration::from_millis(
                millis("requestTimeout", &raw.request_timeout, DEFAULT_REQUEST_TIMEOUT_MS).max(1),
            ),
            utc_offset,
            calendar,
            base_url: read("baseUrl", raw.base_url, DEFAULT_BASE_URL.to_owned()),
        }
    }

    /// Offset used to render times and to decide what "today" is, as of `now`.
    pub fn display_offset(&self, now: DateTime<Utc>) -> FixedOffset {
        self.utc_offset.unwrap_or_else(|| now.with_timezone(&Local).offset().fix())
    }
}

/// Deserialize one field, keeping `default` when it is absent or mistyped.
fn read<T: DeserializeOwned>(name: &str, value: Value, default: T) -> T {
    if value.is_null() {
        return default;
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!("invalid {name} {value}: {e}; using the default");
        default
    })
}

/// An integer field, accepting numeric strings. `None` when absent or unusable.
fn read_int(name: &str, value: &Value) -> Option<i64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_i64().or_else(|| {
            warn!("{name} must be a whole number, got {n}; using the default");
            None
        }),
        Value::String(s) => s.trim().parse().ok().or_else(|| {
            warn!("{name} must be a whole number, got {s:?}; using the default");
            None
        }),
        other => {
            warn!("{name} must be a whole number, got {other}; using the default");
            None
        }
    }
}

fn clamp_interval(name: &str, millis: u64) -> Duration {
    if millis < MIN_UPDATE_INTERVAL_MS {
        warn!("{name} of {millis}ms is too short, using {MIN_UPDATE_INTERVAL_MS}ms");
        return Duration::from_millis(MIN_UPDATE_INTERVAL_MS);
    }
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.mode, Mode::All);
        assert!(config.focus_on.is_empty());
        assert_eq!(config.maximum_entries, 10);
        assert_eq!(config.update_interval, Duration::from_secs(300));
        assert_eq!(config.update_interval_live, Duration::from_secs(60));
        assert!(config.fallback);
        assert_eq!(config.completed_label, CompletedLabel::FullTime);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_mode_resets_to_all() {
        let config = Config::from_json(r#"{ "mode": "highlights" }"#).unwrap();
        assert_eq!(config.mode, Mode::All);
    }

    #[test]
    fn mode_is_case_insensitive() {
        let config = Config::from_json(r#"{ "mode": "Upcoming" }"#).unwrap();
        assert_eq!(config.mode, Mode::Upcoming);
    }

    #[test]
    fn non_list_focus_on_resets_to_empty() {
        let config = Config::from_json(r#"{ "focus_on": "Broncos" }"#).unwrap();
        assert!(config.focus_on.is_empty());

        let config = Config::from_json(r#"{ "focus_on": false }"#).unwrap();
        assert!(config.focus_on.is_empty());
    }

    #[test]
    fn focus_on_keeps_names_and_numeric_ids() {
        let config = Config::from_json(r#"{ "focus_on": ["Broncos", 500011, "", true] }"#).unwrap();
        assert_eq!(config.focus_on, vec!["Broncos".to_string(), "500011".to_string()]);
    }

    #[test]
    fn non_positive_maximum_entries_resets_to_default() {
        let config = Config::from_json(r#"{ "maximumEntries": 0 }"#).unwrap();
        assert_eq!(config.maximum_entries, 10);
        let config = Config::from_json(r#"{ "maximumEntries": -3 }"#).unwrap();
        assert_eq!(config.maximum_entries, 10);
        let config = Config::from_json(r#"{ "maximumEntries": 4 }"#).unwrap();
        assert_eq!(config.maximum_entries, 4);
    }

    #[test]
    fn short_intervals_are_clamped() {
        let config = Config::from_json(r#"{ "updateInterval": 500, "updateIntervalLive": 20000 }"#).unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(10));
        assert_eq!(config.update_interval_live, Duration::from_secs(20));
    }

    #[test]
    fn explicit_offset_is_used() {
        let config = Config::from_json(r#"{ "utcOffsetMinutes": 600 }"#).unwrap();
        let offset = FixedOffset::east_opt(36_000).unwrap();
        assert_eq!(config.utc_offset, Some(offset));
        assert_eq!(config.display_offset(Utc::now()), offset);
    }

    #[test]
    fn local_offset_is_resolved_per_instant() {
        let config = Config::default();
        assert_eq!(config.utc_offset, None);
        let now = Utc::now();
        assert_eq!(config.display_offset(now), now.with_timezone(&Local).offset().fix());
    }

    #[test]
    fn mistyped_mode_resets_to_all() {
        for json in [r#"{ "mode": null }"#, r#"{ "mode": 3 }"#, r#"{ "mode": ["live"] }"#] {
            let config = Config::from_json(json).unwrap();
            assert_eq!(config.mode, Mode::All, "{json}");
        }
    }

    #[test]
    fn mistyped_fields_are_corrected_not_rejected() {
        let config = Config::from_json(r#"{ "maximumEntries": "5" }"#).unwrap();
        assert_eq!(config.maximum_entries, 5);

        let config = Config::from_json(
            r#"{
                "maximumEntries": null,
                "updateInterval": "soon",
                "showScores": "yes",
                "completedLabel": 1,
                "requestTimeout": -5,
                "season": "winter",
                "baseUrl": 42
            }"#,
        )
        .unwrap();
        assert_eq!(config.maximum_entries, DEFAULT_MAXIMUM_ENTRIES);
        assert_eq!(config.update_interval, Duration::from_secs(300));
        assert!(config.show_scores);
        assert_eq!(config.completed_label, CompletedLabel::FullTime);
        assert_eq!(config.request_timeout, Duration::from_millis(1));
        assert_eq!(config.calendar, SeasonCalendar::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_calendar_falls_back_to_default() {
        let config =
            Config::from_json(r#"{ "season": { "startMonth": 9, "finalsStartMonth": 3, "endMonth": 13 } }"#)
                .unwrap();
        assert_eq!(config.calendar, SeasonCalendar::default());
    }

    #[test]
    fn completed_label_accepts_kickoff() {
        let config = Config::from_json(r#"{ "completedLabel": "kickoff" }"#).unwrap();
        assert_eq!(config.completed_label, CompletedLabel::KickOff);
    }
}

//! Placeholder matches for when upstream has nothing usable.
//!
//! A pure function of season state and the clock: the display always gets
//! something coherent to show, and the result is testable without a network.

use crate::normalize::{NormalizeContext, display_time};
use crate::season::{SeasonCalendar, month_name};
use crate::{MatchRecord, MatchStatus, SeasonState, TeamSide};
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeZone, Utc};

const EVENING_KICKOFF: (u32, u32) = (19, 30);

/// Never empty. Every record has `placeholder = true`.
pub fn placeholders(
    state: SeasonState,
    calendar: &SeasonCalendar,
    ctx: &NormalizeContext,
    development: bool,
) -> Vec<MatchRecord> {
    let today = ctx.now.with_timezone(&ctx.offset).date_naive();

    let mut matches = vec![match state {
        SeasonState::OffSeason => off_season(calendar, today, ctx),
        SeasonState::Finals => grand_final(calendar, today, ctx),
        SeasonState::InSeason => next_round(today, ctx),
    }];

    if development {
        matches.extend(sample_results(today, ctx));
    }
    matches
}

fn off_season(calendar: &SeasonCalendar, today: NaiveDate, ctx: &NormalizeContext) -> MatchRecord {
    let season = calendar.season_year(today);
    let opening = calendar.season_start(season).unwrap_or(today);
    placeholder(
        team("OFF SEASON", None),
        team(&season.to_string(), None),
        MatchStatus::Scheduled,
        evening(opening, ctx),
        format!("Season {season}"),
        format!("NRL {season} Season starts in {}", month_name(calendar.start_month)),
        ctx,
    )
}

fn grand_final(calendar: &SeasonCalendar, today: NaiveDate, ctx: &NormalizeContext) -> MatchRecord {
    // The first of the last season month stands in for the decider; once that
    // has passed, the coming Sunday is the best guess.
    let date = NaiveDate::from_ymd_opt(today.year(), calendar.end_month, 1)
        .filter(|d| *d >= today)
        .unwrap_or_else(|| next_sunday(today));
    placeholder(
        team("TBD", Some(1)),
        team("TBD", Some(2)),
        MatchStatus::Scheduled,
        evening(date, ctx),
        "Grand Final".into(),
        "Accor Stadium".into(),
        ctx,
    )
}

fn next_round(today: NaiveDate, ctx: &NormalizeContext) -> MatchRecord {
    let date = today.checked_add_days(Days::new(7)).unwrap_or(today);
    placeholder(
        team("Panthers", Some(1)),
        team("Broncos", Some(2)),
        MatchStatus::Scheduled,
        evening(date, ctx),
        "Next Round".into(),
        "BlueBet Stadium".into(),
        ctx,
    )
}

fn sample_results(today: NaiveDate, ctx: &NormalizeContext) -> Vec<MatchRecord> {
    let days_ago = |n: u64| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    let result = |home: &str, home_score: u32, away: &str, away_score: u32, date: NaiveDate, venue: &str| {
        let mut home = team(home, None);
        let mut away = team(away, None);
        if ctx.show_scores {
            home.score = Some(home_score);
            away.score = Some(away_score);
        }
        placeholder(
            home,
            away,
            MatchStatus::Completed,
            evening(date, ctx),
            "Round 1".into(),
            venue.into(),
            ctx,
        )
    };
    vec![
        result("Broncos", 24, "Storm", 18, days_ago(1), "Suncorp Stadium"),
        result("Roosters", 12, "Rabbitohs", 30, days_ago(2), "Allianz Stadium"),
    ]
}

fn team(name: &str, ladder_position: Option<u32>) -> TeamSide {
    TeamSide { name: name.to_owned(), ladder_position, ..Default::default() }
}

fn placeholder(
    home_team: TeamSide,
    away_team: TeamSide,
    status: MatchStatus,
    kickoff_time: DateTime<Utc>,
    round: String,
    venue: String,
    ctx: &NormalizeContext,
) -> MatchRecord {
    MatchRecord {
        home_team,
        away_team,
        status,
        display_time: display_time(status, kickoff_time, ctx),
        kickoff_time,
        round,
        venue,
        placeholder: true,
    }
}

fn evening(date: NaiveDate, ctx: &NormalizeContext) -> DateTime<Utc> {
    let (hour, minute) = EVENING_KICKOFF;
    date.and_hms_opt(hour, minute, 0)
        .and_then(|naive| local_to_utc(&ctx.offset, naive))
        .unwrap_or(ctx.now)
}

fn local_to_utc(offset: &FixedOffset, naive: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
    offset.from_local_datetime(&naive).single().map(|dt| dt.with_timezone(&Utc))
}

fn next_sunday(today: NaiveDate) -> NaiveDate {
    let days = 7 - u64::from(today.weekday().num_days_from_sunday());
    today.checked_add_days(Days::new(days)).unwrap_or(today)
}

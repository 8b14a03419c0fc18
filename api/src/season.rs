use crate::SeasonState;
use crate::nrl::Endpoint;
use chrono::{Datelike, NaiveDate};

/// The competition year, in calendar months (1–12).
///
/// Regular season runs `start_month..finals_start_month`, finals run
/// `finals_start_month..=end_month`, everything else is off-season.
/// The upstream API publishes no machine-readable calendar, so these are
/// configurable rather than discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonCalendar {
    pub start_month: u32,
    pub finals_start_month: u32,
    pub end_month: u32,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self { start_month: 3, finals_start_month: 9, end_month: 10 }
    }
}

/// One request the session may issue: a season on a given endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub season: i32,
    pub endpoint: Endpoint,
}

impl Attempt {
    pub fn url(&self, base: &str) -> String {
        self.endpoint.url(base, self.season)
    }
}

impl SeasonCalendar {
    pub fn new(start_month: u32, finals_start_month: u32, end_month: u32) -> Option<Self> {
        let valid = (1..=12).contains(&start_month)
            && start_month < finals_start_month
            && finals_start_month <= end_month
            && end_month <= 12;
        valid.then_some(Self { start_month, finals_start_month, end_month })
    }

    pub fn state(&self, date: NaiveDate) -> SeasonState {
        let month = date.month();
        if (self.start_month..self.finals_start_month).contains(&month) {
            SeasonState::InSeason
        } else if (self.finals_start_month..=self.end_month).contains(&month) {
            SeasonState::Finals
        } else {
            SeasonState::OffSeason
        }
    }

    /// The season whose fixtures are most relevant on `date`: the current one
    /// while it runs, otherwise the next one to start.
    pub fn season_year(&self, date: NaiveDate) -> i32 {
        if date.month() > self.end_month { date.year() + 1 } else { date.year() }
    }

    /// Ordered attempts, most likely to succeed first.
    pub fn attempts(&self, date: NaiveDate) -> Vec<Attempt> {
        let season = self.season_year(date);
        Endpoint::ALL
            .iter()
            .map(|&endpoint| Attempt { season, endpoint })
            .collect()
    }

    /// Opening day placeholder for `season`: the first of the start month.
    pub fn season_start(&self, season: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(season, self.start_month, 1)
    }
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES.get(month.wrapping_sub(1) as usize).copied().unwrap_or("March")
}

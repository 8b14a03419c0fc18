use crate::client::{ApiError, ApiResult, NrlApi};
use crate::config::Config;
use crate::normalize::{NormalizeContext, normalize_all};
use crate::nrl::Endpoint;
use crate::{MatchRecord, SeasonState, fallback, schedule};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// Everything one refresh cycle needs, owned by whoever schedules refreshes.
/// Holds no mutable state: every call to `refresh` produces a fresh result.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    api: NrlApi,
}

/// Where a refresh result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Upstream { season: i32, endpoint: Endpoint },
    Fallback,
}

/// The finished, display-ready output of one cycle.
#[derive(Debug, Clone)]
pub struct Refresh {
    pub matches: Vec<MatchRecord>,
    pub season_state: SeasonState,
    pub source: Source,
    pub fetched_at: DateTime<Utc>,
    /// Last upstream failure when the result is a fallback.
    pub last_error: Option<String>,
}

impl Refresh {
    pub fn has_live(&self) -> bool {
        self.matches.iter().any(MatchRecord::is_live)
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        let api = NrlApi::new(&config.base_url, config.request_timeout);
        Self { config, api }
    }

    pub async fn refresh(&self) -> ApiResult<Refresh> {
        self.refresh_at(Utc::now()).await
    }

    /// Run one fetch → normalize → filter/sort/limit cycle as of `now`.
    ///
    /// Attempts are tried in order and the first that yields at least one
    /// usable record wins. If none does, placeholders are returned instead;
    /// an error only comes back when placeholders are disabled.
    pub async fn refresh_at(&self, now: DateTime<Utc>) -> ApiResult<Refresh> {
        let config = &self.config;
        let ctx = NormalizeContext::new(config, now);
        let today = now.with_timezone(&ctx.offset).date_naive();
        let season_state = config.calendar.state(today);
        debug!("season state: {}", season_state.label());

        let mut last_error: Option<ApiError> = None;
        for attempt in config.calendar.attempts(today) {
            debug!("trying season {} via {:?}", attempt.season, attempt.endpoint);
            let entries = match self.api.fetch_game_list(&attempt).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("season {} via {:?} failed: {e}", attempt.season, attempt.endpoint);
                    last_error = Some(e);
                    continue;
                }
            };

            let records = normalize_all(&entries, &ctx);
            if records.is_empty() {
                debug!("season {} via {:?} returned no usable matches", attempt.season, attempt.endpoint);
                last_error = Some(ApiError::NoData(format!(
                    "no usable matches for season {}",
                    attempt.season
                )));
                continue;
            }

            info!("loaded {} matches for season {}", records.len(), attempt.season);
            return Ok(Refresh {
                matches: schedule::apply(records, config, season_state),
                season_state,
                source: Source::Upstream { season: attempt.season, endpoint: attempt.endpoint },
                fetched_at: now,
                last_error: None,
            });
        }

        let last_error = last_error.map(|e| e.to_string());
        if !config.fallback {
            return Err(ApiError::NoData(
                last_error.unwrap_or_else(|| "no attempts were made".into()),
            ));
        }

        warn!(
            "no upstream data, showing placeholders (last error: {})",
            last_error.as_deref().unwrap_or("none")
        );
        // Placeholders are messages rather than results, so the mode and
        // focus filters don't apply to them.
        let mut matches =
            fallback::placeholders(season_state, &config.calendar, &ctx, config.development);
        schedule::sort_matches(&mut matches, season_state);
        matches.truncate(config.maximum_entries);

        Ok(Refresh { matches, season_state, source: Source::Fallback, fetched_at: now, last_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchStatus;
    use crate::config::Mode;
    use chrono::{FixedOffset, TimeZone};
    use mockito::Matcher;
    use std::time::Duration;

    const GAME_LIST: &str = "^/api/v2/game/list";
    const DRAW: &str = "^/draw/data";

    fn session(server: &mockito::ServerGuard, config: Config) -> Session {
        Session::new(Config {
            base_url: server.url(),
            request_timeout: Duration::from_secs(2),
            utc_offset: FixedOffset::east_opt(10 * 3600),
            ..config
        })
    }

    fn in_season() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 14, 2, 0, 0).unwrap()
    }

    fn off_season() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 12, 2, 2, 0, 0).unwrap()
    }

    const GAMES: &str = r#"{"games":[
        {"homeTeam":{"nickName":"Eels"},"awayTeam":{"nickName":"Tigers"},"gameState":"Full Time",
         "kickOffDate":"2026-05-10T06:05:00Z","roundNumber":10,"scores":{"home":30,"away":12}},
        {"homeTeam":{"nickName":"Broncos"},"awayTeam":{"nickName":"Storm"},"gameState":"In Progress",
         "kickOffDate":"2026-05-14T01:30:00Z","roundNumber":11,"scores":{"home":6,"away":4}},
        {"awayTeam":{"nickName":"Nobody"},"gameState":"Pre Game"}
    ]}"#;

    async fn mock(server: &mut mockito::ServerGuard, path: &str, status: usize, body: &str) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(path.into()))
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn first_successful_attempt_wins() {
        let mut server = mockito::Server::new_async().await;
        let games = server
            .mock("GET", Matcher::Regex(GAME_LIST.into()))
            .match_query(Matcher::UrlEncoded("season".into(), "2026".into()))
            .with_status(200)
            .with_body(GAMES)
            .create_async()
            .await;
        let draw = server
            .mock("GET", Matcher::Regex(DRAW.into()))
            .expect(0)
            .create_async()
            .await;

        let refresh = session(&server, Config::default()).refresh_at(in_season()).await.unwrap();

        assert_eq!(
            refresh.source,
            Source::Upstream { season: 2026, endpoint: Endpoint::GameList }
        );
        assert_eq!(refresh.season_state, SeasonState::InSeason);
        assert_eq!(refresh.matches.len(), 2, "malformed entry is dropped");
        assert_eq!(refresh.matches[0].home_team.name, "Broncos");
        assert!(refresh.has_live());
        games.assert_async().await;
        draw.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_moves_on_to_next_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let _game_list = mock(&mut server, GAME_LIST, 503, "").await;
        let _draw = mock(&mut server, DRAW, 200, &GAMES.replace("\"games\"", "\"fixtures\"")).await;

        let refresh = session(&server, Config::default()).refresh_at(in_season()).await.unwrap();
        assert_eq!(refresh.source, Source::Upstream { season: 2026, endpoint: Endpoint::Draw });
        assert_eq!(refresh.matches.len(), 2);
    }

    #[tokio::test]
    async fn malformed_json_moves_on_to_next_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let _game_list = mock(&mut server, GAME_LIST, 200, "{not json").await;
        let _draw = mock(&mut server, DRAW, 200, GAMES).await;

        let refresh = session(&server, Config::default()).refresh_at(in_season()).await.unwrap();
        assert_eq!(refresh.source, Source::Upstream { season: 2026, endpoint: Endpoint::Draw });
    }

    #[tokio::test]
    async fn off_season_queries_next_season_and_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let games = server
            .mock("GET", Matcher::Regex(GAME_LIST.into()))
            .match_query(Matcher::UrlEncoded("season".into(), "2027".into()))
            .with_status(200)
            .with_body(r#"{"games":[]}"#)
            .create_async()
            .await;
        let _draw = mock(&mut server, DRAW, 404, "").await;

        let refresh = session(&server, Config::default()).refresh_at(off_season()).await.unwrap();
        games.assert_async().await;

        assert_eq!(refresh.source, Source::Fallback);
        assert_eq!(refresh.season_state, SeasonState::OffSeason);
        assert!(!refresh.matches.is_empty());
        assert!(refresh.matches.iter().any(|m| m.status == MatchStatus::Scheduled));
        assert!(refresh.matches.iter().all(|m| m.placeholder));
        assert!(refresh.last_error.is_some());
    }

    #[tokio::test]
    async fn fallback_ignores_mode_and_focus_filters() {
        let mut server = mockito::Server::new_async().await;
        let _game_list = mock(&mut server, GAME_LIST, 500, "").await;
        let _draw = mock(&mut server, DRAW, 500, "").await;

        let config = Config { mode: Mode::Live, focus_on: vec!["Dolphins".into()], ..Config::default() };
        let refresh = session(&server, config).refresh_at(in_season()).await.unwrap();
        assert_eq!(refresh.source, Source::Fallback);
        assert_eq!(refresh.matches.len(), 1);
    }

    #[tokio::test]
    async fn disabled_fallback_surfaces_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _game_list = mock(&mut server, GAME_LIST, 500, "").await;
        let _draw = mock(&mut server, DRAW, 500, "").await;

        let config = Config { fallback: false, ..Config::default() };
        let err = session(&server, config).refresh_at(in_season()).await.unwrap_err();
        assert!(matches!(err, ApiError::NoData(_)), "got {err}");
    }

    #[tokio::test]
    async fn filters_can_legitimately_empty_upstream_results() {
        let mut server = mockito::Server::new_async().await;
        let _game_list = mock(&mut server, GAME_LIST, 200, GAMES).await;

        let config = Config { mode: Mode::Upcoming, ..Config::default() };
        let refresh = session(&server, config).refresh_at(in_season()).await.unwrap();
        assert!(matches!(refresh.source, Source::Upstream { .. }));
        assert!(refresh.matches.is_empty());
    }
}

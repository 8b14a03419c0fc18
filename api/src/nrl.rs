//! NRL API raw wire types: serde shapes for deserializing NRL responses.
//!
//! Only the envelope is typed. Individual game entries stay as raw JSON
//! because their shape differs between endpoints and seasons; the
//! normalizer resolves fields from them by priority list.
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Game list  (/api/v2/game/list)  and draw  (/draw/data)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameListResponse {
    pub games: Option<Vec<Value>>,
    /// The draw endpoint nests matches as "fixtures" instead of "games"
    pub fixtures: Option<Vec<Value>>,
}

impl GameListResponse {
    pub fn has_entries(&self) -> bool {
        self.games.is_some() || self.fixtures.is_some()
    }

    pub fn into_entries(self) -> Vec<Value> {
        self.games
            .into_iter()
            .flatten()
            .chain(self.fixtures.into_iter().flatten())
            .collect()
    }
}

/// Which envelope an endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    GameList,
    Draw,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::GameList, Endpoint::Draw];

    pub fn url(&self, base: &str, season: i32) -> String {
        let base = base.trim_end_matches('/');
        match self {
            Endpoint::GameList => format!(
                "{base}/api/v2/game/list?offset=0&limit=50&competitionId={COMPETITION_ID}&season={season}"
            ),
            Endpoint::Draw => {
                format!("{base}/draw/data?competition={COMPETITION_ID}&season={season}")
            }
        }
    }
}

/// NRL Telstra Premiership.
pub const COMPETITION_ID: u32 = 111;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_chain_games_and_fixtures() {
        let raw: GameListResponse =
            serde_json::from_value(json!({ "games": [{"a": 1}], "fixtures": [{"b": 2}] })).unwrap();
        assert!(raw.has_entries());
        assert_eq!(raw.into_entries().len(), 2);
    }

    #[test]
    fn envelope_without_lists_has_no_entries() {
        let raw: GameListResponse = serde_json::from_value(json!({ "other": true })).unwrap();
        assert!(!raw.has_entries());
    }

    #[test]
    fn non_array_games_fails_to_decode() {
        let raw = serde_json::from_value::<GameListResponse>(json!({ "games": "nope" }));
        assert!(raw.is_err());
    }

    #[test]
    fn endpoint_urls_carry_season_and_competition() {
        let url = Endpoint::GameList.url("https://www.nrl.com/", 2026);
        assert_eq!(
            url,
            "https://www.nrl.com/api/v2/game/list?offset=0&limit=50&competitionId=111&season=2026"
        );
        assert_eq!(
            Endpoint::Draw.url("http://127.0.0.1:1234", 2027),
            "http://127.0.0.1:1234/draw/data?competition=111&season=2027"
        );
    }
}

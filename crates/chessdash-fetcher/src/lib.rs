//! Monthly game archive retrieval.
//!
//! Fetching is fail-open: a month that cannot be retrieved or decoded is
//! logged and treated as an empty month so the rest of the pipeline still
//! produces a dashboard.

use std::collections::HashMap;

use async_trait::async_trait;
use chessdash_types::{
    game::GameRecord, month::MonthRef, time_control::TimeClass, ChessdashError, Result,
};
use serde::Deserialize;
use tracing::{info, warn};

mod chess_com;

pub use chess_com::ChessComClient;

#[async_trait]
pub trait GameSource: Send + Sync {
    /// Time class kept by [`GameSource::fetch_month`].
    fn time_class(&self) -> TimeClass;

    /// Single attempt at retrieving every game of `username` in `month`,
    /// before time-class filtering.
    async fn try_fetch(&self, username: &str, month: MonthRef) -> Result<Vec<GameRecord>>;

    /// Games of the configured time class for one month. Never fails; any
    /// retrieval error yields an empty list.
    async fn fetch_month(&self, username: &str, month: MonthRef) -> Vec<GameRecord> {
        match self.try_fetch(username, month).await {
            Ok(games) => {
                let total = games.len();
                let kept = retain_time_class(games, self.time_class());
                info!(
                    "Loaded {} {} games for {} ({} in archive)",
                    kept.len(),
                    self.time_class(),
                    month,
                    total
                );
                kept
            }
            Err(err) => {
                warn!("Failed to load {}: {}", month, err);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct MonthlyArchive {
    #[serde(default)]
    games: Vec<serde_json::Value>,
}

/// Decode a monthly archive body. A missing `games` key is an empty month;
/// a body that is not a JSON object is an error.
pub fn games_from_body(body: &str) -> Result<Vec<GameRecord>> {
    let archive: MonthlyArchive = serde_json::from_str(body)
        .map_err(|err| ChessdashError::Decode(format!("invalid archive body: {err}")))?;
    Ok(archive.games.iter().map(GameRecord::from_json).collect())
}

pub fn retain_time_class(games: Vec<GameRecord>, time_class: TimeClass) -> Vec<GameRecord> {
    games
        .into_iter()
        .filter(|game| game.is_time_class(time_class))
        .collect()
}

/// In-memory source used for tests and offline runs. Months without an
/// entry are reported as failures.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    time_class: TimeClass,
    months: HashMap<MonthRef, Vec<GameRecord>>,
}

impl StaticSource {
    pub fn new(time_class: TimeClass) -> Self {
        Self {
            time_class,
            months: HashMap::new(),
        }
    }

    pub fn with_month(mut self, month: MonthRef, games: Vec<GameRecord>) -> Self {
        self.months.insert(month, games);
        self
    }
}

#[async_trait]
impl GameSource for StaticSource {
    fn time_class(&self) -> TimeClass {
        self.time_class
    }

    async fn try_fetch(&self, _username: &str, month: MonthRef) -> Result<Vec<GameRecord>> {
        self.months
            .get(&month)
            .cloned()
            .ok_or_else(|| fetcher_error(format!("no archive for {month}")))
    }
}

pub fn fetcher_error(message: impl Into<String>) -> ChessdashError {
    ChessdashError::Fetch(message.into())
}

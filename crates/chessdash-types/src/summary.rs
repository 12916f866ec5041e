use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::game::Color;

/// Days with strictly more games than this are flagged.
pub const DEFAULT_OVERUSE_THRESHOLD: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayFlag {
    Ok,
    Overuse,
}

impl DayFlag {
    pub fn classify(games: u32, threshold: u32) -> Self {
        if games > threshold {
            DayFlag::Overuse
        } else {
            DayFlag::Ok
        }
    }

    pub fn is_overuse(&self) -> bool {
        matches!(self, DayFlag::Overuse)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayFlag::Ok => "OK",
            DayFlag::Overuse => "Overuse",
        }
    }
}

impl fmt::Display for DayFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Finalized statistics for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummaryRow {
    pub date: NaiveDate,
    pub games: u32,
    pub wins: u32,
    pub win_rate_percent: f64,
    pub flag: DayFlag,
}

/// Why a single archive entry did not contribute to the daily table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    MissingEndTime,
    InvalidEndTime(i64),
    MissingPlayers,
    MissingUsername(Color),
    UserNotInGame,
    MissingResult(Color),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEndTime => f.write_str("missing end time"),
            SkipReason::InvalidEndTime(ts) => write!(f, "end time {ts} out of range"),
            SkipReason::MissingPlayers => f.write_str("missing player details"),
            SkipReason::MissingUsername(color) => write!(f, "missing {color:?} username"),
            SkipReason::UserNotInGame => f.write_str("tracked user played neither side"),
            SkipReason::MissingResult(color) => write!(f, "missing {color:?} result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the aggregated input.
    pub index: usize,
    pub url: Option<String>,
    pub reason: SkipReason,
}

/// Output of the daily aggregation: rows in ascending date order plus the
/// records that were dropped along the way.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySummary {
    pub username: String,
    pub rows: Vec<DailySummaryRow>,
    pub skipped: Vec<SkippedRecord>,
}

impl DailySummary {
    /// No qualifying games were recorded. Not an error; the dashboard shows
    /// a placeholder instead of the chart and table.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_games(&self) -> u32 {
        self.rows.iter().map(|row| row.games).sum()
    }

    pub fn total_wins(&self) -> u32 {
        self.rows.iter().map(|row| row.wins).sum()
    }

    pub fn overuse_days(&self) -> usize {
        self.rows.iter().filter(|row| row.flag.is_overuse()).count()
    }
}

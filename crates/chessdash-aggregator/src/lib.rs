//! Per-day aggregation of finished games.
//!
//! Pure and synchronous: records are classified one at a time, malformed
//! ones are skipped with a reason, and the remaining ones are folded into a
//! date-ordered table.

use std::collections::BTreeMap;

use chessdash_types::{
    game::{Color, GameRecord, WIN_RESULT},
    summary::{
        DailySummary, DailySummaryRow, DayFlag, SkipReason, SkippedRecord,
        DEFAULT_OVERUSE_THRESHOLD,
    },
};
use chrono::{DateTime, NaiveDate};
use tracing::debug;

/// Outcome of inspecting a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Counted { date: NaiveDate, win: bool },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default)]
struct DailyStat {
    games: u32,
    wins: u32,
}

impl DailyStat {
    fn record(&mut self, win: bool) {
        self.games += 1;
        if win {
            self.wins += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DailyAggregator {
    overuse_threshold: u32,
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_OVERUSE_THRESHOLD)
    }
}

impl DailyAggregator {
    pub fn new(overuse_threshold: u32) -> Self {
        Self { overuse_threshold }
    }

    pub fn aggregate(&self, username: &str, games: &[GameRecord]) -> DailySummary {
        let mut daily: BTreeMap<NaiveDate, DailyStat> = BTreeMap::new();
        let mut skipped = Vec::new();

        for (index, game) in games.iter().enumerate() {
            match classify_record(username, game) {
                RecordOutcome::Counted { date, win } => {
                    daily.entry(date).or_default().record(win);
                }
                RecordOutcome::Skipped(reason) => {
                    debug!("Skipping record {}: {}", index, reason);
                    skipped.push(SkippedRecord {
                        index,
                        url: game.url.clone(),
                        reason,
                    });
                }
            }
        }

        let rows = daily
            .into_iter()
            .map(|(date, stat)| DailySummaryRow {
                date,
                games: stat.games,
                wins: stat.wins,
                win_rate_percent: win_rate_percent(stat.wins, stat.games),
                flag: DayFlag::classify(stat.games, self.overuse_threshold),
            })
            .collect();

        DailySummary {
            username: username.to_string(),
            rows,
            skipped,
        }
    }
}

/// Aggregate with the default overuse threshold.
pub fn aggregate(username: &str, games: &[GameRecord]) -> DailySummary {
    DailyAggregator::default().aggregate(username, games)
}

/// Decide whether `game` counts toward a day and whether the tracked user
/// won it. The user is looked up on the white side first, then black.
pub fn classify_record(username: &str, game: &GameRecord) -> RecordOutcome {
    let Some(end_time) = game.end_time else {
        return RecordOutcome::Skipped(SkipReason::MissingEndTime);
    };
    let Some(date) = DateTime::from_timestamp(end_time, 0).map(|dt| dt.date_naive()) else {
        return RecordOutcome::Skipped(SkipReason::InvalidEndTime(end_time));
    };
    let (Some(white), Some(black)) = (&game.white, &game.black) else {
        return RecordOutcome::Skipped(SkipReason::MissingPlayers);
    };

    if white.username.is_none() {
        return RecordOutcome::Skipped(SkipReason::MissingUsername(Color::White));
    }
    let color = if white.is_player(username) {
        Color::White
    } else if black.username.is_none() {
        return RecordOutcome::Skipped(SkipReason::MissingUsername(Color::Black));
    } else if black.is_player(username) {
        Color::Black
    } else {
        return RecordOutcome::Skipped(SkipReason::UserNotInGame);
    };

    match game.side(color).and_then(|side| side.result.as_deref()) {
        Some(result) => RecordOutcome::Counted {
            date,
            win: result == WIN_RESULT,
        },
        None => RecordOutcome::Skipped(SkipReason::MissingResult(color)),
    }
}

/// `wins / games * 100` rounded to one decimal place, ties to even
/// (6.25 becomes 6.2). Zero games yields 0.
pub fn win_rate_percent(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    let rate = f64::from(wins) / f64::from(games) * 100.0;
    (rate * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessdash_types::game::GameSide;

    const USER: &str = "cand5d";

    fn ts(date: &str, hour: u32) -> i64 {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
    }

    fn as_white(end_time: i64, result: &str) -> GameRecord {
        GameRecord {
            end_time: Some(end_time),
            white: Some(GameSide::new("Cand5d", result)),
            black: Some(GameSide::new("rival", "win")),
            ..GameRecord::default()
        }
    }

    fn as_black(end_time: i64, result: &str) -> GameRecord {
        GameRecord {
            end_time: Some(end_time),
            white: Some(GameSide::new("rival", "win")),
            black: Some(GameSide::new("CAND5D", result)),
            ..GameRecord::default()
        }
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn two_day_scenario() {
        let mut games = vec![
            as_white(ts("2025-06-01", 9), "win"),
            as_black(ts("2025-06-01", 10), "win"),
            as_white(ts("2025-06-01", 11), "resigned"),
        ];
        games.push(as_black(ts("2025-06-02", 8), "win"));
        for hour in 9..16 {
            games.push(as_white(ts("2025-06-02", hour), "timeout"));
        }

        let summary = aggregate(USER, &games);
        assert_eq!(
            summary.rows,
            vec![
                DailySummaryRow {
                    date: date("2025-06-01"),
                    games: 3,
                    wins: 2,
                    win_rate_percent: 66.7,
                    flag: DayFlag::Ok,
                },
                DailySummaryRow {
                    date: date("2025-06-02"),
                    games: 8,
                    wins: 1,
                    win_rate_percent: 12.5,
                    flag: DayFlag::Overuse,
                },
            ]
        );
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn empty_input_signals_no_data() {
        let summary = aggregate(USER, &[]);
        assert!(summary.is_empty());
        assert!(summary.rows.is_empty());
        assert!(summary.skipped.is_empty());
    }

    #[test]
    fn draw_counts_as_game_not_win() {
        let summary = aggregate(USER, &[as_black(ts("2025-06-03", 12), "agreed")]);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].games, 1);
        assert_eq!(summary.rows[0].wins, 0);
        assert_eq!(summary.rows[0].win_rate_percent, 0.0);
    }

    #[test]
    fn overuse_boundary() {
        let six: Vec<_> = (0..6)
            .map(|h| as_white(ts("2025-06-04", h), "win"))
            .collect();
        let seven: Vec<_> = (0..7)
            .map(|h| as_white(ts("2025-06-05", h), "win"))
            .collect();

        let summary = aggregate(USER, &[six, seven.clone()].concat());
        assert_eq!(summary.rows[0].flag, DayFlag::Ok);
        assert_eq!(summary.rows[1].flag, DayFlag::Overuse);

        let lenient = DailyAggregator::new(7).aggregate(USER, &seven);
        assert_eq!(lenient.rows[0].games, 7);
        assert_eq!(lenient.rows[0].flag, DayFlag::Ok);
    }

    #[test]
    fn days_split_on_utc_midnight() {
        let games = vec![
            as_white(ts("2025-06-02", 0), "win"),
            as_white(ts("2025-06-02", 0) - 1, "win"),
        ];
        let summary = aggregate(USER, &games);
        let dates: Vec<_> = summary.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2025-06-01"), date("2025-06-02")]);
    }

    #[test]
    fn rows_are_sorted_and_unique_regardless_of_input_order() {
        let games = vec![
            as_white(ts("2025-07-03", 5), "win"),
            as_white(ts("2025-06-30", 5), "lose"),
            as_black(ts("2025-07-03", 6), "win"),
            as_white(ts("2025-07-01", 5), "win"),
            as_black(ts("2025-06-30", 7), "stalemate"),
        ];
        let summary = aggregate(USER, &games);
        assert!(summary.rows.windows(2).all(|w| w[0].date < w[1].date));
        assert!(summary.rows.iter().all(|r| r.wins <= r.games));
        assert_eq!(summary.total_games(), 5);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let games = vec![
            as_white(ts("2025-06-01", 1), "win"),
            as_black(ts("2025-06-02", 1), "checkmated"),
        ];
        assert_eq!(aggregate(USER, &games), aggregate(USER, &games));
    }

    #[test]
    fn malformed_records_are_skipped_with_reason() {
        let valid = as_white(ts("2025-06-01", 1), "win");
        let no_time = GameRecord {
            end_time: None,
            ..valid.clone()
        };
        let far_future = GameRecord {
            end_time: Some(i64::MAX),
            ..valid.clone()
        };
        let no_black = GameRecord {
            black: None,
            ..valid.clone()
        };
        let stranger = GameRecord {
            white: Some(GameSide::new("someone", "win")),
            black: Some(GameSide::new("else", "lose")),
            url: Some("https://www.chess.com/game/live/9".into()),
            ..valid.clone()
        };
        let no_result = GameRecord {
            white: Some(GameSide {
                username: Some(USER.into()),
                result: None,
            }),
            ..valid.clone()
        };

        let games = vec![no_time, valid, far_future, no_black, stranger, no_result];
        let summary = aggregate(USER, &games);

        assert_eq!(summary.total_games(), 1);
        let reasons: Vec<_> = summary.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::MissingEndTime,
                SkipReason::InvalidEndTime(i64::MAX),
                SkipReason::MissingPlayers,
                SkipReason::UserNotInGame,
                SkipReason::MissingResult(Color::White),
            ]
        );
        assert_eq!(summary.skipped[3].index, 4);
        assert!(summary.skipped[3].url.is_some());
    }

    #[test]
    fn win_rate_rounds_to_one_decimal() {
        assert_eq!(win_rate_percent(2, 3), 66.7);
        assert_eq!(win_rate_percent(1, 3), 33.3);
        assert_eq!(win_rate_percent(1, 8), 12.5);
        assert_eq!(win_rate_percent(5, 5), 100.0);
        assert_eq!(win_rate_percent(0, 0), 0.0);
    }

    #[test]
    fn win_rate_ties_round_to_even() {
        assert_eq!(win_rate_percent(1, 16), 6.2);
        assert_eq!(win_rate_percent(5, 16), 31.2);
        assert_eq!(win_rate_percent(3, 16), 18.8);
    }

    #[test]
    fn missing_username_skips_instead_of_falling_through() {
        let end_time = ts("2025-06-07", 12);
        let anonymous_white = GameRecord {
            end_time: Some(end_time),
            white: Some(GameSide {
                username: None,
                result: Some("win".into()),
            }),
            black: Some(GameSide::new(USER, "lose")),
            ..GameRecord::default()
        };
        let anonymous_black = GameRecord {
            end_time: Some(end_time),
            white: Some(GameSide::new("rival", "win")),
            black: Some(GameSide {
                username: None,
                result: Some("lose".into()),
            }),
            ..GameRecord::default()
        };

        assert_eq!(
            classify_record(USER, &anonymous_white),
            RecordOutcome::Skipped(SkipReason::MissingUsername(Color::White))
        );
        assert_eq!(
            classify_record(USER, &anonymous_black),
            RecordOutcome::Skipped(SkipReason::MissingUsername(Color::Black))
        );

        let summary = aggregate(USER, &[anonymous_white, anonymous_black]);
        assert!(summary.is_empty());
        assert_eq!(summary.skipped.len(), 2);
    }
}

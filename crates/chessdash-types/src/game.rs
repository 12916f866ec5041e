use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::time_control::TimeClass;

/// Result code the archive reports for the side that won.
pub const WIN_RESULT: &str = "win";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

/// One side of a finished game as reported by the archive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSide {
    pub username: Option<String>,
    pub result: Option<String>,
}

impl GameSide {
    pub fn new(username: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            result: Some(result.into()),
        }
    }

    pub fn is_player(&self, username: &str) -> bool {
        self.username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(username))
    }
}

/// A completed game. Every field is optional because archive entries are not
/// guaranteed to be well formed; validation happens at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub url: Option<String>,
    /// Epoch seconds at which the game ended.
    pub end_time: Option<i64>,
    pub time_class: Option<TimeClass>,
    pub white: Option<GameSide>,
    pub black: Option<GameSide>,
}

impl GameRecord {
    /// Lenient conversion from a raw archive entry. Missing or mistyped
    /// fields become `None` instead of failing the whole entry.
    pub fn from_json(value: &Value) -> Self {
        Self {
            url: value.get("url").and_then(Value::as_str).map(str::to_owned),
            end_time: value.get("end_time").and_then(Value::as_i64),
            time_class: value
                .get("time_class")
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse().ok()),
            white: value.get("white").and_then(side_from_json),
            black: value.get("black").and_then(side_from_json),
        }
    }

    pub fn side(&self, color: Color) -> Option<&GameSide> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn is_time_class(&self, time_class: TimeClass) -> bool {
        self.time_class == Some(time_class)
    }
}

fn side_from_json(value: &Value) -> Option<GameSide> {
    if !value.is_object() {
        return None;
    }
    Some(GameSide {
        username: value
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_owned),
        result: value.get("result").and_then(Value::as_str).map(str::to_owned),
    })
}

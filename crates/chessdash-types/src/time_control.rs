use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ChessdashError;

/// Pacing category reported by the archive for every finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeClass {
    #[default]
    Bullet,
    Blitz,
    Rapid,
    Daily,
}

impl TimeClass {
    /// Wire value used by the archive API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeClass::Bullet => "bullet",
            TimeClass::Blitz => "blitz",
            TimeClass::Rapid => "rapid",
            TimeClass::Daily => "daily",
        }
    }

    /// Capitalised form used in headings.
    pub fn label(&self) -> &'static str {
        match self {
            TimeClass::Bullet => "Bullet",
            TimeClass::Blitz => "Blitz",
            TimeClass::Rapid => "Rapid",
            TimeClass::Daily => "Daily",
        }
    }
}

impl fmt::Display for TimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeClass {
    type Err = ChessdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullet" => Ok(TimeClass::Bullet),
            "blitz" => Ok(TimeClass::Blitz),
            "rapid" => Ok(TimeClass::Rapid),
            "daily" => Ok(TimeClass::Daily),
            other => Err(ChessdashError::Configuration(format!(
                "unknown time class '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_class_case_insensitively() {
        assert_eq!("Bullet".parse::<TimeClass>().unwrap(), TimeClass::Bullet);
        assert_eq!(" rapid ".parse::<TimeClass>().unwrap(), TimeClass::Rapid);
        assert!("correspondence".parse::<TimeClass>().is_err());
    }

    #[test]
    fn wire_value_matches_serde_name() {
        let encoded = serde_json::to_string(&TimeClass::Blitz).expect("serialize");
        assert_eq!(encoded, format!("\"{}\"", TimeClass::Blitz.as_str()));
    }
}

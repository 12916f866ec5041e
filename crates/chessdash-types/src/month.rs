use std::{fmt, str::FromStr};

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{ChessdashError, Result};

/// A calendar month addressed by the monthly game archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let candidate = Self { year, month };
        if candidate.is_valid() {
            Ok(candidate)
        } else {
            Err(ChessdashError::Configuration(format!(
                "month must be between 1 and 12, got {month}"
            )))
        }
    }

    /// Month containing the current UTC instant.
    pub fn current() -> Self {
        let now = Utc::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthRef {
    type Err = ChessdashError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ChessdashError::Configuration(format!("expected YYYY-MM, got '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        MonthRef::new(year, month)
    }
}

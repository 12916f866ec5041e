use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    month::MonthRef, summary::DEFAULT_OVERUSE_THRESHOLD, time_control::TimeClass,
    ChessdashError, Result,
};

pub const DEFAULT_BASE_URL: &str = "https://api.chess.com/pub/player";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    #[serde(default)]
    pub time_class: TimeClass,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: String,
    #[serde(default = "default_overuse_threshold")]
    pub overuse_threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
}

/// The two-month window, fetched in `last_month`, `this_month` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthsConfig {
    pub last_month: MonthRef,
    pub this_month: MonthRef,
}

impl MonthsConfig {
    pub fn ending_at(this_month: MonthRef) -> Self {
        Self {
            last_month: this_month.previous(),
            this_month,
        }
    }

    pub fn in_fetch_order(&self) -> [MonthRef; 2] {
        [self.last_month, self.this_month]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub player: PlayerConfig,
    pub fetch: FetchConfig,
    pub report: ReportConfig,
    pub ops: OpsConfig,
    #[serde(default)]
    pub months: Option<MonthsConfig>,
}

fn default_overuse_threshold() -> u32 {
    DEFAULT_OVERUSE_THRESHOLD
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            ChessdashError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            ChessdashError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.player.username.trim().is_empty() {
            return Err(ChessdashError::Configuration(
                "player.username must not be empty".into(),
            ));
        }
        if self.fetch.base_url.trim().is_empty() {
            return Err(ChessdashError::Configuration(
                "fetch.base_url must not be empty".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ChessdashError::Configuration(
                "fetch.user_agent must not be empty; the archive rejects anonymous clients"
                    .into(),
            ));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ChessdashError::Configuration(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.report.output_path.trim().is_empty() {
            return Err(ChessdashError::Configuration(
                "report.output_path must not be empty".into(),
            ));
        }
        if self.report.overuse_threshold == 0 {
            return Err(ChessdashError::Configuration(
                "report.overuse_threshold must be greater than zero".into(),
            ));
        }
        if let Some(months) = &self.months {
            if !months.last_month.is_valid() || !months.this_month.is_valid() {
                return Err(ChessdashError::Configuration(
                    "months entries must use a month between 1 and 12".into(),
                ));
            }
            if months.last_month >= months.this_month {
                return Err(ChessdashError::Configuration(
                    "months.last_month must precede months.this_month".into(),
                ));
            }
        }
        Ok(())
    }

    /// Tracked username, lowercased for URL construction and comparisons.
    pub fn username(&self) -> String {
        self.player.username.trim().to_lowercase()
    }

    /// Configured window, or the current UTC month and the one before it.
    pub fn months(&self) -> MonthsConfig {
        self.months
            .unwrap_or_else(|| MonthsConfig::ending_at(MonthRef::current()))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig {
                username: "cand5d".into(),
            },
            fetch: FetchConfig {
                base_url: DEFAULT_BASE_URL.into(),
                user_agent: DEFAULT_USER_AGENT.into(),
                time_class: TimeClass::Bullet,
                timeout_secs: 15,
            },
            report: ReportConfig {
                output_path: "index.html".into(),
                overuse_threshold: DEFAULT_OVERUSE_THRESHOLD,
            },
            ops: OpsConfig {
                log_level: "info".into(),
            },
            months: Some(MonthsConfig {
                last_month: MonthRef { year: 2025, month: 6 },
                this_month: MonthRef { year: 2025, month: 7 },
            }),
        }
    }
}

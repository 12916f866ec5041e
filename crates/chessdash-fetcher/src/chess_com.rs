use std::time::Duration;

use async_trait::async_trait;
use chessdash_types::{
    config::FetchConfig, game::GameRecord, month::MonthRef, time_control::TimeClass, Result,
};
use tracing::debug;

use crate::{fetcher_error, games_from_body, GameSource};

/// Client for the public chess.com monthly archive endpoint.
pub struct ChessComClient {
    base_url: String,
    time_class: TimeClass,
    http: reqwest::Client,
}

impl ChessComClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| fetcher_error(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            time_class: config.time_class,
            http,
        })
    }

    pub fn archive_url(&self, username: &str, month: MonthRef) -> String {
        format!(
            "{}/{}/games/{:04}/{:02}",
            self.base_url, username, month.year, month.month
        )
    }
}

#[async_trait]
impl GameSource for ChessComClient {
    fn time_class(&self) -> TimeClass {
        self.time_class
    }

    async fn try_fetch(&self, username: &str, month: MonthRef) -> Result<Vec<GameRecord>> {
        let url = self.archive_url(username, month);
        debug!("Requesting archive {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| fetcher_error(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetcher_error(format!("{url} returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|err| fetcher_error(format!("failed to read body from {url}: {err}")))?;
        games_from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessdash_types::config::DashboardConfig;

    fn fetch_config(base_url: &str) -> FetchConfig {
        FetchConfig {
            base_url: base_url.into(),
            timeout_secs: 2,
            ..DashboardConfig::default().fetch
        }
    }

    #[test]
    fn archive_url_is_scoped_to_user_and_month() {
        let client =
            ChessComClient::new(&fetch_config("https://api.chess.com/pub/player/")).unwrap();
        let url = client.archive_url("cand5d", MonthRef::new(2025, 6).unwrap());
        assert_eq!(url, "https://api.chess.com/pub/player/cand5d/games/2025/06");
    }

    #[tokio::test]
    async fn unreachable_archive_yields_empty_month() {
        let client = ChessComClient::new(&fetch_config("http://127.0.0.1:9/pub/player")).unwrap();
        let month = MonthRef::new(2025, 6).unwrap();

        assert!(client.try_fetch("cand5d", month).await.is_err());
        assert!(client.fetch_month("cand5d", month).await.is_empty());
    }
}

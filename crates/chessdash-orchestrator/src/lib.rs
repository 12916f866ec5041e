//! Pipeline coordinating fetcher, aggregator, and renderer.

use std::path::PathBuf;

use chessdash_aggregator::DailyAggregator;
use chessdash_fetcher::GameSource;
use chessdash_ops::{prepare_output_path, write_artifact};
use chessdash_render::DashboardRenderer;
use chessdash_types::{
    config::{DashboardConfig, MonthsConfig},
    game::GameRecord,
    month::MonthRef,
    summary::DailySummary,
    Result,
};
use tracing::info;

/// Games retrieved for one month of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFetch {
    pub month: MonthRef,
    pub games: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub fetched: Vec<MonthFetch>,
    pub summary: DailySummary,
    pub output_path: PathBuf,
}

pub struct DashboardPipeline<S>
where
    S: GameSource,
{
    source: S,
    aggregator: DailyAggregator,
    renderer: DashboardRenderer,
    username: String,
    months: MonthsConfig,
    output_path: String,
}

impl<S> DashboardPipeline<S>
where
    S: GameSource,
{
    pub fn new(config: &DashboardConfig, source: S) -> Self {
        Self {
            renderer: DashboardRenderer::new(source.time_class()),
            source,
            aggregator: DailyAggregator::new(config.report.overuse_threshold),
            username: config.username(),
            months: config.months(),
            output_path: config.report.output_path.clone(),
        }
    }

    /// Fetch each month of the window in order and concatenate the results.
    /// A failed month contributes nothing.
    pub async fn collect(&self) -> (Vec<GameRecord>, Vec<MonthFetch>) {
        let mut games = Vec::new();
        let mut fetched = Vec::new();
        for month in self.months.in_fetch_order() {
            let batch = self.source.fetch_month(&self.username, month).await;
            fetched.push(MonthFetch {
                month,
                games: batch.len(),
            });
            games.extend(batch);
        }
        (games, fetched)
    }

    pub async fn summarize(&self) -> (DailySummary, Vec<MonthFetch>) {
        let (games, fetched) = self.collect().await;
        let summary = self.aggregator.aggregate(&self.username, &games);
        (summary, fetched)
    }

    /// Run the whole pipeline and write the dashboard. Only output errors
    /// are surfaced; fetch and record problems degrade to less data.
    pub async fn run(&self) -> Result<PipelineReport> {
        let (summary, fetched) = self.summarize().await;
        info!(
            "Aggregated {} {} games into {} day(s), {} record(s) skipped",
            summary.total_games(),
            self.source.time_class(),
            summary.rows.len(),
            summary.skipped.len()
        );
        if summary.is_empty() {
            info!("No {} games found", self.source.time_class());
        }

        let html = self.renderer.render(&summary);
        let output_path = prepare_output_path(&self.output_path)?;
        write_artifact(&output_path, &html)?;

        Ok(PipelineReport {
            fetched,
            summary,
            output_path,
        })
    }
}

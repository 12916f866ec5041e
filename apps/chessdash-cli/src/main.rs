use std::{env, path::PathBuf};

use anyhow::Result;
use chessdash_fetcher::ChessComClient;
use chessdash_ops::init_tracing;
use chessdash_orchestrator::{DashboardPipeline, PipelineReport};
use chessdash_types::{
    config::{DashboardConfig, MonthsConfig},
    month::MonthRef,
    time_control::TimeClass,
};
use clap::Parser;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "configs/default.toml";

#[derive(Parser)]
#[command(name = "chessdash")]
#[command(about = "Daily games and win rate dashboard for one chess time class", long_about = None)]
struct Cli {
    /// TOML config file (falls back to CHESSDASH_CONFIG, then configs/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Player whose archive is fetched
    #[arg(short, long)]
    user: Option<String>,
    /// Where the dashboard HTML is written
    #[arg(short, long)]
    output: Option<String>,
    /// Time class to keep (bullet, blitz, rapid, daily)
    #[arg(short, long)]
    time_class: Option<TimeClass>,
    /// Most recent month of the window, as YYYY-MM
    #[arg(short, long)]
    month: Option<MonthRef>,
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut DashboardConfig) {
        if let Some(user) = self.user {
            config.player.username = user;
        }
        if let Some(output) = self.output {
            config.report.output_path = output;
        }
        if let Some(time_class) = self.time_class {
            config.fetch.time_class = time_class;
        }
        if let Some(month) = self.month {
            config.months = Some(MonthsConfig::ending_at(month));
        }
        if let Some(level) = self.log_level {
            config.ops.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.clone());
    cli.apply(&mut config);
    config.validate()?;
    init_tracing(&config.ops)?;

    let months = config.months();
    info!(
        "Building {} dashboard for {} ({} to {})",
        config.fetch.time_class,
        config.username(),
        months.last_month,
        months.this_month
    );

    let source = ChessComClient::new(&config.fetch)?;
    let pipeline = DashboardPipeline::new(&config, source);
    let report = pipeline.run().await?;
    print_report(&report, config.fetch.time_class);
    Ok(())
}

fn load_config(explicit: Option<PathBuf>) -> DashboardConfig {
    let from_env = env::var("CHESSDASH_CONFIG").ok().map(PathBuf::from);
    let path = explicit
        .or(from_env)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    match DashboardConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!(
                    "Invalid config in '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                default_config()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                path.display()
            );
            default_config()
        }
    }
}

fn default_config() -> DashboardConfig {
    let config = DashboardConfig::default();
    debug_assert!(config.validate().is_ok());
    config
}

fn print_report(report: &PipelineReport, time_class: TimeClass) {
    for fetch in &report.fetched {
        println!("{}: {} {} games", fetch.month, fetch.games, time_class);
    }

    let summary = &report.summary;
    if summary.is_empty() {
        println!("No {} games found.", time_class);
    } else {
        println!(
            "{:<12} {:>6} {:>6} {:>14} {:<8}",
            "Date", "Games", "Wins", "Win Rate (%)", "Flag"
        );
        println!("{:-<12} {:->6} {:->6} {:->14} {:-<8}", "", "", "", "", "");
        for row in &summary.rows {
            println!(
                "{:<12} {:>6} {:>6} {:>14.1} {:<8}",
                row.date.format("%Y-%m-%d").to_string(),
                row.games,
                row.wins,
                row.win_rate_percent,
                row.flag.label()
            );
        }
        println!(
            "{} games ({} wins) over {} day(s), {} overuse day(s)",
            summary.total_games(),
            summary.total_wins(),
            summary.rows.len(),
            summary.overuse_days()
        );
    }
    if !summary.skipped.is_empty() {
        println!("{} record(s) skipped", summary.skipped.len());
    }
    println!("Dashboard written to {}", report.output_path.display());
}

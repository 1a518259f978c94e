//! Healthstat CLI
//!
//! - Serve the chart dashboard
//! - Render the dashboard page once to a file
//! - Print a single report
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use healthstat::client::DatasetClient;
use healthstat::config::{generate_default_config, Config};
use healthstat::render::{build_dashboard, render_page, ChartJsRenderer};
use healthstat::report::{ReportData, ReportKind, ReportRunner};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "healthstat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "NY inpatient cancer statistics dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server
    Serve,

    /// Run all reports once and write the dashboard page
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one report and print its points
    Report {
        /// Report name (cancer-by-age-group, mortality-by-race-and-gender)
        name: ReportKind,
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_output(output.as_ref(), &generate_default_config());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.logging.init();

    tracing::info!("Healthstat v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {}", config.dataset.base_url);

    let client = Arc::new(DatasetClient::new(config.dataset.clone())?);
    let runner = Arc::new(ReportRunner::new(client, config.reports.clone()));

    match cli.command {
        Commands::Serve => {
            healthstat::serve(healthstat::AppState::new(runner, &config)).await?;
        }

        Commands::Render { output } => {
            let renderer = ChartJsRenderer::new(config.reports.color_seed);
            let outcomes = build_dashboard(&runner, &renderer).await;

            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            if failed > 0 {
                tracing::warn!("{} of {} charts failed", failed, outcomes.len());
            }

            write_output(output.as_ref(), &render_page(&outcomes, chrono::Utc::now()))?;
        }

        Commands::Report { name, format } => {
            let data = runner
                .run(name)
                .await
                .with_context(|| format!("report {} failed", name))?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_table(&data);
            }
        }

        Commands::Config { .. } => unreachable!("handled before config load"),
    }

    Ok(())
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {:?}", path))?;
            eprintln!("Written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_table(data: &ReportData) {
    match data {
        ReportData::Distribution(points) => {
            println!("{:<24} {}", "Label", "Value");
            println!("{}", "-".repeat(36));
            for point in points {
                println!("{:<24} {}", point.label, point.value);
            }
        }
        ReportData::Comparison(pair) => {
            println!("{:<36} {:<10} {}", "Label", "Male", "Female");
            println!("{}", "-".repeat(58));
            for point in &pair.male {
                let female = pair
                    .female
                    .iter()
                    .find(|p| p.label == point.label)
                    .map(|p| p.value.as_str())
                    .unwrap_or("-");
                println!("{:<36} {:<10} {}", point.label, point.value, female);
            }
        }
    }
}

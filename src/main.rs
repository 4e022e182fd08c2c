use anyhow::Result;
use clap::{Parser, Subcommand};
use perfchart::application::analysis::AnalysisEngine;
use perfchart::application::loader::SeriesLoader;
use perfchart::application::reporting;
use perfchart::config::Config;
use perfchart::infrastructure::chart;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare percent change of spot prices and strategy vaults
    Performance {
        /// Input JSON recording
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Chart destination (PNG)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the percent-change table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Annualized growth rate (gAPR) of one strategy column
    GrowthRate {
        /// Input JSON recording
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Chart destination (PNG)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column the rate is computed over
        #[arg(long)]
        column: Option<String>,

        /// Moving-average window in samples
        #[arg(short, long)]
        window: Option<usize>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Performance { input, output, csv } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.chart_path = output;
            }
            if let Some(csv) = csv {
                config.csv_path = Some(csv);
            }

            let loader = SeriesLoader::new(config.schema.clone());
            let series = loader.load(&config.input_path)?;

            let report = AnalysisEngine::new(config.clone()).performance(&series)?;

            chart::render_performance_chart(
                &config.chart_path,
                config.chart_width,
                config.chart_height,
                &report,
            )?;
            if let Some(csv_path) = &config.csv_path {
                reporting::export_percent_csv(csv_path, &report)?;
            }
            reporting::print_performance_summary(&report);
        }
        Commands::GrowthRate {
            input,
            output,
            column,
            window,
        } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.chart_path = output;
            }
            if let Some(column) = column {
                config.rate_column = column;
            }
            if let Some(window) = window {
                config.smoothing_window = window;
            }

            let loader = SeriesLoader::new(config.schema.clone());
            let series = loader.load(&config.input_path)?;

            let report = AnalysisEngine::new(config.clone()).growth_rate(&series)?;

            chart::render_growth_rate_chart(
                &config.chart_path,
                config.chart_width,
                config.chart_height,
                &report,
            )?;
            reporting::print_growth_rate_summary(&report);
        }
    }

    Ok(())
}

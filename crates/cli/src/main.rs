//! # tweet-audit: Review a Twitter archive with Gemini
//!
//! This is the main entry point for the `tweet-audit` command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tweet_audit::{get_config, Application, RunResult};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the JSON config file holding the evaluation criteria
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert the Twitter archive export into the intermediate tweets CSV
    ExtractTweets,
    /// Ask Gemini about each extracted tweet and record the ones to delete
    AnalyzeTweets,
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Prints the outcome of an operation and maps it to the process exit code.
fn report(operation: &str, result: &RunResult, success_message: String) -> ExitCode {
    if result.success {
        println!("{success_message}");
        return ExitCode::SUCCESS;
    }
    eprintln!(
        "{operation} failed: {}",
        result.error_detail.as_deref().unwrap_or("unknown error")
    );
    if result.processed_count > 0 {
        eprintln!("{} tweets were processed before the failure.", result.processed_count);
    }
    ExitCode::FAILURE
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e}");
    }

    let cli = Cli::parse();

    let settings = match get_config(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut app = Application::new(settings);

    match cli.command {
        Commands::ExtractTweets => {
            info!("Starting tweet extraction");
            println!("Extracting tweets from archive...");
            let result = app.extract_tweets();
            report(
                "Extraction",
                &result,
                format!("Successfully extracted {} tweets", result.processed_count),
            )
        }
        Commands::AnalyzeTweets => {
            info!("Starting tweet analysis");
            println!("Analyzing tweets...");
            let result = app.analyze_tweets().await;
            report(
                "Analysis",
                &result,
                format!(
                    "Successfully analyzed {} tweets. Results saved to {}",
                    result.processed_count,
                    app.settings().processed_results_path.display()
                ),
            )
        }
    }
}

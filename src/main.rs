use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod batch;
mod classifier;
mod config;
mod error;
mod evaluator;
mod message;
mod models;
mod report;
mod score;
mod session;

use crate::classifier::HttpClassifier;
use crate::config::ClassifierConfig;
use crate::evaluator::Evaluator;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "health-score")]
#[command(about = "Heart-rate check and calorie-based health score", long_about = None)]
struct Cli {
    /// Heart-beat check endpoint (defaults to HEALTH_CHECK_URL or the public service)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single reading
    Evaluate {
        #[arg(long)]
        heart_rate: String,
        #[arg(long)]
        calories: Option<String>,
    },
    /// Evaluate readings from a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read heart-rate, calories and tap events from stdin
    Session,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("health_score=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClassifierConfig::from_env()?
        .with_overrides(cli.endpoint, cli.timeout_ms)
        .context("invalid health check configuration")?;
    info!(endpoint = %config.endpoint, timeout_ms = config.timeout_ms, "health check configured");

    let classifier = HttpClassifier::new(&config).context("failed to build HTTP client")?;
    let evaluator = Evaluator::new(classifier);

    match cli.command {
        Commands::Evaluate {
            heart_rate,
            calories,
        } => {
            let evaluation = evaluator.evaluate(&heart_rate, calories.as_deref()).await;
            info!(
                id = %evaluation.id,
                heart_rate = ?evaluation.heart_rate,
                score = ?evaluation.score,
                "evaluated single reading"
            );
            println!("{}", evaluation.message);
        }
        Commands::Batch { csv, out } => {
            let rows = batch::load_readings(&csv)?;
            if rows.is_empty() {
                println!("No readings found in {}.", csv.display());
                return Ok(());
            }

            let evaluations = batch::evaluate_all(&evaluator, &rows).await;
            for evaluation in &evaluations {
                println!("{}", evaluation.message);
            }

            if let Some(out) = out {
                let report = report::build_report(&evaluations, chrono::Utc::now());
                std::fs::write(&out, report)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Session => {
            let session = Session::new(evaluator);
            let mut display = session.subscribe();
            let printer = tokio::spawn(async move {
                loop {
                    match display.recv().await {
                        Ok(text) => println!("{text}"),
                        Err(RecvError::Lagged(skipped)) => warn!("display fell behind by {skipped} updates"),
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let evaluations = session.run(BufReader::new(tokio::io::stdin())).await?;
            printer.await.context("display task failed")?;
            info!("session ended after {} evaluations", evaluations.len());
        }
    }

    Ok(())
}

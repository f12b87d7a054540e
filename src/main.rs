use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use polystore_etl::config::{BenchConfig, TransformConfig};
use polystore_etl::{bench, extract, load, project, writer};

#[derive(Parser)]
#[command(name = "polystore-etl", about = "Multi-target schema transformation pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive the relational, document and graph targets from a dataset
    Transform {
        /// Directory holding the source CSV files
        #[arg(long, default_value = "datasets")]
        dataset_dir: PathBuf,
        /// Root directory for the generated targets
        #[arg(long, default_value = "cleaned_datasets")]
        out_dir: PathBuf,
    },
    /// Time the fixed analysis query against the live backends
    Bench {
        /// Override the number of runs per backend
        #[arg(long)]
        runs: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Transform {
            dataset_dir,
            out_dir,
        } => {
            let config = TransformConfig::new(dataset_dir, out_dir);
            config.validate()?;
            run_transform(&config)?;
        }
        Command::Bench { runs } => {
            let mut config = BenchConfig::from_env()?;
            if let Some(runs) = runs {
                config.runs = runs;
                config.validate()?;
            }
            bench::run(&config).await?;
        }
    }
    Ok(())
}

fn run_transform(config: &TransformConfig) -> Result<()> {
    info!(dataset_dir = %config.dataset_dir.display(), "starting transform run");

    let snapshot = load::load_snapshot(&config.dataset_dir)?;
    let model = extract::derive_model(&snapshot);
    let targets = project::project_all(&model);
    writer::write_all(&targets, config)?;

    info!("transform run complete");
    Ok(())
}

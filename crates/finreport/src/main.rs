//! finreport - Cost Report Pipeline Entry Point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

use finreport::{pipeline, provision::ProvisionRunner, web};
use finreport_common::salted_digest;
use finreport_config::{Config, ConfigLoader};
use finreport_data::{synthesize, write_table, SynthSpec};
use finreport_publish::{ObjectStore, Publisher, S3Store};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic cost dataset and write it as CSV
    Synth {
        /// Output CSV path, overriding the configured source path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the PDF report and summary CSV from a source dataset
    Report {
        /// Input CSV path, overriding the configured source path
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Upload report artifacts to the configured object store
    Publish {
        /// Files to upload; defaults to the configured report outputs
        files: Vec<PathBuf>,
    },
    /// Serve the password-gated report delivery endpoint
    Serve,
    /// Run the provisioning tool sequence (init, plan, apply, output)
    Provision,
    /// Print the salted digest of a password for the web configuration
    HashPassword {
        /// Plaintext password
        password: String,
        /// Salt; defaults to the configured one
        #[arg(short, long)]
        salt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    match args.command {
        Command::Synth { output } => run_synth(&config, output),
        Command::Report { input } => run_report(&config, input).await,
        Command::Publish { files } => run_publish(&config, files).await,
        Command::Serve => run_serve(&config).await,
        Command::Provision => run_provision(&config),
        Command::HashPassword { password, salt } => {
            let salt = salt.unwrap_or_else(|| config.web.password_salt.clone());
            println!("{}", salted_digest(&password, &salt));
            Ok(())
        }
    }
}

fn run_synth(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let spec = SynthSpec {
        days: config.data.synth.days,
        services: config.data.synth.services.clone(),
        regions: config.data.synth.regions.clone(),
        seed: config.data.synth.seed,
        ..SynthSpec::default()
    };
    let table = synthesize(&spec);
    let path = output.unwrap_or_else(|| config.data.csv_path.clone());
    write_table(&table, &path)?;
    info!("wrote {} synthetic rows to {}", table.len(), path.display());
    Ok(())
}

async fn run_report(config: &Config, input: Option<PathBuf>) -> Result<()> {
    let mut config = config.clone();
    if let Some(input) = input {
        config.data.csv_path = input;
    }
    let table = pipeline::acquire(&config);
    let artifacts = pipeline::run_report(&config, &table)?;

    if config.storage.enabled {
        publish(&config, &artifacts.paths()).await;
    }
    Ok(())
}

async fn run_publish(config: &Config, files: Vec<PathBuf>) -> Result<()> {
    let files = if files.is_empty() {
        vec![
            config.report.output_pdf.clone(),
            config.report.summary_csv.clone(),
        ]
    } else {
        files
    };
    publish(config, &files).await;
    Ok(())
}

/// Uploads artifacts, logging failures without aborting: local files stay
/// usable whether or not the transfer worked.
async fn publish(config: &Config, files: &[PathBuf]) {
    let store: Arc<dyn ObjectStore> = Arc::new(
        S3Store::connect(&config.storage.bucket, &config.storage.region).await,
    );
    if let Err(e) = store.ensure_bucket().await {
        warn!("bucket setup failed, uploads may not succeed: {e}");
    }
    let publisher = Publisher::new(store, config.storage.prefix.clone());
    let summary = publisher.publish_files(files).await;
    info!(
        "published {} artifact(s), {} failed",
        summary.uploaded.len(),
        summary.failed.len()
    );
}

async fn run_serve(config: &Config) -> Result<()> {
    if config.web.password_digest.is_empty() {
        anyhow::bail!("web.password_digest is not configured");
    }
    let store: Arc<dyn ObjectStore> = Arc::new(
        S3Store::connect(&config.storage.bucket, &config.storage.region).await,
    );
    web::serve(config, store).await
}

fn run_provision(config: &Config) -> Result<()> {
    let runner = ProvisionRunner::new(&config.provision);
    let outputs = runner.run_sequence()?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

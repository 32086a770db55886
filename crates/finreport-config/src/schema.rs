//! Configuration schema definitions.
//!
//! Everything the original scripts kept as module-level constants (bucket
//! names, hashed passwords, report copy) is explicit configuration here.

use finreport_common::ReportError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the report pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data acquisition configuration.
    pub data: DataConfig,
    /// Report content and output configuration.
    pub report: ReportConfig,
    /// Chart styling configuration.
    pub charts: ChartsConfig,
    /// Object-store configuration.
    pub storage: StorageConfig,
    /// Delivery endpoint configuration.
    pub web: WebConfig,
    /// Provisioning tool configuration.
    pub provision: ProvisionConfig,
}

/// Data acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Source CSV path.
    pub csv_path: PathBuf,
    /// Synthetic data model parameters.
    pub synth: SynthConfig,
}

/// Synthetic data model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Number of days to generate.
    pub days: u32,
    /// Service dimension values.
    pub services: Vec<String>,
    /// Region dimension values.
    pub regions: Vec<String>,
    /// Fixed seed for deterministic replay.
    pub seed: Option<u64>,
}

/// Report content and output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output PDF path.
    pub output_pdf: PathBuf,
    /// Output summary CSV path.
    pub summary_csv: PathBuf,
    /// Report title.
    pub title: String,
    /// Author line on the title page.
    pub prepared_by: String,
    /// Narrative text on the summary page.
    pub summary: String,
    /// How many groups the ranked cost table shows.
    pub top_n: usize,
    /// Usage threshold for the low-usage percentage metric.
    pub low_usage_threshold: f64,
}

/// Chart styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Chart image width in pixels.
    pub width: u32,
    /// Chart image height in pixels.
    pub height: u32,
    /// Whether charts draw a background grid.
    pub grid: bool,
    /// Bin count for histograms.
    pub histogram_bins: usize,
}

/// Object-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Whether publication is attempted at all.
    pub enabled: bool,
    /// Bucket name.
    pub bucket: String,
    /// Bucket region.
    pub region: String,
    /// Key prefix for published artifacts.
    pub prefix: String,
}

/// Delivery endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address for the endpoint.
    pub bind_address: String,
    /// Salt mixed into the credential digest.
    pub password_salt: String,
    /// Expected salted digest of the access credential.
    pub password_digest: String,
}

/// Provisioning tool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Directory holding the provisioning project.
    pub terraform_dir: PathBuf,
    /// Optional variable file passed to plan and apply.
    pub var_file: Option<PathBuf>,
    /// Optional AWS profile exported to the tool's environment.
    pub aws_profile: Option<String>,
}

impl Config {
    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.storage.enabled && self.storage.bucket.is_empty() {
            return Err(ReportError::Config(
                "storage is enabled but no bucket is configured".to_string(),
            ));
        }
        if self.report.top_n == 0 {
            return Err(ReportError::Config(
                "report.top_n must be at least 1".to_string(),
            ));
        }
        if self.data.synth.days == 0 {
            return Err(ReportError::Config(
                "data.synth.days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("cost_data.csv"),
            synth: SynthConfig::default(),
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            days: 30,
            services: vec!["EC2".into(), "S3".into(), "RDS".into(), "Lambda".into()],
            regions: vec![
                "us-east-1".into(),
                "us-west-2".into(),
                "eu-central-1".into(),
            ],
            seed: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_pdf: PathBuf::from("finops_report.pdf"),
            summary_csv: PathBuf::from("finops_summary.csv"),
            title: "Cloud FinOps Report".to_string(),
            prepared_by: "finreport".to_string(),
            summary: "This report analyzes cost and usage data over the reporting \
                      window, breaking down the analysis by service and region. \
                      Costs vary significantly across services; review the ranked \
                      table for the largest contributors and the regional charts \
                      for relocation opportunities. Investigate anomalous daily \
                      spikes before committing to reservations or rightsizing."
                .to_string(),
            top_n: 5,
            low_usage_threshold: 2000.0,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 480,
            grid: true,
            histogram_bins: 20,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: String::new(),
            region: "us-east-1".to_string(),
            prefix: "reports".to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            password_salt: String::new(),
            password_digest: String::new(),
        }
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            terraform_dir: PathBuf::from("."),
            var_file: None,
            aws_profile: None,
        }
    }
}

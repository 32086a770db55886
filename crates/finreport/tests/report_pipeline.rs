//! End-to-end pipeline test: synthesize, persist, reload, report, publish.

use chrono::NaiveDate;
use finreport::pipeline;
use finreport_config::Config;
use finreport_data::{synthesize, write_table, SynthSpec};
use finreport_publish::{MemoryStore, ObjectStore, Publisher};
use std::path::Path;
use std::sync::Arc;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.data.csv_path = dir.join("cost_data.csv");
    config.report.output_pdf = dir.join("finops_report.pdf");
    config.report.summary_csv = dir.join("finops_summary.csv");
    config
}

#[tokio::test]
async fn test_synth_to_published_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // Synthesize and persist the source dataset.
    let source = synthesize(&SynthSpec {
        days: 14,
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        seed: Some(99),
        ..SynthSpec::default()
    });
    write_table(&source, &config.data.csv_path).unwrap();

    // Reload through acquisition and build the report.
    let table = pipeline::acquire(&config);
    assert_eq!(table.len(), source.len());

    let artifacts = pipeline::run_report(&config, &table).unwrap();
    let pdf = std::fs::read(&artifacts.pdf).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let summary = finreport_data::read_table(&artifacts.summary_csv).unwrap();
    assert_eq!(summary.columns, vec!["metric", "value"]);

    // Publish both artifacts into an in-memory store.
    let store = Arc::new(MemoryStore::new());
    let publisher = Publisher::new(store.clone(), "reports");
    let outcome = publisher.publish_files(&artifacts.paths()).await;
    assert!(outcome.failed.is_empty());
    assert_eq!(store.len(), 2);
    assert!(store
        .get_object("reports/finops_report.pdf")
        .await
        .unwrap()
        .starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_store_outage_leaves_local_artifacts_intact() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let table = synthesize(&SynthSpec {
        days: 7,
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        seed: Some(5),
        ..SynthSpec::default()
    });
    let artifacts = pipeline::run_report(&config, &table).unwrap();

    let publisher = Publisher::new(Arc::new(MemoryStore::failing()), "reports");
    let outcome = publisher.publish_files(&artifacts.paths()).await;
    assert_eq!(outcome.failed.len(), 2);

    // The local report is still a readable document afterwards.
    let pdf = std::fs::read(&artifacts.pdf).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

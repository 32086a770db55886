//! Uploads local artifacts under a key prefix, absorbing failures.

use crate::store::ObjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a publication pass. Failures are counted, not propagated:
/// local artifacts remain valid whether or not their upload succeeded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// Keys uploaded successfully.
    pub uploaded: Vec<String>,
    /// Artifacts whose transfer failed.
    pub failed: Vec<PathBuf>,
}

/// Publishes local files into an object store under a key prefix.
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl Publisher {
    /// Creates a publisher. The prefix is joined to each file name with `/`.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Key for a local artifact path.
    pub fn key_for(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), name)
        }
    }

    /// Uploads each file. A failed transfer is logged and recorded in the
    /// summary; it never aborts the remaining uploads or invalidates the
    /// local files.
    pub async fn publish_files(&self, paths: &[PathBuf]) -> PublishSummary {
        let mut summary = PublishSummary::default();
        for path in paths {
            let key = self.key_for(path);
            let body = match std::fs::read(path) {
                Ok(body) => body,
                Err(e) => {
                    warn!("cannot read artifact '{}': {e}", path.display());
                    summary.failed.push(path.clone());
                    continue;
                }
            };
            match self.store.put_object(&key, body).await {
                Ok(()) => {
                    info!("published '{}' as '{key}'", path.display());
                    summary.uploaded.push(key);
                }
                Err(e) => {
                    warn!("publish failed for '{}': {e}", path.display());
                    summary.failed.push(path.clone());
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::io::Write;

    fn write_artifact(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_publishes_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_artifact(dir.path(), "report.pdf", b"%PDF-fake");
        let csv = write_artifact(dir.path(), "summary.csv", b"metric,value");

        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), "reports/2024");
        let summary = publisher.publish_files(&[pdf, csv]).await;

        assert_eq!(
            summary.uploaded,
            vec!["reports/2024/report.pdf", "reports/2024/summary.csv"]
        );
        assert!(summary.failed.is_empty());
        assert_eq!(
            store.get_object("reports/2024/report.pdf").await.unwrap(),
            b"%PDF-fake".to_vec()
        );
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_local_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_artifact(dir.path(), "report.pdf", b"%PDF-fake");

        let store = Arc::new(MemoryStore::failing());
        let publisher = Publisher::new(store, "reports");
        let summary = publisher.publish_files(std::slice::from_ref(&pdf)).await;

        assert!(summary.uploaded.is_empty());
        assert_eq!(summary.failed, vec![pdf.clone()]);
        // The local document still exists and is readable afterwards.
        assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-fake".to_vec());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_written.png");
        let csv = write_artifact(dir.path(), "summary.csv", b"metric,value");

        let store = Arc::new(MemoryStore::new());
        let publisher = Publisher::new(store.clone(), "");
        let summary = publisher.publish_files(&[missing.clone(), csv]).await;

        assert_eq!(summary.failed, vec![missing]);
        assert_eq!(summary.uploaded, vec!["summary.csv"]);
        assert_eq!(store.len(), 1);
    }
}

//! Object-store abstraction consumed by publication and delivery.

use async_trait::async_trait;
use finreport_common::{ReportError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// A named-blob store. All operations are fallible and logged by callers;
/// no local tracking of remote state is kept beyond the call result.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates the backing container if it does not already exist.
    async fn ensure_bucket(&self) -> Result<()>;

    /// Uploads a named object.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// Downloads a named object.
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    /// Lists object keys under a prefix.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>>;
}

/// In-memory store used in tests and local dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_puts: bool,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose uploads always fail, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            fail_puts: true,
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn ensure_bucket(&self) -> Result<()> {
        Ok(())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        if self.fail_puts {
            return Err(ReportError::Publish(format!("simulated upload failure: {key}")));
        }
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| ReportError::Publish("store lock poisoned".into()))?;
        objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| ReportError::Publish("store lock poisoned".into()))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| ReportError::Publish(format!("no such object: {key}")))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| ReportError::Publish("store lock poisoned".into()))?;
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

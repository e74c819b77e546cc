//! Registry test utilities

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use cargo_latest_version::version::error::RegistryError;
use cargo_latest_version::version::registry::Registry;

/// Mock registry answering from a fixed table of latest versions
#[derive(Default)]
pub struct MockRegistry {
    versions: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, package: &str, latest: &str) -> Self {
        self.versions
            .insert(package.to_string(), latest.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.versions
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

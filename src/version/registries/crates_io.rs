//! crates.io registry API implementation

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_REGISTRY_URL, USER_AGENT};
use crate::version::error::RegistryError;
use crate::version::registry::{Registry, is_valid_package_name};

/// Response from `GET /api/v1/crates/{name}`
#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateMetadata,
}

#[derive(Debug, Deserialize)]
struct CrateMetadata {
    max_version: Option<String>,
}

/// Registry implementation for the crates.io web API
pub struct CratesIoRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl CratesIoRegistry {
    /// Creates a new CratesIoRegistry with a custom base URL
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a registry pointing at crates.io
    pub fn crates_io() -> Result<Self, RegistryError> {
        Self::new(DEFAULT_REGISTRY_URL)
    }

    fn crate_url(&self, package_name: &str) -> String {
        format!(
            "{}/api/v1/crates/{}",
            self.base_url,
            urlencoding::encode(package_name)
        )
    }
}

#[async_trait::async_trait]
impl Registry for CratesIoRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        if !is_valid_package_name(package_name) {
            return Err(RegistryError::InvalidName(package_name.to_string()));
        }

        let url = self.crate_url(package_name);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("crates.io returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body: CrateResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse crates.io response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        body.krate.max_version.ok_or_else(|| {
            RegistryError::InvalidResponse(format!("missing crate.max_version for {package_name}"))
        })
    }
}

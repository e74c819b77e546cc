//! Registry trait for looking up the latest published version of a crate

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for fetching the latest version of a package from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the latest published version of a package
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "serde")
    ///
    /// # Returns
    /// * `Ok(String)` - The latest published version (e.g., "1.0.219")
    /// * `Err(RegistryError)` - If the lookup fails
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError>;
}

/// Check that a package name only contains `[A-Za-z0-9_-]` and is not empty
pub fn is_valid_package_name(package_name: &str) -> bool {
    !package_name.is_empty()
        && package_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

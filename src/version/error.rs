use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid crate name: {0:?}")]
    InvalidName(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Crate not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

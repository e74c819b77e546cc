//! Editor-facing side effects of the orchestrator

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageType, Url};
use tracing::{debug, warn};

use crate::annotation::Annotation;

/// Where annotations are rendered and user-facing warnings are shown
#[async_trait]
pub trait Host: Send + Sync {
    /// Replace the annotations displayed for a document
    async fn render(&self, uri: &Url, annotations: Vec<Annotation>);

    /// Show a warning to the user
    async fn warn(&self, message: &str);
}

/// Host backed by the LSP client
///
/// Annotations are served through `textDocument/inlayHint`, so rendering only
/// asks the client to pull them again.
pub struct LspHost {
    client: Client,
    refresh_supported: AtomicBool,
}

impl LspHost {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            refresh_supported: AtomicBool::new(false),
        }
    }

    /// Record whether the client handles `workspace/inlayHint/refresh`
    pub fn set_refresh_supported(&self, supported: bool) {
        self.refresh_supported.store(supported, Ordering::Relaxed);
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Host for LspHost {
    async fn render(&self, uri: &Url, annotations: Vec<Annotation>) {
        debug!("Rendering {} annotations for {}", annotations.len(), uri);

        if !self.refresh_supported.load(Ordering::Relaxed) {
            return;
        }

        if let Err(e) = self.client.inlay_hint_refresh().await {
            warn!("Inlay hint refresh failed: {}", e);
        }
    }

    async fn warn(&self, message: &str) {
        self.client
            .show_message(MessageType::WARNING, message.to_string())
            .await;
    }
}

use std::sync::Arc;

use tower_lsp::{LspService, Server};
use tracing::info;

use crate::lsp::backend::Backend;
use crate::version::registry::Registry;

/// Serve the language server over stdin/stdout until the client exits
pub async fn run_server(registry: Arc<dyn Registry>) -> anyhow::Result<()> {
    info!("Starting cargo-latest-version {}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::build(client, registry));
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}

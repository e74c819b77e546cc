use std::sync::Arc;

use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{info, warn};

use crate::config::{LspConfig, SHOW_LATEST_VERSIONS_COMMAND};
use crate::lsp::host::{Host, LspHost};
use crate::lsp::inlay_hints::inlay_hints_in_range;
use crate::lsp::orchestrator::Orchestrator;
use crate::parser::cargo_toml::CargoTomlParser;
use crate::version::registry::Registry;

pub struct Backend {
    host: Arc<LspHost>,
    orchestrator: Orchestrator,
}

impl Backend {
    /// Build a Backend that resolves versions through `registry`
    pub fn build(client: Client, registry: Arc<dyn Registry>) -> Self {
        let host = Arc::new(LspHost::new(client));
        let orchestrator = Orchestrator::new(
            Arc::clone(&host) as Arc<dyn Host>,
            Arc::new(CargoTomlParser::new()),
            registry,
        );
        Self { host, orchestrator }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            inlay_hint_provider: Some(OneOf::Left(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![SHOW_LATEST_VERSIONS_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        }
    }

    fn client(&self) -> &Client {
        self.host.client()
    }

    fn apply_initialization_options(&self, options: Option<serde_json::Value>) {
        let Some(options) = options else {
            return;
        };

        match serde_json::from_value::<LspConfig>(options) {
            Ok(config) => {
                info!("Using configuration {:?}", config);
                self.orchestrator.set_config(config);
            }
            Err(e) => warn!("Ignoring invalid initializationOptions: {}", e),
        }
    }
}

fn supports_inlay_hint_refresh(capabilities: &ClientCapabilities) -> bool {
    capabilities
        .workspace
        .as_ref()
        .and_then(|workspace| workspace.inlay_hint.as_ref())
        .and_then(|inlay_hint| inlay_hint.refresh_support)
        .unwrap_or(false)
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client()
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        self.host
            .set_refresh_supported(supports_inlay_hint_refresh(&params.capabilities));
        self.apply_initialization_options(params.initialization_options);

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "cargo-latest-version".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client()
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client()
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        self.orchestrator.shutdown();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.client()
            .log_message(
                MessageType::LOG,
                format!("Document opened: {}", params.text_document.uri),
            )
            .await;

        self.orchestrator
            .open(params.text_document.uri, params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.orchestrator
            .change(&params.text_document.uri, &params.content_changes)
            .await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.client()
            .log_message(
                MessageType::LOG,
                format!("Document saved: {}", params.text_document.uri),
            )
            .await;

        self.orchestrator
            .save(&params.text_document.uri, params.text)
            .await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.orchestrator.close(&params.text_document.uri);
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        let annotations = self.orchestrator.annotations(&params.text_document.uri);
        Ok(Some(inlay_hints_in_range(&annotations, params.range)))
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        if params.command != SHOW_LATEST_VERSIONS_COMMAND {
            return Err(Error::invalid_params(format!(
                "Unknown command: {}",
                params.command
            )));
        }

        let uri = params
            .arguments
            .into_iter()
            .next()
            .and_then(|argument| serde_json::from_value::<Url>(argument).ok());

        self.orchestrator.show_latest_versions(uri.as_ref()).await;
        Ok(None)
    }
}

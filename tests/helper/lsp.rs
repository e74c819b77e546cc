//! LSP request/notification test utilities

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tower::Service;
use tower_lsp::jsonrpc::Request;
use tower_lsp::lsp_types::*;
use tower_lsp::{ClientSocket, LspService};

use cargo_latest_version::lsp::backend::Backend;
use cargo_latest_version::version::registry::Registry;

/// Create an LSP initialize request
pub fn create_initialize_request(id: i64, options: Option<serde_json::Value>) -> Request {
    Request::build("initialize")
        .id(id)
        .params(
            serde_json::to_value(InitializeParams {
                initialization_options: options,
                ..Default::default()
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP initialized notification
pub fn create_initialized_notification() -> Request {
    Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).unwrap())
        .finish()
}

/// Create an LSP didOpen notification
pub fn create_did_open_notification(uri: &str, content: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(
            serde_json::to_value(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri.parse().unwrap(),
                    language_id: "toml".to_string(),
                    version: 1,
                    text: content.to_string(),
                },
            })
            .unwrap(),
        )
        .finish()
}

/// Incremental change replacing `start..end` with `text`
pub fn text_change(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range {
            start: Position::new(start.0, start.1),
            end: Position::new(end.0, end.1),
        }),
        range_length: None,
        text: text.to_string(),
    }
}

/// Create an LSP didChange notification
pub fn create_did_change_notification(
    uri: &str,
    version: i32,
    changes: Vec<TextDocumentContentChangeEvent>,
) -> Request {
    Request::build("textDocument/didChange")
        .params(
            serde_json::to_value(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.parse().unwrap(),
                    version,
                },
                content_changes: changes,
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP didSave notification
pub fn create_did_save_notification(uri: &str, text: Option<&str>) -> Request {
    Request::build("textDocument/didSave")
        .params(
            serde_json::to_value(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier {
                    uri: uri.parse().unwrap(),
                },
                text: text.map(str::to_string),
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP didClose notification
pub fn create_did_close_notification(uri: &str) -> Request {
    Request::build("textDocument/didClose")
        .params(
            serde_json::to_value(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier {
                    uri: uri.parse().unwrap(),
                },
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP inlayHint request covering the first 1000 lines
pub fn create_inlay_hint_request(id: i64, uri: &str) -> Request {
    Request::build("textDocument/inlayHint")
        .id(id)
        .params(
            serde_json::to_value(InlayHintParams {
                work_done_progress_params: Default::default(),
                text_document: TextDocumentIdentifier {
                    uri: uri.parse().unwrap(),
                },
                range: Range::new(Position::new(0, 0), Position::new(1000, 0)),
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP executeCommand request
pub fn create_execute_command_request(
    id: i64,
    command: &str,
    arguments: Vec<serde_json::Value>,
) -> Request {
    Request::build("workspace/executeCommand")
        .id(id)
        .params(
            serde_json::to_value(ExecuteCommandParams {
                command: command.to_string(),
                arguments,
                work_done_progress_params: Default::default(),
            })
            .unwrap(),
        )
        .finish()
}

/// Collect notifications in background and return a receiver
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        while let Some(notification) = socket.next().await {
            if tx.send(notification).await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Wait for a notification with the specified method name from the receiver
pub async fn wait_for_notification(
    rx: &mut mpsc::Receiver<Request>,
    method: &str,
) -> Option<Request> {
    let timeout_duration = Duration::from_secs(5);

    loop {
        match timeout(timeout_duration, rx.recv()).await {
            Ok(Some(notification)) => {
                if notification.method() == method {
                    return Some(notification);
                }
                // Skip other notifications (like log_message)
            }
            _ => return None,
        }
    }
}

/// Create an initialized service backed by `registry`
pub async fn start_service(
    registry: Arc<dyn Registry>,
    options: Option<serde_json::Value>,
) -> (LspService<Backend>, mpsc::Receiver<Request>) {
    let (mut service, socket) =
        LspService::build(|client| Backend::build(client, registry)).finish();

    // Start notification collector immediately
    let notification_rx = spawn_notification_collector(socket);

    let init_response = service
        .call(create_initialize_request(1, options))
        .await
        .unwrap();
    assert!(init_response.is_some());

    service
        .call(create_initialized_notification())
        .await
        .unwrap();

    (service, notification_rx)
}

/// Request the inlay hints of a document
pub async fn request_inlay_hints(
    service: &mut LspService<Backend>,
    id: i64,
    uri: &str,
) -> Vec<InlayHint> {
    let response = service
        .call(create_inlay_hint_request(id, uri))
        .await
        .unwrap()
        .expect("Expected inlayHint response");

    let (_, result) = response.into_parts();
    serde_json::from_value::<Option<Vec<InlayHint>>>(result.unwrap())
        .unwrap()
        .unwrap_or_default()
}

/// Labels of inlay hints as `(line, label)` pairs
pub fn hint_labels(hints: &[InlayHint]) -> Vec<(u32, String)> {
    hints
        .iter()
        .map(|hint| {
            let label = match &hint.label {
                InlayHintLabel::String(label) => label.clone(),
                InlayHintLabel::LabelParts(parts) => {
                    parts.iter().map(|part| part.value.as_str()).collect()
                }
            };
            (hint.position.line, label)
        })
        .collect()
}

//! LSP server main loop with request/notification dispatch.
//!
//! Uses `lsp-server` (synchronous, crossbeam-based) for the transport.
//! Every request is answered from the current document text in full; no
//! parse results are cached between messages.

use lsp_server::{Connection, ErrorCode, Message, Notification, Request, Response};
use lsp_types::notification::{
    DidChangeConfiguration, DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
    DidSaveTextDocument, Notification as _, PublishDiagnostics,
};
use lsp_types::request::{
    ColorPresentationRequest, Completion, DocumentColor, DocumentSymbolRequest, HoverRequest,
    Request as _,
};
use lsp_types::{
    ColorProviderCapability, CompletionOptions, CompletionResponse, DocumentSymbolResponse,
    HoverProviderCapability, InitializeParams, InitializeResult, OneOf, PublishDiagnosticsParams,
    SaveOptions, ServerCapabilities, ServerInfo, TextDocumentSyncCapability,
    TextDocumentSyncKind, TextDocumentSyncOptions, TextDocumentSyncSaveOptions, Uri,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::color;
use crate::completion;
use crate::diagnostics;
use crate::document::DocumentState;
use crate::hover;
use crate::settings::Settings;
use crate::symbols;

type Error = Box<dyn std::error::Error>;

/// Failure of a single request, sent back as a JSON-RPC error.
type RequestError = (ErrorCode, String);

/// Run the LSP server over stdio until shutdown.
pub fn run() -> Result<(), Error> {
    let (connection, io_threads) = Connection::stdio();
    serve(&connection)?;
    // The writer thread exits once every sender is gone.
    drop(connection);
    io_threads.join()?;
    Ok(())
}

/// Perform the initialize handshake on `connection`, then answer messages
/// until the client asks for shutdown.
pub fn serve(connection: &Connection) -> Result<(), Error> {
    // ── Initialize handshake ──────────────────────────────────────────
    let (init_id, init_json) = connection.initialize_start()?;
    let init_params: InitializeParams = serde_json::from_value(init_json)?;
    let settings = Settings::from_value(init_params.initialization_options.as_ref());
    let result = InitializeResult {
        capabilities: build_capabilities(),
        server_info: Some(ServerInfo {
            name: "hyprls".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    };
    connection.initialize_finish(init_id, serde_json::to_value(result)?)?;
    info!(ignore = ?settings.ignore, "initialized");

    // ── Main loop ─────────────────────────────────────────────────────
    let mut doc_state = DocumentState::new(settings);

    for msg in &connection.receiver {
        match msg {
            Message::Request(req) => {
                if connection.handle_shutdown(&req)? {
                    info!("shutdown requested");
                    break;
                }
                let resp = handle_request(&doc_state, req);
                connection.sender.send(Message::Response(resp))?;
            }
            Message::Notification(not) => {
                handle_notification(connection, &mut doc_state, not)?;
            }
            Message::Response(_) => {
                // Ignore responses (we don't send requests to the client)
            }
        }
    }
    Ok(())
}

pub fn build_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(false),
                })),
                ..Default::default()
            },
        )),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec!["$".into(), " ".into()]),
            resolve_provider: Some(false),
            ..Default::default()
        }),
        document_symbol_provider: Some(OneOf::Left(true)),
        color_provider: Some(ColorProviderCapability::Simple(true)),
        ..Default::default()
    }
}

// ──────────────────────────────────────────────
// Requests
// ──────────────────────────────────────────────

fn handle_request(doc_state: &DocumentState, req: Request) -> Response {
    debug!(method = %req.method, id = ?req.id, "request");
    let id = req.id.clone();

    let result = match req.method.as_str() {
        m if m == HoverRequest::METHOD => dispatch::<HoverRequest>(req, |params| {
            let uri = &params.text_document_position_params.text_document.uri;
            let position = params.text_document_position_params.position;
            Ok(document_text(doc_state, uri)
                .and_then(|content| hover::compute_hover(&content, position)))
        }),
        m if m == Completion::METHOD => dispatch::<Completion>(req, |params| {
            let uri = &params.text_document_position.text_document.uri;
            let position = params.text_document_position.position;
            Ok(document_text(doc_state, uri).map(|content| {
                CompletionResponse::Array(completion::compute_completions(&content, position))
            }))
        }),
        m if m == DocumentSymbolRequest::METHOD => dispatch::<DocumentSymbolRequest>(req, |params| {
            let uri = &params.text_document.uri;
            if doc_state.is_ignored(uri) {
                return Ok(None);
            }
            let content = doc_state
                .content_or_disk(uri)
                .map_err(|e| (ErrorCode::RequestFailed, format!("while reading document: {e}")))?;
            let root = hyprls_core::parse(&content)
                .map_err(|e| (ErrorCode::RequestFailed, format!("while parsing: {e}")))?;
            Ok(Some(DocumentSymbolResponse::Nested(symbols::document_symbols(&root))))
        }),
        m if m == DocumentColor::METHOD => dispatch::<DocumentColor>(req, |params| {
            let colors = document_text(doc_state, &params.text_document.uri)
                .and_then(|content| hyprls_core::parse(&content).ok())
                .map(|root| color::document_colors(&root))
                .unwrap_or_default();
            Ok(colors)
        }),
        m if m == ColorPresentationRequest::METHOD => {
            dispatch::<ColorPresentationRequest>(req, |params| {
                if doc_state.is_ignored(&params.text_document.uri) {
                    return Ok(Vec::new());
                }
                Ok(color::color_presentations(params.color, params.range))
            })
        }
        m => Err((ErrorCode::MethodNotFound, format!("method not found: {m}"))),
    };

    match result {
        Ok(value) => Response::new_ok(id, value),
        Err((code, message)) => {
            warn!(%message, "request failed");
            Response::new_err(id, code as i32, message)
        }
    }
}

/// Decode the parameters of `req`, run `handler` and encode its result.
fn dispatch<R>(
    req: Request,
    handler: impl FnOnce(R::Params) -> Result<R::Result, RequestError>,
) -> Result<serde_json::Value, RequestError>
where
    R: lsp_types::request::Request,
{
    let params: R::Params = serde_json::from_value(req.params)
        .map_err(|e| (ErrorCode::InvalidParams, e.to_string()))?;
    let result = handler(params)?;
    serde_json::to_value(result).map_err(|e| (ErrorCode::InternalError, e.to_string()))
}

/// Text of a document the server should answer for.
///
/// Ignored documents and unreadable files yield `None`, which features
/// report as an empty result.
fn document_text(doc_state: &DocumentState, uri: &Uri) -> Option<String> {
    if doc_state.is_ignored(uri) {
        debug!(uri = uri.as_str(), "ignored document");
        return None;
    }
    match doc_state.content_or_disk(uri) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(uri = uri.as_str(), error = %e, "cannot read document");
            None
        }
    }
}

// ──────────────────────────────────────────────
// Notifications
// ──────────────────────────────────────────────

fn handle_notification(
    connection: &Connection,
    doc_state: &mut DocumentState,
    not: Notification,
) -> Result<(), Error> {
    debug!(method = %not.method, "notification");
    match not.method.as_str() {
        m if m == DidOpenTextDocument::METHOD => {
            let Some(params) = notification_params::<DidOpenTextDocument>(not) else {
                return Ok(());
            };
            let doc = params.text_document;
            doc_state.open(&doc.uri, doc.version, doc.text);
            publish_for(connection, doc_state, doc.uri)?;
        }
        m if m == DidChangeTextDocument::METHOD => {
            let Some(params) = notification_params::<DidChangeTextDocument>(not) else {
                return Ok(());
            };
            let uri = params.text_document.uri;
            // FULL sync: last content change has the entire document
            if let Some(change) = params.content_changes.into_iter().last() {
                doc_state.change(&uri, params.text_document.version, change.text);
            }
            publish_for(connection, doc_state, uri)?;
        }
        m if m == DidSaveTextDocument::METHOD => {
            let Some(params) = notification_params::<DidSaveTextDocument>(not) else {
                return Ok(());
            };
            publish_for(connection, doc_state, params.text_document.uri)?;
        }
        m if m == DidCloseTextDocument::METHOD => {
            let Some(params) = notification_params::<DidCloseTextDocument>(not) else {
                return Ok(());
            };
            doc_state.close(&params.text_document.uri);
            // Clear diagnostics for closed file
            publish_diagnostics(connection, params.text_document.uri, Vec::new())?;
        }
        m if m == DidChangeConfiguration::METHOD => {
            let Some(params) = notification_params::<DidChangeConfiguration>(not) else {
                return Ok(());
            };
            let settings = Settings::from_value(Some(&params.settings));
            info!(ignore = ?settings.ignore, "settings updated");
            doc_state.set_settings(settings);
        }
        _ => {
            // Unknown notification -- ignore
        }
    }
    Ok(())
}

fn notification_params<N>(not: Notification) -> Option<N::Params>
where
    N: lsp_types::notification::Notification,
    N::Params: DeserializeOwned,
{
    match serde_json::from_value(not.params) {
        Ok(params) => Some(params),
        Err(e) => {
            warn!(method = N::METHOD, error = %e, "malformed notification");
            None
        }
    }
}

/// Recompute and publish diagnostics for `uri` unless it is ignored.
fn publish_for(
    connection: &Connection,
    doc_state: &DocumentState,
    uri: Uri,
) -> Result<(), Error> {
    let diagnostics = match document_text(doc_state, &uri) {
        Some(content) => diagnostics::compute_diagnostics(&content),
        None => Vec::new(),
    };
    publish_diagnostics(connection, uri, diagnostics)
}

/// Send `textDocument/publishDiagnostics` notification to the client.
fn publish_diagnostics(
    connection: &Connection,
    uri: Uri,
    diagnostics: Vec<lsp_types::Diagnostic>,
) -> Result<(), Error> {
    let params = PublishDiagnosticsParams {
        uri,
        diagnostics,
        version: None,
    };
    let not = Notification::new(PublishDiagnostics::METHOD.to_string(), params);
    connection.sender.send(Message::Notification(not))?;
    Ok(())
}

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam_channel::RecvTimeoutError;
use lsp_server::{Connection, Message, Notification, Request, RequestId, Response, ResponseError};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, DidSaveTextDocument,
    Notification as LspNotification, PublishDiagnostics,
};
use lsp_types::request::{
    Completion, DocumentDiagnosticRequest, DocumentSymbolRequest, GotoDefinition, HoverRequest,
    InlayHintRequest, Request as LspRequest, SignatureHelpRequest,
};
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionOptions, CompletionParams, CompletionResponse,
    Diagnostic, DiagnosticOptions, DiagnosticServerCapabilities, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    DocumentDiagnosticParams, DocumentDiagnosticReport, DocumentDiagnosticReportResult,
    DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, FullDocumentDiagnosticReport,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents, HoverParams,
    HoverProviderCapability, InitializeParams, InlayHint, InlayHintKind, InlayHintLabel,
    InlayHintParams, Location, MarkupContent, MarkupKind, OneOf, ParameterInformation,
    ParameterLabel, Position, RelatedFullDocumentDiagnosticReport, ServerCapabilities,
    SignatureHelp, SignatureHelpOptions, SignatureHelpParams, SignatureInformation, SymbolKind,
    TextDocumentSyncCapability, TextDocumentSyncKind, Uri, WorkDoneProgressOptions,
};
use serde::de::DeserializeOwned;
use teal_core::LineRange;

use crate::types::{DID_CHANGE_DEBOUNCE, DocumentState, LOOP_POLL_INTERVAL, ServerState};

/// Runs the language server over stdin/stdout until the client asks it
/// to exit. `debug` appends a protocol trace to the given file.
pub fn run_stdio_server(debug: Option<PathBuf>) -> Result<()> {
    let trace = match debug {
        Some(path) => Some(BufWriter::new(
            File::create(&path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => None,
    };

    let (connection, io_threads) = Connection::stdio();
    let capabilities = server_capabilities();
    let initialize_result = connection.initialize(serde_json::to_value(&capabilities)?)?;
    let _params: InitializeParams =
        serde_json::from_value(initialize_result).context("invalid initialize params")?;

    let mut server = Server {
        connection,
        state: ServerState::default(),
        pending_changes: HashMap::new(),
        trace,
    };
    server.run()?;
    drop(server);
    io_threads.join()?;
    Ok(())
}

struct Server {
    connection: Connection,
    state: ServerState,
    pending_changes: HashMap<Uri, Instant>,
    trace: Option<BufWriter<File>>,
}

impl Server {
    fn run(&mut self) -> Result<()> {
        loop {
            self.flush_due_changes()?;
            let message = match self.connection.receiver.recv_timeout(LOOP_POLL_INTERVAL) {
                Ok(message) => message,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            match message {
                Message::Request(request) => {
                    self.trace(&format!("IN: {}", request.method));
                    if self.connection.handle_shutdown(&request)? {
                        break;
                    }
                    self.handle_request(request)?;
                }
                Message::Notification(notification) => {
                    self.trace(&format!("IN: {}", notification.method));
                    self.handle_notification(notification)?;
                }
                Message::Response(_) => {}
            }
        }
        Ok(())
    }

    fn trace(&mut self, message: &str) {
        if let Some(writer) = &mut self.trace {
            let _ = writeln!(writer, "{message}");
            let _ = writer.flush();
        }
    }

    fn handle_request(&mut self, request: Request) -> Result<()> {
        match request.method.as_str() {
            HoverRequest::METHOD => self.on_hover(request),
            Completion::METHOD => self.on_completion(request),
            InlayHintRequest::METHOD => self.on_inlay_hints(request),
            DocumentSymbolRequest::METHOD => self.on_document_symbols(request),
            SignatureHelpRequest::METHOD => self.on_signature_help(request),
            GotoDefinition::METHOD => self.on_definition(request),
            DocumentDiagnosticRequest::METHOD => self.on_diagnostic(request),
            _ => self.send_error(
                request.id,
                -32601,
                format!("unsupported request '{}'", request.method),
            ),
        }
    }

    fn handle_notification(&mut self, notification: Notification) -> Result<()> {
        match notification.method.as_str() {
            DidOpenTextDocument::METHOD => {
                let params: DidOpenTextDocumentParams = serde_json::from_value(notification.params)
                    .context("invalid didOpen params")?;
                let uri = params.text_document.uri;
                let version = params.text_document.version;
                self.pending_changes.remove(&uri);
                self.state
                    .upsert_document(uri.clone(), params.text_document.text, version);
                let diagnostics = self.state.lsp_diagnostics(&uri);
                self.publish_diagnostics(uri, Some(version), diagnostics)
            }
            DidChangeTextDocument::METHOD => {
                let params: DidChangeTextDocumentParams =
                    serde_json::from_value(notification.params)
                        .context("invalid didChange params")?;
                let uri = params.text_document.uri;
                let version = params.text_document.version;
                // Full-document sync: only the newest change matters.
                let Some(text) = params
                    .content_changes
                    .into_iter()
                    .next_back()
                    .map(|change| change.text)
                else {
                    return Ok(());
                };
                self.state.store_text(uri.clone(), text, version);
                self.pending_changes
                    .insert(uri, Instant::now() + DID_CHANGE_DEBOUNCE);
                Ok(())
            }
            DidSaveTextDocument::METHOD => {
                let params: DidSaveTextDocumentParams = serde_json::from_value(notification.params)
                    .context("invalid didSave params")?;
                let uri = params.text_document.uri;
                self.pending_changes.remove(&uri);
                if let Some(text) = params.text {
                    let version = self.document_version(&uri);
                    self.state.upsert_document(uri.clone(), text, version);
                } else {
                    self.state.analyze_document(&uri);
                }
                let version = self.document_version(&uri);
                let diagnostics = self.state.lsp_diagnostics(&uri);
                self.publish_diagnostics(uri, Some(version), diagnostics)
            }
            DidCloseTextDocument::METHOD => {
                let params: DidCloseTextDocumentParams =
                    serde_json::from_value(notification.params)
                        .context("invalid didClose params")?;
                let uri = params.text_document.uri;
                self.pending_changes.remove(&uri);
                self.state.close_document(&uri);
                self.publish_diagnostics(uri, None, Vec::new())
            }
            _ => Ok(()),
        }
    }

    fn document_version(&self, uri: &Uri) -> i32 {
        self.state
            .documents
            .get(uri)
            .map(|doc| doc.version)
            .unwrap_or_default()
    }

    fn flush_due_changes(&mut self) -> Result<()> {
        let now = Instant::now();
        let due: Vec<Uri> = self
            .pending_changes
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(uri, _)| uri.clone())
            .collect();
        for uri in due {
            self.pending_changes.remove(&uri);
            self.analyze_and_publish(uri)?;
        }
        Ok(())
    }

    fn ensure_document_fresh(&mut self, uri: &Uri) -> Result<()> {
        if self.pending_changes.remove(uri).is_some() {
            self.analyze_and_publish(uri.clone())?;
        }
        Ok(())
    }

    fn analyze_and_publish(&mut self, uri: Uri) -> Result<()> {
        if !self.state.documents.contains_key(&uri) {
            return Ok(());
        }
        self.state.analyze_document(&uri);
        let version = self.document_version(&uri);
        let diagnostics = self.state.lsp_diagnostics(&uri);
        self.publish_diagnostics(uri, Some(version), diagnostics)
    }

    fn on_hover(&mut self, request: Request) -> Result<()> {
        let params: HoverParams = parse_request_params(&request)?;
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        self.ensure_document_fresh(&uri)?;

        let hover = self.state.documents.get(&uri).and_then(|doc| {
            let (line, column) = doc.line_column(position)?;
            let text = doc.result.doc_at(line, column)?;
            Some(Hover {
                contents: HoverContents::Markup(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: text,
                }),
                range: None,
            })
        });
        self.send_result(request.id, &hover)
    }

    fn on_completion(&mut self, request: Request) -> Result<()> {
        let params: CompletionParams = parse_request_params(&request)?;
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        self.ensure_document_fresh(&uri)?;

        let response = self
            .state
            .documents
            .get(&uri)
            .and_then(|doc| completion_items(doc, position))
            .map(CompletionResponse::Array);
        self.send_result(request.id, &response)
    }

    fn on_inlay_hints(&mut self, request: Request) -> Result<()> {
        let params: InlayHintParams = parse_request_params(&request)?;
        let uri = params.text_document.uri;
        self.ensure_document_fresh(&uri)?;

        let hints = self.state.documents.get(&uri).map(|doc| {
            let range = lsp_range_to_core(doc, params.range);
            let hints = doc.result.inlay_hints(range);
            let mut out = Vec::new();
            for hint in hints.named {
                out.push(InlayHint {
                    position: end_position(doc, &hint.token),
                    label: InlayHintLabel::String(hint.name),
                    kind: Some(InlayHintKind::PARAMETER),
                    text_edits: None,
                    tooltip: None,
                    padding_left: Some(true),
                    padding_right: None,
                    data: None,
                });
            }
            for hint in hints.decoded {
                out.push(InlayHint {
                    position: end_position(doc, &hint.token),
                    label: InlayHintLabel::String(hint.value),
                    kind: Some(InlayHintKind::TYPE),
                    text_edits: None,
                    tooltip: None,
                    padding_left: Some(true),
                    padding_right: None,
                    data: None,
                });
            }
            out
        });
        self.send_result(request.id, &hints)
    }

    fn on_document_symbols(&mut self, request: Request) -> Result<()> {
        let params: DocumentSymbolParams = parse_request_params(&request)?;
        let uri = params.text_document.uri;
        self.ensure_document_fresh(&uri)?;

        let response = self.state.documents.get(&uri).map(|doc| {
            let symbols = doc
                .result
                .symbols
                .iter()
                .map(|symbol| {
                    let range = doc.range_for(symbol.position);
                    #[allow(deprecated)]
                    DocumentSymbol {
                        name: symbol.name.clone(),
                        detail: symbol.signature.clone(),
                        kind: SymbolKind::FUNCTION,
                        tags: None,
                        deprecated: None,
                        range,
                        selection_range: range,
                        children: None,
                    }
                })
                .collect::<Vec<_>>();
            DocumentSymbolResponse::Nested(symbols)
        });
        self.send_result(request.id, &response)
    }

    fn on_signature_help(&mut self, request: Request) -> Result<()> {
        let params: SignatureHelpParams = parse_request_params(&request)?;
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        self.ensure_document_fresh(&uri)?;

        let help = self.state.documents.get(&uri).and_then(|doc| {
            let (line, column) = doc.line_column(position)?;
            let first = doc.result.lines.get(line)?.first()?;
            let spec = teal_core::ops().get(&first.text)?;
            let active_parameter = doc
                .result
                .arg_at(line, column)
                .map(|(_, index)| index as u32);
            Some(SignatureHelp {
                signatures: vec![SignatureInformation {
                    label: spec.full_sig.clone(),
                    documentation: Some(lsp_types::Documentation::String(spec.doc.to_string())),
                    parameters: Some(
                        spec.args
                            .iter()
                            .map(|arg| ParameterInformation {
                                label: ParameterLabel::Simple(arg.name.to_string()),
                                documentation: None,
                            })
                            .collect(),
                    ),
                    active_parameter,
                }],
                active_signature: Some(0),
                active_parameter,
            })
        });
        self.send_result(request.id, &help)
    }

    fn on_definition(&mut self, request: Request) -> Result<()> {
        let params: GotoDefinitionParams = parse_request_params(&request)?;
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        self.ensure_document_fresh(&uri)?;

        let response = self.state.documents.get(&uri).and_then(|doc| {
            let (line, column) = doc.line_column(position)?;
            let name = doc
                .result
                .symbol_or_ref_at(LineRange::point(line, column))?
                .to_string();
            let locations = doc
                .result
                .symbols_by_name(&name)
                .into_iter()
                .map(|symbol| Location {
                    uri: doc.uri.clone(),
                    range: doc.range_for(symbol.position),
                })
                .collect::<Vec<_>>();
            Some(GotoDefinitionResponse::Array(locations))
        });
        self.send_result(request.id, &response)
    }

    fn on_diagnostic(&mut self, request: Request) -> Result<()> {
        let params: DocumentDiagnosticParams = parse_request_params(&request)?;
        let uri = params.text_document.uri;
        self.ensure_document_fresh(&uri)?;
        self.state.analyze_document(&uri);

        let items = self.state.lsp_diagnostics(&uri);
        let report = DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items,
                },
            },
        ));
        self.send_result(request.id, &report)
    }

    fn send_result<T: serde::Serialize>(&self, id: RequestId, value: &T) -> Result<()> {
        let result = serde_json::to_value(value)?;
        self.connection
            .sender
            .send(Message::Response(Response::new_ok(id, result)))
            .context("failed to send response")
    }

    fn send_error(&self, id: RequestId, code: i32, message: String) -> Result<()> {
        self.connection
            .sender
            .send(Message::Response(Response {
                id,
                result: None,
                error: Some(ResponseError {
                    code,
                    message,
                    data: None,
                }),
            }))
            .context("failed to send error response")
    }

    fn publish_diagnostics(
        &self,
        uri: Uri,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<()> {
        let params = lsp_types::PublishDiagnosticsParams {
            uri,
            diagnostics,
            version,
        };
        self.connection
            .sender
            .send(Message::Notification(Notification::new(
                PublishDiagnostics::METHOD.to_string(),
                params,
            )))
            .context("failed to publish diagnostics")
    }
}

fn parse_request_params<T: DeserializeOwned>(request: &Request) -> Result<T> {
    serde_json::from_value(request.params.clone())
        .with_context(|| format!("invalid params for '{}'", request.method))
}

fn lsp_range_to_core(doc: &DocumentState, range: lsp_types::Range) -> LineRange {
    let start = doc
        .line_column(range.start)
        .unwrap_or((range.start.line as usize, 0));
    let end = doc
        .line_column(range.end)
        .unwrap_or((range.end.line as usize, usize::MAX));
    LineRange::new(start.0, start.1, end.0, end.1)
}

fn end_position(doc: &DocumentState, token: &teal_core::Token) -> Position {
    doc.range_for(token.position).end
}

/// Completions: opcode mnemonics on the first token of a line, catalog
/// values for the argument under the cursor otherwise.
fn completion_items(doc: &DocumentState, position: Position) -> Option<Vec<CompletionItem>> {
    let (line, column) = doc.line_column(position)?;

    let on_first_token = match doc.result.lines.get(line) {
        Some(tokens) => match tokens.first() {
            Some(first) => column <= first.end(),
            None => true,
        },
        None => true,
    };

    if on_first_token {
        let items = teal_core::ops()
            .iter()
            .map(|spec| CompletionItem {
                label: spec.name.to_string(),
                kind: Some(CompletionItemKind::FUNCTION),
                detail: if spec.args_sig.is_empty() {
                    None
                } else {
                    Some(format!("{} {}", spec.name, spec.args_sig))
                },
                documentation: Some(lsp_types::Documentation::String(spec.doc.to_string())),
                ..CompletionItem::default()
            })
            .collect();
        return Some(items);
    }

    let values = doc.result.arg_values_at(line, column);
    if values.is_empty() {
        return None;
    }
    let items = values
        .into_iter()
        .map(|value| CompletionItem {
            label: value.name,
            kind: Some(match value.value {
                Some(_) => CompletionItemKind::ENUM_MEMBER,
                None => CompletionItemKind::FUNCTION,
            }),
            detail: value.value.map(|v| format!("= {v}")).or(value.signature),
            documentation: if value.docs.is_empty() {
                None
            } else {
                Some(lsp_types::Documentation::String(value.docs))
            },
            ..CompletionItem::default()
        })
        .collect();
    Some(items)
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(false),
            trigger_characters: Some(vec![" ".to_string()]),
            ..CompletionOptions::default()
        }),
        definition_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        inlay_hint_provider: Some(OneOf::Left(true)),
        signature_help_provider: Some(SignatureHelpOptions {
            trigger_characters: Some(vec![" ".to_string()]),
            retrigger_characters: None,
            work_done_progress_options: WorkDoneProgressOptions::default(),
        }),
        diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
            identifier: None,
            inter_file_dependencies: false,
            workspace_diagnostics: false,
            work_done_progress_options: WorkDoneProgressOptions::default(),
        })),
        ..ServerCapabilities::default()
    }
}

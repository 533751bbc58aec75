//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::documents::DocumentStore;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionOptions as LspCompletionOptions, CompletionParams,
    CompletionResponse, Diagnostic, DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse,
    Documentation, GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents,
    HoverParams, HoverProviderCapability, InitializeParams, InitializeResult, InitializedParams,
    Location, MarkupContent, MarkupKind, NumberOrString, OneOf, ParameterInformation,
    ParameterLabel, Position, Range, RenameParams, SemanticToken, SemanticTokenType,
    SemanticTokens, SemanticTokensFullOptions, SemanticTokensLegend, SemanticTokensOptions,
    SemanticTokensParams, SemanticTokensResult, SemanticTokensServerCapabilities,
    ServerCapabilities, ServerInfo, SignatureHelp, SignatureHelpOptions, SignatureHelpParams,
    SignatureInformation, TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextEdit as LspTextEdit, Url, WorkDoneProgressOptions, WorkspaceEdit,
};
use tower_lsp::Client;
use tracing::{debug, info, warn};
use wflang_analysis::{
    CompletionCandidate, CompletionOptions, Document, HoverResult, RenameError, SearchError,
    SignatureHelpResult, TextEdit, WfDiagnostic, WfDocumentSymbol, SEMANTIC_TOKEN_KINDS,
};
use wflang_config::WflangConfig;
use wflang_parser::{Position as WfPosition, Span};

/// JSON-RPC code for a request whose document changed under it.
const CONTENT_MODIFIED: i64 = -32801;

#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }
}

/// The queries the server dispatches to. Tests swap in a recording provider.
pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, document: &Document) -> Vec<u32>;
    fn document_symbols(&self, document: &Document) -> Vec<WfDocumentSymbol>;
    fn hover(&self, document: &Document, position: WfPosition) -> Option<HoverResult>;
    fn completion(
        &self,
        document: &Document,
        position: WfPosition,
        options: CompletionOptions,
    ) -> Vec<CompletionCandidate>;
    fn signature_help(
        &self,
        document: &Document,
        position: WfPosition,
    ) -> std::result::Result<Option<SignatureHelpResult>, SearchError>;
    fn goto_definition(
        &self,
        document: &Document,
        position: WfPosition,
    ) -> std::result::Result<Option<Span>, SearchError>;
    fn rename(
        &self,
        document: &Document,
        position: WfPosition,
        new_name: &str,
    ) -> std::result::Result<Option<Vec<TextEdit>>, RenameError>;
    fn diagnostics(&self, document: &Document) -> Vec<WfDiagnostic>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, document: &Document) -> Vec<u32> {
        wflang_analysis::semantic_tokens(document).to_vec()
    }

    fn document_symbols(&self, document: &Document) -> Vec<WfDocumentSymbol> {
        wflang_analysis::document_symbols(document)
    }

    fn hover(&self, document: &Document, position: WfPosition) -> Option<HoverResult> {
        wflang_analysis::hover(document, position)
    }

    fn completion(
        &self,
        document: &Document,
        position: WfPosition,
        options: CompletionOptions,
    ) -> Vec<CompletionCandidate> {
        wflang_analysis::completion(document, position, options)
    }

    fn signature_help(
        &self,
        document: &Document,
        position: WfPosition,
    ) -> std::result::Result<Option<SignatureHelpResult>, SearchError> {
        wflang_analysis::signature_help(document, position, document.cancellation())
    }

    fn goto_definition(
        &self,
        document: &Document,
        position: WfPosition,
    ) -> std::result::Result<Option<Span>, SearchError> {
        wflang_analysis::goto_definition(document, position, document.cancellation())
    }

    fn rename(
        &self,
        document: &Document,
        position: WfPosition,
        new_name: &str,
    ) -> std::result::Result<Option<Vec<TextEdit>>, RenameError> {
        wflang_analysis::rename(document, position, new_name, document.cancellation())
    }

    fn diagnostics(&self, document: &Document) -> Vec<WfDiagnostic> {
        wflang_analysis::diagnostics(document)
    }
}

pub fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: SEMANTIC_TOKEN_KINDS
            .iter()
            .map(|kind| SemanticTokenType::new(kind.as_str()))
            .collect(),
        token_modifiers: Vec::new(),
    }
}

pub struct WflangLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
    config: WflangConfig,
}

impl WflangLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: WflangConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> WflangLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: WflangConfig) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            features,
            config,
        }
    }

    async fn document(&self, uri: &Url) -> Option<Arc<Document>> {
        self.documents.get(uri).await
    }

    fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            variables: self.config.completion.variables,
            keywords: self.config.completion.keywords,
        }
    }

    async fn publish_diagnostics(&self, uri: Url, document: &Document, version: i32) {
        if !self.config.server.publish_diagnostics {
            return;
        }
        let diagnostics: Vec<Diagnostic> = self
            .features
            .diagnostics(document)
            .iter()
            .map(to_lsp_diagnostic)
            .collect();
        debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, Some(version))
            .await;
    }
}

fn to_lsp_position(position: WfPosition) -> Position {
    Position::new(position.line, position.column)
}

/// Spans include their last character; LSP ranges stop one past it.
fn to_lsp_range(span: &Span) -> Range {
    Range {
        start: to_lsp_position(span.start),
        end: Position::new(span.end.line, span.end.column + 1),
    }
}

fn from_lsp_position(position: Position) -> WfPosition {
    WfPosition::new(position.line, position.character)
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}

fn content_modified() -> Error {
    Error {
        code: ErrorCode::ServerError(CONTENT_MODIFIED),
        message: "content modified".into(),
        data: None,
    }
}

fn search_error(error: SearchError) -> Error {
    match error {
        SearchError::Aborted => content_modified(),
        SearchError::OutOfRange(position) => Error::invalid_params(format!(
            "position {position} is outside the document"
        )),
    }
}

fn rename_error(error: RenameError) -> Error {
    match error {
        RenameError::Aborted => content_modified(),
        other => Error::invalid_params(other.to_string()),
    }
}

fn to_semantic_tokens(data: &[u32]) -> Vec<SemanticToken> {
    data.chunks_exact(5)
        .map(|chunk| SemanticToken {
            delta_line: chunk[0],
            delta_start: chunk[1],
            length: chunk[2],
            token_type: chunk[3],
            token_modifiers_bitset: chunk[4],
        })
        .collect()
}

#[allow(deprecated)]
fn to_document_symbol(symbol: &WfDocumentSymbol) -> DocumentSymbol {
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range: to_lsp_range(&symbol.range),
        selection_range: to_lsp_range(&symbol.selection_range),
        children: None,
        tags: None,
    }
}

fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label,
        kind: Some(candidate.kind),
        detail: candidate.detail,
        insert_text: candidate.insert_text,
        documentation: candidate.documentation.map(markdown),
        ..CompletionItem::default()
    }
}

fn to_signature_help(result: SignatureHelpResult) -> SignatureHelp {
    // Macros have no signature to show.
    if result.label.is_empty() {
        return SignatureHelp {
            signatures: Vec::new(),
            active_signature: None,
            active_parameter: None,
        };
    }
    let parameters = result
        .params
        .into_iter()
        .map(|param| ParameterInformation {
            label: ParameterLabel::LabelOffsets(param.label),
            documentation: Some(Documentation::String(param.documentation)),
        })
        .collect();
    SignatureHelp {
        signatures: vec![SignatureInformation {
            label: result.label,
            documentation: Some(markdown(result.documentation)),
            parameters: Some(parameters),
            active_parameter: Some(result.active_param),
        }],
        active_signature: Some(0),
        active_parameter: Some(result.active_param),
    }
}

fn to_lsp_diagnostic(diagnostic: &WfDiagnostic) -> Diagnostic {
    Diagnostic {
        range: to_lsp_range(&diagnostic.span),
        severity: Some(diagnostic.severity),
        code: Some(NumberOrString::String(diagnostic.code.clone())),
        source: Some("wflang".to_string()),
        message: diagnostic.message.clone(),
        ..Diagnostic::default()
    }
}

fn to_lsp_text_edit(edit: TextEdit) -> LspTextEdit {
    LspTextEdit {
        range: to_lsp_range(&edit.span),
        new_text: edit.new_text,
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for WflangLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            semantic_tokens_provider: Some(
                SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: semantic_tokens_legend(),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                }),
            ),
            completion_provider: Some(LspCompletionOptions::default()),
            signature_help_provider: Some(SignatureHelpOptions {
                trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
                retrigger_characters: None,
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            definition_provider: Some(OneOf::Left(true)),
            rename_provider: Some(OneOf::Left(true)),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "wflang-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("wflang-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: tower_lsp::lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        debug!(uri = %uri, "did_open");
        let document = self.documents.open(uri.clone(), text).await;
        self.publish_diagnostics(uri, &document, version).await;
    }

    async fn did_change(&self, params: tower_lsp::lsp_types::DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let Some(change) = params.content_changes.into_iter().last() else {
            warn!(uri = %uri, "did_change without content");
            return;
        };
        debug!(uri = %uri, version, "did_change");
        let document = self.documents.change(uri.clone(), change.text).await;
        self.publish_diagnostics(uri, &document, version).await;
    }

    async fn did_close(&self, params: tower_lsp::lsp_types::DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(uri = %uri, "did_close");
        self.documents.close(&uri).await;
        if self.config.server.publish_diagnostics {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        if let Some(document) = self.document(&params.text_document.uri).await {
            let data = self.features.semantic_tokens(&document);
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data: to_semantic_tokens(&data),
            })))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        if let Some(document) = self.document(&params.text_document.uri).await {
            let symbols = self.features.document_symbols(&document);
            let converted: Vec<DocumentSymbol> = symbols.iter().map(to_document_symbol).collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let target = params.text_document_position_params;
        if let Some(document) = self.document(&target.text_document.uri).await {
            let position = from_lsp_position(target.position);
            if let Some(result) = self.features.hover(&document, position) {
                return Ok(Some(Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: result.kind,
                        value: result.value,
                    }),
                    range: Some(to_lsp_range(&result.span)),
                }));
            }
        }
        Ok(None)
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let target = params.text_document_position;
        let Some(document) = self.document(&target.text_document.uri).await else {
            return Ok(None);
        };
        let position = from_lsp_position(target.position);
        let items: Vec<CompletionItem> = self
            .features
            .completion(&document, position, self.completion_options())
            .into_iter()
            .map(to_completion_item)
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let target = params.text_document_position_params;
        let Some(document) = self.document(&target.text_document.uri).await else {
            return Ok(None);
        };
        let position = from_lsp_position(target.position);
        let result = self
            .features
            .signature_help(&document, position)
            .map_err(search_error)?;
        Ok(result.map(to_signature_help))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let target = params.text_document_position_params;
        let Some(document) = self.document(&target.text_document.uri).await else {
            return Ok(None);
        };
        let position = from_lsp_position(target.position);
        let span = self
            .features
            .goto_definition(&document, position)
            .map_err(search_error)?;
        Ok(span.map(|span| {
            GotoDefinitionResponse::Scalar(Location {
                uri: target.text_document.uri,
                range: to_lsp_range(&span),
            })
        }))
    }

    async fn rename(&self, params: RenameParams) -> Result<Option<WorkspaceEdit>> {
        let target = params.text_document_position;
        let Some(document) = self.document(&target.text_document.uri).await else {
            return Ok(None);
        };
        let position = from_lsp_position(target.position);
        let edits = self
            .features
            .rename(&document, position, &params.new_name)
            .map_err(rename_error)?;
        Ok(edits.map(|edits| {
            let edits = edits.into_iter().map(to_lsp_text_edit).collect();
            WorkspaceEdit {
                changes: Some(HashMap::from([(target.text_document.uri, edits)])),
                ..WorkspaceEdit::default()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        CompletionItemKind, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
        DidOpenTextDocumentParams, DiagnosticSeverity, SymbolKind, TextDocumentContentChangeEvent,
        TextDocumentIdentifier, TextDocumentPositionParams, VersionedTextDocumentIdentifier,
    };
    use tower_lsp::LanguageServer;
    use wflang_analysis::test_support::{position_of, SAMPLE};

    type Published = Arc<Mutex<Vec<(Url, Vec<Diagnostic>, Option<i32>)>>>;

    #[derive(Clone, Default)]
    struct RecordingClient {
        published: Published,
    }

    #[async_trait]
    impl LspClient for RecordingClient {
        async fn publish_diagnostics(
            &self,
            uri: Url,
            diagnostics: Vec<Diagnostic>,
            version: Option<i32>,
        ) {
            self.published
                .lock()
                .unwrap()
                .push((uri, diagnostics, version));
        }
    }

    #[derive(Default)]
    struct MockFeatureProvider {
        semantic_tokens_called: AtomicUsize,
        hover_called: AtomicUsize,
        completion_called: AtomicUsize,
        last_hover_position: Mutex<Option<WfPosition>>,
        last_completion_options: Mutex<Option<CompletionOptions>>,
    }

    fn first_columns() -> Span {
        Span::new(WfPosition::new(0, 0), WfPosition::new(0, 4))
    }

    impl FeatureProvider for MockFeatureProvider {
        fn semantic_tokens(&self, _: &Document) -> Vec<u32> {
            self.semantic_tokens_called.fetch_add(1, Ordering::SeqCst);
            vec![0, 0, 3, 9, 0, 0, 4, 1, 3, 0]
        }

        fn document_symbols(&self, _: &Document) -> Vec<WfDocumentSymbol> {
            vec![WfDocumentSymbol {
                name: "symbol".into(),
                detail: None,
                kind: SymbolKind::VARIABLE,
                range: first_columns(),
                selection_range: first_columns(),
            }]
        }

        fn hover(&self, _: &Document, position: WfPosition) -> Option<HoverResult> {
            self.hover_called.fetch_add(1, Ordering::SeqCst);
            *self.last_hover_position.lock().unwrap() = Some(position);
            Some(HoverResult {
                kind: MarkupKind::Markdown,
                value: "hover".into(),
                span: first_columns(),
            })
        }

        fn completion(
            &self,
            _: &Document,
            _: WfPosition,
            options: CompletionOptions,
        ) -> Vec<CompletionCandidate> {
            self.completion_called.fetch_add(1, Ordering::SeqCst);
            *self.last_completion_options.lock().unwrap() = Some(options);
            Vec::new()
        }

        fn signature_help(
            &self,
            _: &Document,
            _: WfPosition,
        ) -> std::result::Result<Option<SignatureHelpResult>, SearchError> {
            Err(SearchError::Aborted)
        }

        fn goto_definition(
            &self,
            _: &Document,
            _: WfPosition,
        ) -> std::result::Result<Option<Span>, SearchError> {
            Err(SearchError::Aborted)
        }

        fn rename(
            &self,
            _: &Document,
            _: WfPosition,
            _: &str,
        ) -> std::result::Result<Option<Vec<TextEdit>>, RenameError> {
            Err(RenameError::Aborted)
        }

        fn diagnostics(&self, _: &Document) -> Vec<WfDiagnostic> {
            Vec::new()
        }
    }

    fn config() -> WflangConfig {
        wflang_config::load_defaults().unwrap()
    }

    fn sample_uri() -> Url {
        Url::parse("file:///overtime.wf").unwrap()
    }

    fn at(needle: &str, nth: usize, offset: usize) -> TextDocumentPositionParams {
        let position = position_of(SAMPLE, needle, nth, offset);
        TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: sample_uri() },
            position: Position::new(position.line, position.column),
        }
    }

    async fn open<C: LspClient, P: FeatureProvider>(
        server: &WflangLanguageServer<C, P>,
        text: &str,
    ) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: sample_uri(),
                    language_id: "wflang".into(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
    }

    fn default_server(client: RecordingClient) -> WflangLanguageServer<RecordingClient> {
        WflangLanguageServer::with_features(
            client,
            Arc::new(DefaultFeatureProvider::new()),
            config(),
        )
    }

    #[tokio::test]
    async fn initialize_advertises_capabilities() {
        let server = default_server(RecordingClient::default());
        let result = server.initialize(InitializeParams::default()).await.unwrap();
        let capabilities = result.capabilities;
        assert!(capabilities.completion_provider.is_some());
        assert!(capabilities.rename_provider.is_some());
        assert!(capabilities.definition_provider.is_some());
        let triggers = capabilities
            .signature_help_provider
            .and_then(|options| options.trigger_characters)
            .unwrap();
        assert_eq!(triggers, vec!["(", ","]);
        assert_eq!(result.server_info.unwrap().name, "wflang-lsp");
    }

    #[test]
    fn legend_matches_token_kinds() {
        let legend = semantic_tokens_legend();
        assert_eq!(legend.token_types.len(), SEMANTIC_TOKEN_KINDS.len());
        assert_eq!(legend.token_types[9].as_str(), "keyword");
        assert_eq!(legend.token_types[6].as_str(), "function");
    }

    #[test]
    fn ranges_end_one_past_the_last_character() {
        let span = Span::new(WfPosition::new(2, 4), WfPosition::new(2, 8));
        let range = to_lsp_range(&span);
        assert_eq!(range.start, Position::new(2, 4));
        assert_eq!(range.end, Position::new(2, 9));
    }

    #[tokio::test]
    async fn semantic_tokens_call_feature_layer() {
        let provider = Arc::new(MockFeatureProvider::default());
        let server =
            WflangLanguageServer::with_features(RecordingClient::default(), provider.clone(), config());
        open(&server, SAMPLE).await;

        let result = server
            .semantic_tokens_full(SemanticTokensParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(provider.semantic_tokens_called.load(Ordering::SeqCst), 1);
        let SemanticTokensResult::Tokens(tokens) = result else {
            panic!("expected full tokens");
        };
        assert_eq!(tokens.data.len(), 2);
        assert_eq!(tokens.data[1].delta_start, 4);
        assert_eq!(tokens.data[1].token_type, 3);
    }

    #[tokio::test]
    async fn hover_uses_feature_provider_position() {
        let provider = Arc::new(MockFeatureProvider::default());
        let server =
            WflangLanguageServer::with_features(RecordingClient::default(), provider.clone(), config());
        open(&server, SAMPLE).await;

        let hover = server
            .hover(HoverParams {
                text_document_position_params: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri: sample_uri() },
                    position: Position::new(1, 6),
                },
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(hover.contents, HoverContents::Markup(_)));
        assert_eq!(hover.range.unwrap().end, Position::new(0, 5));
        assert_eq!(provider.hover_called.load(Ordering::SeqCst), 1);
        let stored = provider.last_hover_position.lock().unwrap().unwrap();
        assert_eq!(stored, WfPosition::new(1, 6));
    }

    #[tokio::test]
    async fn completion_passes_configured_options() {
        let provider = Arc::new(MockFeatureProvider::default());
        let mut config = config();
        config.completion.keywords = true;
        let server =
            WflangLanguageServer::with_features(RecordingClient::default(), provider.clone(), config);
        open(&server, SAMPLE).await;

        server
            .completion(CompletionParams {
                text_document_position: at("premium", 0, 0),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
            .unwrap();

        assert_eq!(provider.completion_called.load(Ordering::SeqCst), 1);
        let options = provider.last_completion_options.lock().unwrap().unwrap();
        assert!(options.keywords);
        assert!(options.variables);
    }

    #[tokio::test]
    async fn aborted_queries_report_content_modified() {
        let provider = Arc::new(MockFeatureProvider::default());
        let server =
            WflangLanguageServer::with_features(RecordingClient::default(), provider, config());
        open(&server, SAMPLE).await;

        let error = server
            .goto_definition(GotoDefinitionParams {
                text_document_position_params: at("worked", 1, 0),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::ServerError(CONTENT_MODIFIED));

        let error = server
            .rename(RenameParams {
                text_document_position: at("worked", 1, 0),
                new_name: "hours_worked".into(),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::ServerError(CONTENT_MODIFIED));
    }

    #[tokio::test]
    async fn requests_without_document_return_none() {
        let server = default_server(RecordingClient::default());

        let hover = server
            .hover(HoverParams {
                text_document_position_params: at("max", 0, 0),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(hover.is_none());

        let tokens = server
            .semantic_tokens_full(SemanticTokensParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(tokens.is_none());
    }

    #[tokio::test]
    async fn open_and_change_publish_diagnostics() {
        let client = RecordingClient::default();
        let server = default_server(client.clone());
        open(&server, "var sum = 1;").await;

        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "var total = 1;\ntotal".into(),
                }],
            })
            .await;

        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;

        let published = client.published.lock().unwrap();
        assert_eq!(published.len(), 3);
        let (_, diagnostics, version) = &published[0];
        assert_eq!(*version, Some(1));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            diagnostics[0].code,
            Some(NumberOrString::String("reserved word".into()))
        );
        assert_eq!(diagnostics[0].range.start, Position::new(0, 4));
        assert_eq!(diagnostics[0].range.end, Position::new(0, 7));
        assert!(published[1].1.is_empty());
        assert_eq!(published[1].2, Some(2));
        assert!(published[2].1.is_empty());
    }

    #[tokio::test]
    async fn diagnostics_can_be_disabled() {
        let client = RecordingClient::default();
        let mut config = config();
        config.server.publish_diagnostics = false;
        let server = WflangLanguageServer::with_features(
            client.clone(),
            Arc::new(DefaultFeatureProvider::new()),
            config,
        );
        open(&server, "var sum = 1;").await;
        assert!(client.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn definition_points_at_declaration() {
        let server = default_server(RecordingClient::default());
        open(&server, SAMPLE).await;

        let response = server
            .goto_definition(GotoDefinitionParams {
                text_document_position_params: at("premium", 2, 0),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        let GotoDefinitionResponse::Scalar(location) = response else {
            panic!("expected a single location");
        };
        let declared = position_of(SAMPLE, "premium", 0, 0);
        assert_eq!(location.uri, sample_uri());
        assert_eq!(
            location.range.start,
            Position::new(declared.line, declared.column)
        );
        assert_eq!(
            location.range.end,
            Position::new(declared.line, declared.column + "premium".len() as u32)
        );
    }

    #[tokio::test]
    async fn rename_returns_workspace_edit() {
        let server = default_server(RecordingClient::default());
        open(&server, SAMPLE).await;

        let edit = server
            .rename(RenameParams {
                text_document_position: at("premium", 1, 0),
                new_name: "bonus".into(),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();
        let changes = edit.changes.unwrap();
        let edits = &changes[&sample_uri()];
        assert_eq!(edits.len(), 3);
        assert!(edits.iter().all(|edit| edit.new_text == "bonus"));

        let error = server
            .rename(RenameParams {
                text_document_position: at("premium", 1, 0),
                new_name: "sum".into(),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidParams);
    }

    #[tokio::test]
    async fn signature_help_reports_active_parameter() {
        let server = default_server(RecordingClient::default());
        open(&server, SAMPLE).await;

        let help = server
            .signature_help(SignatureHelpParams {
                context: None,
                text_document_position_params: at("hours", 0, 0),
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(help.signatures.len(), 1);
        assert!(help.signatures[0].label.starts_with("sumTime("));
        assert_eq!(help.active_parameter, Some(1));
    }

    #[tokio::test]
    async fn completion_lists_builtins_with_markdown_docs() {
        let server = default_server(RecordingClient::default());
        open(&server, SAMPLE).await;

        let response = server
            .completion(CompletionParams {
                text_document_position: at("if(", 0, 0),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
                context: None,
            })
            .await
            .unwrap()
            .unwrap();

        let CompletionResponse::Array(items) = response else {
            panic!("expected an item array");
        };
        let max = items.iter().find(|item| item.label == "max").unwrap();
        assert_eq!(max.kind, Some(CompletionItemKind::FUNCTION));
        assert!(matches!(max.documentation, Some(Documentation::MarkupContent(_))));
        assert!(items.iter().any(|item| item.label == "premium"));
    }

    #[test]
    fn macro_signature_help_has_no_signatures() {
        let help = to_signature_help(SignatureHelpResult::default());
        assert!(help.signatures.is_empty());
        assert_eq!(help.active_parameter, None);
    }

    proptest! {
        #[test]
        fn positions_convert_losslessly(line in 0u32..10_000, column in 0u32..10_000) {
            let position = WfPosition::new(line, column);
            prop_assert_eq!(from_lsp_position(to_lsp_position(position)), position);
        }
    }
}

//! Document synchronization handlers.

use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
};

use super::super::backend::Backend;
use crate::document::Document;

pub async fn handle_did_open(backend: &Backend, params: DidOpenTextDocumentParams) {
    let uri = params.text_document.uri;
    let text = params.text_document.text;

    tracing::debug!(uri = %uri, "document opened");

    let mut documents = backend.state.documents.lock().await;
    documents.insert(uri, Document::new(text));
}

pub async fn handle_did_change(backend: &Backend, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;

    // FULL 同期なので最後の変更が全文
    let Some(change) = params.content_changes.into_iter().next_back() else {
        return;
    };

    tracing::debug!(uri = %uri, "document changed");

    let mut documents = backend.state.documents.lock().await;
    documents.entry(uri).or_default().set_text(change.text);
}

pub async fn handle_did_close(backend: &Backend, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;

    tracing::debug!(uri = %uri, "document closed");

    let mut documents = backend.state.documents.lock().await;
    documents.remove(&uri);
}

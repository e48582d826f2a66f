//! Session controller: turns UI events into remote calls and applies the
//! completions back onto the session.
//!
//! Everything here runs on the UI thread. Network work happens on runner
//! threads; their results are picked up by [`SessionController::poll`].

use crate::runner::{spawn_call, CallKind, PendingCall};
use crate::session::Session;
use crate::utils::{
    chat_error_message, document_loaded_message, search_summary, DOCUMENT_FAILED_MESSAGE,
};
use providers::{ApiFailure, ChatRequest, TaskApi};
use shared::{Document, SearchResult, SearchSource, Stage};
use std::path::PathBuf;
use std::sync::Arc;

pub struct SessionController {
    session: Session,
    api: Arc<dyn TaskApi>,
    chat: Option<PendingCall<String>>,
    search: Option<PendingCall<Vec<SearchResult>>>,
    extract: Option<PendingCall<Document>>,
}

impl SessionController {
    pub fn new(session: Session, api: Arc<dyn TaskApi>) -> Self {
        Self {
            session,
            api,
            chat: None,
            search: None,
            extract: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_chat_in_flight(&self) -> bool {
        self.chat.is_some()
    }

    pub fn is_search_in_flight(&self) -> bool {
        self.search.is_some()
    }

    pub fn is_extract_in_flight(&self) -> bool {
        self.extract.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.is_chat_in_flight() || self.is_search_in_flight() || self.is_extract_in_flight()
    }

    /// Send a chat message. Returns false (and does nothing) when the text is
    /// blank or a chat call is already running.
    pub fn submit_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.is_chat_in_flight() {
            return false;
        }

        // Show the user's message before any network activity
        self.session.push_user(text);

        let request = ChatRequest {
            message: text.to_string(),
            stage: self.session.stage(),
            context: self.session.search_context(),
            documents: self.session.document_context(),
        };
        let api = Arc::clone(&self.api);
        self.chat = Some(spawn_call(CallKind::Chat, move || async move {
            api.chat(request).await
        }));
        true
    }

    /// Switch the current stage. Purely local; never touches the network.
    pub fn set_stage(&mut self, stage: Stage) {
        if self.session.stage() != stage {
            tracing::info!(
                from = self.session.stage().as_str(),
                to = stage.as_str(),
                "stage changed"
            );
        }
        self.session.set_stage(stage);
    }

    /// Start a web search. Returns false when the query is blank or a search
    /// is already running.
    pub fn run_search(&mut self, query: &str, scholarly: bool) -> bool {
        let query = query.trim();
        if query.is_empty() || self.is_search_in_flight() {
            return false;
        }

        let source = SearchSource::from_scholarly(scholarly);
        let query = query.to_string();
        let api = Arc::clone(&self.api);
        self.search = Some(spawn_call(CallKind::Search, move || async move {
            api.search(&query, source).await
        }));
        true
    }

    /// Upload a PDF for text extraction. Returns false while another
    /// extraction is running.
    pub fn upload_document(&mut self, path: PathBuf) -> bool {
        if self.is_extract_in_flight() {
            return false;
        }

        let api = Arc::clone(&self.api);
        self.extract = Some(spawn_call(CallKind::Extract, move || async move {
            api.extract_pdf(&path).await
        }));
        true
    }

    /// Apply any finished calls to the session. Never blocks. Returns true
    /// when the session changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        if let Some(outcome) = self.chat.as_ref().and_then(|c| c.try_complete()) {
            self.chat = None;
            self.finish_chat(outcome);
            changed = true;
        }
        if let Some(outcome) = self.search.as_ref().and_then(|c| c.try_complete()) {
            self.search = None;
            self.finish_search(outcome);
            changed = true;
        }
        if let Some(outcome) = self.extract.as_ref().and_then(|c| c.try_complete()) {
            self.extract = None;
            self.finish_extract(outcome);
            changed = true;
        }

        changed
    }

    fn finish_chat(&mut self, outcome: Result<String, ApiFailure>) {
        match outcome {
            Ok(reply) => self.session.push_assistant(reply),
            Err(failure) => {
                tracing::warn!("chat failed: {}", failure);
                self.session.push_assistant(chat_error_message(&failure.reason));
            }
        }
    }

    fn finish_search(&mut self, outcome: Result<Vec<SearchResult>, ApiFailure>) {
        // A failed search reads as an empty one
        let results = outcome.unwrap_or_else(|failure| {
            tracing::warn!("search failed: {}", failure);
            Vec::new()
        });
        let summary = search_summary(&results);
        self.session.replace_search_results(results);
        self.session.push_assistant(summary);
    }

    fn finish_extract(&mut self, outcome: Result<Document, ApiFailure>) {
        match outcome {
            Ok(doc) => {
                tracing::info!(
                    filename = %doc.filename,
                    pages = doc.page_count,
                    "document loaded"
                );
                let message = document_loaded_message(&doc);
                self.session.add_document(doc);
                self.session.push_assistant(message);
            }
            Err(failure) => {
                tracing::warn!("document extraction failed: {}", failure);
                self.session.push_assistant(DOCUMENT_FAILED_MESSAGE);
            }
        }
    }
}

//! The in-memory session: transcript, documents, search results and stage.
//!
//! Transcript and document list are append-only. Nothing here is written to
//! disk; a session lives exactly as long as the process.

use shared::text::truncate_chars;
use shared::{ConversationEntry, Document, SearchResult, Stage};

/// How many search results feed the chat context
pub const CONTEXT_RESULT_LIMIT: usize = 5;
/// Snippet characters per search result in the chat context
pub const CONTEXT_SNIPPET_CHARS: usize = 150;

const WELCOME_MESSAGE: &str = "Hi! I'm MKAI, an assistant for working through problems.\n\n\
Describe your task and I'll help you solve it step by step:\n\
• Problem analysis\n\
• Setting goals\n\
• Planning\n\
• Research\n\
• Doing the work\n\
• Solution";

pub struct Session {
    id: String,
    entries: Vec<ConversationEntry>,
    documents: Vec<Document>,
    search_results: Vec<SearchResult>,
    stage: Stage,
}

impl Session {
    /// Empty session with the given id, starting at the first stage.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
            documents: Vec::new(),
            search_results: Vec::new(),
            stage: Stage::default(),
        }
    }

    /// Fresh session for a new process: random short id plus the welcome message.
    pub fn start() -> Self {
        let mut session = Self::new(new_session_id());
        session.push_assistant(WELCOME_MESSAGE);
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ConversationEntry::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(ConversationEntry::assistant(content));
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Swap in a new result set; the previous one is dropped, never merged.
    pub fn replace_search_results(&mut self, results: Vec<SearchResult>) {
        self.search_results = results;
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn is_completed(&self, stage: Stage) -> bool {
        stage.is_before(self.stage)
    }

    pub fn completed_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|s| self.is_completed(*s))
            .collect()
    }

    /// Search results rendered for the chat request, one `[domain] title: snippet` per line.
    pub fn search_context(&self) -> String {
        self.search_results
            .iter()
            .take(CONTEXT_RESULT_LIMIT)
            .map(|r| {
                format!(
                    "[{}] {}: {}",
                    r.domain,
                    r.title,
                    truncate_chars(&r.snippet, CONTEXT_SNIPPET_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn document_context(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|d| d.context_excerpt().to_string())
            .collect()
    }
}

fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    fn result(i: usize, snippet: &str) -> SearchResult {
        SearchResult {
            title: format!("Result {}", i),
            url: format!("https://site{}.org/page", i),
            snippet: snippet.to_string(),
            domain: format!("site{}.org", i),
        }
    }

    #[test]
    fn test_start_has_id_and_welcome() {
        let s = Session::start();
        assert_eq!(s.id().len(), 8);
        assert_eq!(s.entries().len(), 1);
        assert_eq!(s.entries()[0].role(), Role::Assistant);
        assert_eq!(s.stage(), Stage::Analysis);
        assert!(s.documents().is_empty());
        assert!(s.search_results().is_empty());
    }

    #[test]
    fn test_session_ids_differ() {
        assert_ne!(Session::start().id(), Session::start().id());
    }

    #[test]
    fn test_completed_set_matches_stage_order() {
        let mut s = Session::new("t");
        for current in Stage::ALL {
            s.set_stage(current);
            for other in Stage::ALL {
                assert_eq!(
                    s.completed_stages().contains(&other),
                    other.index() < current.index()
                );
            }
        }
    }

    #[test]
    fn test_set_stage_idempotent() {
        let mut once = Session::new("a");
        once.set_stage(Stage::Research);
        let mut twice = Session::new("b");
        twice.set_stage(Stage::Research);
        twice.set_stage(Stage::Research);
        assert_eq!(once.stage(), twice.stage());
        assert_eq!(once.completed_stages(), twice.completed_stages());
        assert_eq!(
            twice.completed_stages(),
            vec![Stage::Analysis, Stage::Goals, Stage::Planning]
        );
    }

    #[test]
    fn test_context_limits() {
        let mut s = Session::new("t");
        let long_snippet = "s".repeat(400);
        s.replace_search_results((0..8).map(|i| result(i, &long_snippet)).collect());
        s.add_document(Document::new("big.pdf", "d".repeat(5000), 3));

        let context = s.search_context();
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            format!("[site0.org] Result 0: {}", "s".repeat(150))
        );
        assert!(!context.contains("Result 5"));

        let docs = s.document_context();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].chars().count(), 3000);
        // full text is still retained
        assert_eq!(s.documents()[0].content.len(), 5000);
    }

    #[test]
    fn test_empty_context() {
        let s = Session::new("t");
        assert_eq!(s.search_context(), "");
        assert!(s.document_context().is_empty());
    }

    #[test]
    fn test_replace_search_results_discards_previous() {
        let mut s = Session::new("t");
        s.replace_search_results(vec![result(1, "a"), result(2, "b")]);
        s.replace_search_results(vec![result(3, "c")]);
        assert_eq!(s.search_results().len(), 1);
        assert_eq!(s.search_results()[0].title, "Result 3");
        s.replace_search_results(Vec::new());
        assert!(s.search_results().is_empty());
    }
}

//! Uploaded documents and web search results.

use crate::text::truncate_chars;
use serde::{Deserialize, Serialize};

/// Characters of a document's text sent along with each chat request
pub const DOCUMENT_CONTEXT_CHARS: usize = 3000;

/// Text extracted from an uploaded PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content: String,
    pub page_count: u32,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<String>, page_count: u32) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            page_count,
        }
    }

    /// Leading slice of the content used as chat context; the full text stays here.
    pub fn context_excerpt(&self) -> &str {
        truncate_chars(&self.content, DOCUMENT_CONTEXT_CHARS)
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// One hit from the remote search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    pub domain: String,
}

/// Which index the remote service should search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    General,
    Scholar,
}

impl SearchSource {
    pub fn from_scholarly(scholarly: bool) -> Self {
        if scholarly {
            SearchSource::Scholar
        } else {
            SearchSource::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSource::General => "general",
            SearchSource::Scholar => "scholar",
        }
    }
}

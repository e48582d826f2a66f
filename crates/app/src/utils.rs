//! Utility functions for the MKAI app
//!
//! Transcript message wording and settings loading.

use anyhow::{Context, Result};
use shared::settings::ClientSettings;
use shared::text::{group_thousands, truncate_chars};
use shared::{Document, SearchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Results listed in a search summary message
pub const SUMMARY_RESULT_LIMIT: usize = 3;
/// Snippet characters per result in a search summary message
pub const SUMMARY_SNIPPET_CHARS: usize = 200;

pub const NOTHING_FOUND_MESSAGE: &str = "Nothing found.";
pub const DOCUMENT_FAILED_MESSAGE: &str = "❌ Failed to load document";

/// Environment variable that overrides `api_url`
pub const API_URL_ENV: &str = "MKAI_API_URL";

pub fn chat_error_message(reason: &str) -> String {
    format!("❌ Error: {}", reason)
}

/// Transcript message announcing a new search result set.
pub fn search_summary(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NOTHING_FOUND_MESSAGE.to_string();
    }
    let top = results
        .iter()
        .take(SUMMARY_RESULT_LIMIT)
        .map(|r| {
            format!(
                "**{}**\n{}\n{}...",
                r.title,
                r.domain,
                truncate_chars(&r.snippet, SUMMARY_SNIPPET_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("🔍 Found {} results. Top 3:\n\n{}", results.len(), top)
}

pub fn document_loaded_message(doc: &Document) -> String {
    format!(
        "📄 Document loaded: {}\nPages: {} | Characters: {}",
        doc.filename,
        doc.page_count,
        group_thousands(doc.char_count())
    )
}

/// Sidebar label for an uploaded document
pub fn short_filename(name: &str) -> String {
    format!("• {}...", truncate_chars(name, 20))
}

pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.local", "MKAI", "MKAI")
        .map(|proj| proj.config_dir().join("settings.json"))
}

/// Read settings from `path`. A missing file means defaults.
pub fn read_settings(path: &Path) -> Result<ClientSettings> {
    if !path.exists() {
        return Ok(ClientSettings::default());
    }
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn apply_env_overrides(settings: &mut ClientSettings, api_url: Option<String>) {
    if let Some(url) = api_url {
        let url = url.trim();
        if !url.is_empty() {
            settings.api_url = url.to_string();
        }
    }
}

/// Settings from the config dir (or defaults), then environment overrides.
pub fn load_settings_or_default() -> ClientSettings {
    let mut settings = match config_path() {
        Some(path) => read_settings(&path).unwrap_or_else(|e| {
            tracing::warn!("ignoring settings file: {:#}", e);
            ClientSettings::default()
        }),
        None => ClientSettings::default(),
    };
    apply_env_overrides(&mut settings, std::env::var(API_URL_ENV).ok());
    settings
}

//! The extracted page record shared by all three execution contexts.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of page text kept in a record.
pub const MAX_CONTENT_CHARS: usize = 8000;

/// Appended to `content` when the page text was cut at [`MAX_CONTENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated...]";

/// Bounded text + metadata summary of one page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContentRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 extraction timestamp.
    #[serde(default)]
    pub extracted_at: String,
}

impl PageContentRecord {
    /// Record carrying an extraction error in place of page text.
    pub fn degraded(title: &str, url: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            description: String::new(),
            content: format!("Error extracting page content: {}", message),
            extracted_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the record carries any page text at all.
    pub fn is_usable(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Whether `content` was cut at the character limit.
    pub fn is_truncated(&self) -> bool {
        self.content.ends_with(TRUNCATION_MARKER)
    }

    /// Render the record as the block of text handed to the model.
    pub fn format_for_prompt(&self) -> String {
        let mut formatted = String::new();
        if !self.title.is_empty() {
            formatted.push_str(&format!("Title: {}\n", self.title));
        }
        if !self.url.is_empty() {
            formatted.push_str(&format!("URL: {}\n", self.url));
        }
        if !self.description.is_empty() {
            formatted.push_str(&format!("Description: {}\n", self.description));
        }
        if !self.content.is_empty() {
            formatted.push_str(&format!("\nContent:\n{}", self.content));
        }
        if formatted.is_empty() {
            "No content available".to_string()
        } else {
            formatted
        }
    }
}

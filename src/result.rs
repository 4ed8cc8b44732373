//! Result types for extraction and structuring output.
//!
//! `ScrapedContent` is what the extraction stage produces once per job;
//! `StructuredContent` is the canonical sectioned document every export is
//! rendered from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which step of the content cascade produced the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "selector", rename_all = "camelCase")]
pub enum ContentSource {
    /// Main-content extraction was disabled; the whole body was taken.
    Body,
    /// A content-area descriptor matched.
    Descriptor(String),
    /// Question headings paired with their following blocks.
    HeadingScan,
    /// Nothing matched; the body was taken after a second noise pass.
    Aggressive,
}

/// An image referenced by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Absolute image URL when the page URL allowed resolving it.
    pub src: String,

    /// Alt text, if any.
    pub alt: Option<String>,
}

/// Facts about the scraped page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    pub scraped_at: DateTime<Utc>,
    pub word_count: usize,
    pub has_images: bool,
    pub link_count: usize,
}

/// Output of the extraction stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedContent {
    pub url: String,
    pub title: String,
    pub description: String,

    /// Cleaned plain text, capped at `max_content_length` plus the marker.
    pub content: String,

    /// Heuristic heading/body text, when requested.
    pub raw_formatted: Option<String>,

    /// Image references, when `process_images` is on.
    pub images: Vec<ImageRef>,

    pub source: ContentSource,
    pub metadata: ScrapeMetadata,
}

/// Relative importance of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Primary,
    #[default]
    Secondary,
    Supporting,
}

impl Priority {
    /// Lenient parse used on organizer output.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" | "high" => Some(Self::Primary),
            "secondary" | "medium" => Some(Self::Secondary),
            "supporting" | "low" => Some(Self::Supporting),
            _ => None,
        }
    }
}

/// One section of a structured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub topics: Vec<String>,
}

/// Summary counters of a structured document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMetadata {
    pub word_count: usize,
    pub section_count: usize,
    pub topic_count: usize,
    pub confidence: f64,
    pub extracted_at: DateTime<Utc>,
}

/// The canonical sectioned document.
///
/// Build it through the assembler so `section_count` and `topic_count`
/// always agree with `sections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredContent {
    pub title: String,
    pub summary: String,
    pub sections: Vec<ContentSection>,
    pub metadata: StructuredMetadata,
}

impl StructuredContent {
    /// Sum of topic counts over all sections.
    #[must_use]
    pub fn total_topics(&self) -> usize {
        self.sections.iter().map(|s| s.topics.len()).sum()
    }

    /// Whether the metadata counters agree with the sections list.
    #[must_use]
    pub fn counts_consistent(&self) -> bool {
        self.metadata.section_count == self.sections.len()
            && self.metadata.topic_count == self.total_topics()
    }
}

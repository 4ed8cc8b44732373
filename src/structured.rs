//! Structured content assembly.
//!
//! Every job ends with exactly one [`StructuredContent`], whether or not an
//! organizer ran. Organizer replies are partially trusted: they are parsed
//! tolerantly and reconciled field by field into a document whose counters
//! always agree with its sections.

use chrono::Utc;
use serde_json::Value;

use crate::patterns::JSON_FENCE;
use crate::result::{
    ContentSection, Priority, ScrapedContent, StructuredContent, StructuredMetadata,
};
use crate::text::word_count;

/// Title of the single section built when no organizer output is used.
pub const MAIN_CONTENT_LABEL: &str = "Main Content";

/// Stand-in for a missing document title.
pub const PLACEHOLDER_TITLE: &str = "Untitled Document";

/// Stand-in for a missing summary.
pub const PLACEHOLDER_SUMMARY: &str = "No summary available.";

/// Confidence assumed when the organizer does not report one.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Confidence of the fallback structure after an unusable organizer reply.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// What the organization step produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizerReply<'a> {
    /// Organization was not requested.
    NotRequested,
    /// Organization was requested but no organizer is configured.
    Unavailable,
    /// The organizer's raw reply.
    Text(&'a str),
}

/// Assembled document plus any recoverable problem met on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub structured: StructuredContent,

    /// Set when the organizer was unavailable or its reply was unusable.
    pub warning: Option<String>,
}

/// Build the canonical document for a scraped page.
#[must_use]
pub fn assemble_structured(scraped: &ScrapedContent, reply: OrganizerReply<'_>) -> Assembly {
    match reply {
        OrganizerReply::NotRequested => Assembly {
            structured: synthesize_structured(scraped),
            warning: None,
        },
        OrganizerReply::Unavailable => fallback(scraped, "organizer unavailable".to_string()),
        OrganizerReply::Text(text) => match parse_organizer_output(text) {
            Some(candidate) => Assembly {
                structured: reconcile_candidate(&candidate, scraped),
                warning: None,
            },
            None => {
                tracing::warn!(url = %scraped.url, "organizer reply is not a JSON object");
                fallback(scraped, "organizer returned unparseable output".to_string())
            }
        },
    }
}

fn fallback(scraped: &ScrapedContent, warning: String) -> Assembly {
    let mut structured = synthesize_structured(scraped);
    structured.metadata.confidence = FALLBACK_CONFIDENCE;
    Assembly {
        structured,
        warning: Some(warning),
    }
}

/// The trivial structure: one primary section holding the whole content.
#[must_use]
pub fn synthesize_structured(scraped: &ScrapedContent) -> StructuredContent {
    let title = non_empty(&scraped.title).unwrap_or(PLACEHOLDER_TITLE).to_string();

    StructuredContent {
        title,
        summary: scraped.description.trim().to_string(),
        sections: vec![ContentSection {
            title: MAIN_CONTENT_LABEL.to_string(),
            content: scraped.content.clone(),
            priority: Priority::Primary,
            topics: Vec::new(),
        }],
        metadata: StructuredMetadata {
            word_count: scraped.metadata.word_count,
            section_count: 1,
            topic_count: 0,
            confidence: 1.0,
            extracted_at: Utc::now(),
        },
    }
}

/// Find the JSON object in an organizer reply.
///
/// Accepts bare JSON, JSON inside a Markdown code fence, and JSON with prose
/// around it (first `{` to last `}`). Anything that is not an object is
/// rejected.
#[must_use]
pub fn parse_organizer_output(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    let mut attempts: Vec<&str> = vec![trimmed];
    if let Some(fenced) = JSON_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        attempts.push(fenced.as_str());
    }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            attempts.push(&trimmed[start..=end]);
        }
    }

    attempts
        .into_iter()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find(Value::is_object)
}

/// Repair a candidate document into a valid [`StructuredContent`].
///
/// Missing title or summary get placeholders, a missing section list is
/// empty, section and topic counts always come from the sections actually
/// kept, word count falls back to the scraped content, and confidence
/// defaults to [`DEFAULT_CONFIDENCE`] and is clamped to `[0, 1]`.
#[must_use]
pub fn reconcile_candidate(candidate: &Value, scraped: &ScrapedContent) -> StructuredContent {
    let title = string_field(candidate, "title").unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
    let summary =
        string_field(candidate, "summary").unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string());

    let sections: Vec<ContentSection> = candidate
        .get("sections")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(idx, item)| reconcile_section(item, idx))
                .collect()
        })
        .unwrap_or_default();

    let meta = candidate.get("metadata");
    let words = meta
        .and_then(|m| m.get("wordCount"))
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_else(|| word_count(&scraped.content));
    let confidence = meta
        .and_then(|m| m.get("confidence"))
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .map_or(DEFAULT_CONFIDENCE, |c| c.clamp(0.0, 1.0));

    let topic_count = sections.iter().map(|s| s.topics.len()).sum();

    StructuredContent {
        title,
        summary,
        metadata: StructuredMetadata {
            word_count: words,
            section_count: sections.len(),
            topic_count,
            confidence,
            extracted_at: Utc::now(),
        },
        sections,
    }
}

fn reconcile_section(item: &Value, idx: usize) -> Option<ContentSection> {
    if !item.is_object() {
        return None;
    }

    let title = string_field(item, "title");
    let content = match item.get("content") {
        Some(Value::String(s)) => s.trim().to_string(),
        // Some models answer with a list of paragraphs
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
        _ => String::new(),
    };
    if title.is_none() && content.is_empty() {
        return None;
    }

    let priority = item
        .get("priority")
        .and_then(Value::as_str)
        .and_then(Priority::parse_lenient)
        .unwrap_or_default();

    let topics = item
        .get("topics")
        .and_then(Value::as_array)
        .map(|topics| {
            topics
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ContentSection {
        title: title.unwrap_or_else(|| format!("Section {}", idx + 1)),
        content,
        priority,
        topics,
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .and_then(non_empty)
        .map(ToString::to_string)
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ContentSource, ScrapeMetadata};
    use serde_json::json;

    fn scraped(content: &str) -> ScrapedContent {
        ScrapedContent {
            url: "https://acme.test/returns".to_string(),
            title: "Returns".to_string(),
            description: "How returns work.".to_string(),
            content: content.to_string(),
            raw_formatted: None,
            images: Vec::new(),
            source: ContentSource::Aggressive,
            metadata: ScrapeMetadata {
                scraped_at: Utc::now(),
                word_count: word_count(content),
                has_images: false,
                link_count: 0,
            },
        }
    }

    #[test]
    fn test_synthesized_structure_has_one_primary_section() {
        let page = scraped("Our return policy allows 30 days.");
        let doc = synthesize_structured(&page);

        assert_eq!(doc.title, "Returns");
        assert_eq!(doc.summary, "How returns work.");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].title, MAIN_CONTENT_LABEL);
        assert_eq!(doc.sections[0].priority, Priority::Primary);
        assert!(doc.sections[0].topics.is_empty());
        assert_eq!(doc.sections[0].content, "Our return policy allows 30 days.");
        assert_eq!(doc.metadata.confidence, 1.0);
        assert_eq!(doc.metadata.word_count, 6);
        assert!(doc.counts_consistent());
    }

    #[test]
    fn test_parse_accepts_fences_and_prose() {
        let bare = r#"{"title": "T"}"#;
        let fenced = "Here you go:\n```json\n{\"title\": \"T\"}\n```\nHope it helps.";
        let prose = "Sure! {\"title\": \"T\", \"sections\": []} Let me know.";

        for reply in [bare, fenced, prose] {
            let value = parse_organizer_output(reply).unwrap();
            assert_eq!(value["title"], "T", "failed on {reply:?}");
        }
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_organizer_output("I could not organize this page.").is_none());
        assert!(parse_organizer_output("[1, 2, 3]").is_none());
        assert!(parse_organizer_output("{ not json }").is_none());
        assert!(parse_organizer_output("").is_none());
    }

    #[test]
    fn test_reconcile_fills_placeholders() {
        let page = scraped("one two three four");
        let doc = reconcile_candidate(&json!({}), &page);

        assert_eq!(doc.title, PLACEHOLDER_TITLE);
        assert_eq!(doc.summary, PLACEHOLDER_SUMMARY);
        assert!(doc.sections.is_empty());
        assert_eq!(doc.metadata.word_count, 4);
        assert_eq!(doc.metadata.confidence, DEFAULT_CONFIDENCE);
        assert!(doc.counts_consistent());
    }

    #[test]
    fn test_reconcile_recomputes_lying_counters() {
        let page = scraped("text");
        let candidate = json!({
            "title": "FAQ",
            "summary": "Answers.",
            "sections": [
                {"title": "Shipping", "content": "Three days.", "priority": "high", "topics": ["delivery", "speed"]},
                {"content": ["First part.", "Second part."], "topics": ["misc", 7]},
                "not a section",
                {"priority": "primary"}
            ],
            "metadata": {"sectionCount": 99, "topicCount": 42, "confidence": 3.5, "wordCount": 120}
        });

        let doc = reconcile_candidate(&candidate, &page);

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.metadata.section_count, 2);
        assert_eq!(doc.metadata.topic_count, 3);
        assert_eq!(doc.metadata.confidence, 1.0);
        assert_eq!(doc.metadata.word_count, 120);
        assert_eq!(doc.sections[0].priority, Priority::Primary);
        assert_eq!(doc.sections[1].title, "Section 2");
        assert_eq!(doc.sections[1].content, "First part.\n\nSecond part.");
        assert_eq!(doc.sections[1].priority, Priority::Secondary);
        assert!(doc.counts_consistent());
    }

    #[test]
    fn test_negative_confidence_is_clamped() {
        let doc = reconcile_candidate(&json!({"metadata": {"confidence": -0.3}}), &scraped("x"));
        assert_eq!(doc.metadata.confidence, 0.0);
    }

    #[test]
    fn test_unparseable_reply_falls_back() {
        let page = scraped("Our return policy allows 30 days.");
        let assembly = assemble_structured(&page, OrganizerReply::Text("Sorry, I can't."));

        assert!(assembly.warning.is_some());
        assert_eq!(assembly.structured.metadata.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(assembly.structured.sections[0].title, MAIN_CONTENT_LABEL);
    }

    #[test]
    fn test_unavailable_organizer_falls_back() {
        let page = scraped("content");
        let assembly = assemble_structured(&page, OrganizerReply::Unavailable);

        assert_eq!(assembly.warning.as_deref(), Some("organizer unavailable"));
        assert_eq!(assembly.structured.sections.len(), 1);
    }

    #[test]
    fn test_not_requested_has_full_confidence() {
        let assembly = assemble_structured(&scraped("content"), OrganizerReply::NotRequested);

        assert!(assembly.warning.is_none());
        assert_eq!(assembly.structured.metadata.confidence, 1.0);
    }
}

//! Export rendering.
//!
//! Completed jobs render to Markdown, plain text, or JSON from their
//! [`StructuredContent`], or emit the stored raw-formatted text directly.
//! Section order is kept exactly as stored.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::job::{JobStatus, ScrapeJob};
use crate::options::OutputFormat;
use crate::result::StructuredContent;

/// A rendered download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub content_type: &'static str,
    /// File extension without the dot.
    pub extension: &'static str,
    pub body: Vec<u8>,
}

impl Export {
    fn new(format: OutputFormat, body: String) -> Self {
        let (content_type, extension) = match format {
            OutputFormat::Markdown => ("text/markdown; charset=utf-8", "md"),
            OutputFormat::Text => ("text/plain; charset=utf-8", "txt"),
            OutputFormat::Json => ("application/json", "json"),
        };
        Self {
            content_type,
            extension,
            body: body.into_bytes(),
        }
    }

    /// Body as text. Every export is UTF-8.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// What to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// Rendering target; `None` uses the job's own output format.
    pub format: Option<OutputFormat>,

    /// Emit the raw-formatted text instead of the structured content.
    pub raw: bool,
}

impl ExportRequest {
    #[must_use]
    pub fn format(format: OutputFormat) -> Self {
        Self {
            format: Some(format),
            raw: false,
        }
    }

    #[must_use]
    pub fn raw(format: OutputFormat) -> Self {
        Self {
            format: Some(format),
            raw: true,
        }
    }
}

/// Render a completed job.
///
/// Rejects jobs that are not `completed`, raw exports of jobs that did not
/// ask for raw formatting, and raw exports as JSON. The job is only read.
pub fn render_export(job: &ScrapeJob, request: ExportRequest) -> Result<Export> {
    if job.status != JobStatus::Completed {
        return Err(Error::Export(format!(
            "job {} is {}, only completed jobs can be exported",
            job.id, job.status
        )));
    }

    let format = request.format.unwrap_or(job.output_format);

    if request.raw {
        if !job.processing_options.raw_formatted {
            return Err(Error::Export(format!(
                "job {} did not request raw formatting",
                job.id
            )));
        }
        if format == OutputFormat::Json {
            return Err(Error::Export(
                "raw-formatted export is only available as markdown or text".to_string(),
            ));
        }
        let raw = job
            .raw_formatted()
            .ok_or_else(|| Error::Export(format!("job {} has no raw-formatted text", job.id)))?;
        return Ok(Export::new(format, raw.to_string()));
    }

    let structured = job
        .structured_content
        .as_ref()
        .ok_or_else(|| Error::Export(format!("job {} has no structured content", job.id)))?;

    let body = match format {
        OutputFormat::Markdown => render_markdown(structured),
        OutputFormat::Text => render_text(structured),
        OutputFormat::Json => serde_json::to_string_pretty(structured)
            .map_err(|e| Error::Export(format!("serializing structured content: {e}")))?,
    };
    Ok(Export::new(format, body))
}

/// Markdown rendering.
///
/// `# title`, optional summary, then `## section` blocks separated by
/// `---`, with no separator after the last, and a closing comment with the
/// counts and extraction date.
#[must_use]
pub fn render_markdown(doc: &StructuredContent) -> String {
    let mut out = String::new();

    let _ = write!(out, "# {}\n\n", doc.title);
    if !doc.summary.trim().is_empty() {
        let _ = write!(out, "{}\n\n", doc.summary.trim());
    }

    for (idx, section) in doc.sections.iter().enumerate() {
        if idx > 0 {
            out.push_str("---\n\n");
        }
        let _ = write!(out, "## {}\n\n{}\n\n", section.title, section.content);
    }

    let _ = writeln!(out, "<!-- {} -->", footer(doc));
    out
}

/// Plain-text rendering: the Markdown layout without markup.
///
/// The title is underlined with `=`, section titles with `-`.
#[must_use]
pub fn render_text(doc: &StructuredContent) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}\n{}\n\n", doc.title, underline(&doc.title, '='));
    if !doc.summary.trim().is_empty() {
        let _ = write!(out, "{}\n\n", doc.summary.trim());
    }

    for section in &doc.sections {
        let _ = write!(
            out,
            "{}\n{}\n\n{}\n\n",
            section.title,
            underline(&section.title, '-'),
            section.content
        );
    }

    let _ = writeln!(out, "{}", footer(doc));
    out
}

fn underline(title: &str, ch: char) -> String {
    std::iter::repeat(ch).take(title.chars().count().max(3)).collect()
}

fn footer(doc: &StructuredContent) -> String {
    format!(
        "Word count: {} | Sections: {} | Extracted: {}",
        doc.metadata.word_count,
        doc.metadata.section_count,
        doc.metadata.extracted_at.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::result::{ContentSection, Priority, StructuredMetadata};

    fn section(title: &str, content: &str) -> ContentSection {
        ContentSection {
            title: title.to_string(),
            content: content.to_string(),
            priority: Priority::Secondary,
            topics: Vec::new(),
        }
    }

    fn doc(summary: &str) -> StructuredContent {
        StructuredContent {
            title: "Shipping".to_string(),
            summary: summary.to_string(),
            sections: vec![section("A", "a"), section("B", "b")],
            metadata: StructuredMetadata {
                word_count: 2,
                section_count: 2,
                topic_count: 0,
                confidence: 0.9,
                extracted_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            },
        }
    }

    #[test]
    fn test_markdown_layout() {
        let md = render_markdown(&doc(""));

        assert!(md.starts_with("# Shipping\n\n## A\n\na\n\n---\n\n## B\n\nb\n\n<!--"));
        assert!(!md.contains("b\n\n---"));
        assert!(md.trim_end().ends_with("Extracted: 2024-03-09 -->"));
    }

    #[test]
    fn test_markdown_includes_summary() {
        let md = render_markdown(&doc("All about delivery."));
        assert!(md.starts_with("# Shipping\n\nAll about delivery.\n\n## A"));
    }

    #[test]
    fn test_text_layout() {
        let text = render_text(&doc(""));

        assert!(text.starts_with("Shipping\n========\n\nA\n---\n\na\n\nB\n---\n\nb\n\n"));
        assert!(!text.contains('#'));
        assert!(text.contains("Sections: 2"));
    }
}

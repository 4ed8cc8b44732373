//! # kb-scrape
//!
//! Turns rendered web pages into clean, sectioned knowledge-base documents.
//!
//! The library strips page chrome, picks the substantive content with an
//! ordered cascade of FAQ/support/docs-first heuristics, optionally pairs
//! headings with their text as a lightweight Q&A document, and assembles a
//! canonical [`StructuredContent`] that renders to Markdown, plain text, or
//! JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use kb_scrape::{render_markdown, scrape_html, synthesize_structured, ProcessingOptions};
//!
//! let html = r#"<html><head><title>Returns</title></head>
//! <body><nav>Home | Shop</nav><main><p>Our return policy allows 30 days.</p></main></body></html>"#;
//!
//! let scraped = scrape_html(html, "https://shop.example/returns", &ProcessingOptions::default());
//! assert_eq!(scraped.content, "Our return policy allows 30 days.");
//!
//! let doc = synthesize_structured(&scraped);
//! assert!(render_markdown(&doc).starts_with("# Returns\n\n## Main Content"));
//! ```
//!
//! ## Jobs
//!
//! [`JobManager`] runs the full pipeline per URL in a background task:
//! render through a [`PageRenderer`], extract, organize through an optional
//! [`Organizer`], and store the result in a [`JobStore`]. Jobs move
//! `pending -> processing -> completed | failed` and are never retried.
//!
//! ## Features
//!
//! - **Noise Removal**: navigation, sidebars, footers, ads, menus, cookie banners
//! - **Content Selection**: first sufficient match wins, domain-specific first
//! - **Raw Q&A**: heading/body pairing with a sentence-level fallback
//! - **Tolerant Assembly**: organizer output is repaired, never trusted blindly

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Noise categories and the content-area cascade.
pub mod selector;

/// Page title, description, link and image facts.
pub mod metadata;

/// Whitespace cleanup, truncation, and counting.
pub mod text;

/// Heuristic heading/body Q&A formatting.
pub mod raw_qa;

/// Canonical structured-content assembly.
pub mod structured;

/// Markdown, text, and JSON rendering of completed jobs.
pub mod export;

/// Jobs and their state machine.
pub mod job;

/// In-memory job store.
pub mod store;

/// Renderer, organizer, and job-store interfaces.
pub mod traits;

/// Background job pipeline.
pub mod manager;

/// Deterministic collaborators for tests.
pub mod testing;

// Public API - re-exports
pub use error::{Error, RenderError, Result, Stage};
pub use export::{render_export, render_markdown, render_text, Export, ExportRequest};
pub use extract::scrape_html;
pub use job::{JobId, JobStatus, JobUpdate, ScrapeJob, SubmitRequest};
pub use manager::{JobManager, SubmittedJob};
pub use options::{OutputFormat, ProcessingOptions};
pub use raw_qa::format_raw_qa;
pub use result::{
    ContentSection, ContentSource, ImageRef, Priority, ScrapeMetadata, ScrapedContent,
    StructuredContent, StructuredMetadata,
};
pub use store::MemoryJobStore;
pub use structured::{
    assemble_structured, reconcile_candidate, synthesize_structured, Assembly, OrganizerReply,
};
pub use traits::{JobStore, Organizer, PageRenderer};

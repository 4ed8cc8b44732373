//! The extraction stage.
//!
//! Turns one rendered HTML page into [`ScrapedContent`]: metadata is read
//! from the untouched document, then the noise filter runs, the main-content
//! cascade picks the text, and the text is cleaned and capped. The raw Q&A
//! formatter runs last, over the filtered tree, when requested.
//!
//! Everything here is synchronous; `dom_query` documents are not `Send`.

use chrono::Utc;

use crate::dom;
use crate::metadata;
use crate::options::ProcessingOptions;
use crate::raw_qa::format_raw_qa;
use crate::result::{ScrapeMetadata, ScrapedContent};
use crate::selector::content::select_main_content;
use crate::selector::noise::remove_noise;
use crate::text::{char_len, clean_text, truncate_with_marker, word_count};

/// Run the extraction stage over rendered HTML.
///
/// Never fails: an empty or fully-chrome page yields empty content.
#[must_use]
pub fn scrape_html(html: &str, url: &str, options: &ProcessingOptions) -> ScrapedContent {
    let document = dom::parse(html);

    // Metadata first; the noise filter drops the <header> that often holds the h1
    let page = metadata::extract_page_metadata(&document, url, options.process_images);

    let removed = remove_noise(&document);
    let (selected, source) = select_main_content(&document, options.extract_main_content);

    let content = truncate_with_marker(&clean_text(&selected), options.max_content_length);
    let words = word_count(&content);

    tracing::debug!(
        url,
        removed,
        ?source,
        chars = char_len(&content),
        words,
        "extracted main content"
    );

    let raw_formatted = options
        .raw_formatted
        .then(|| format_raw_qa(&document, &content));

    ScrapedContent {
        url: url.to_string(),
        title: page.title,
        description: page.description,
        content,
        raw_formatted,
        images: page.images,
        source,
        metadata: ScrapeMetadata {
            scraped_at: Utc::now(),
            word_count: words,
            has_images: page.has_images,
            link_count: page.link_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ContentSource;
    use crate::text::{char_len, TRUNCATION_MARKER};

    fn options() -> ProcessingOptions {
        ProcessingOptions::default()
    }

    #[test]
    fn test_metadata_survives_noise_filter() {
        let html = r#"<html><head><meta property="og:title" content="Help Centre"></head>
            <body><header><h1>Acme</h1><img src="/logo.png"></header>
            <main><p>Our return policy allows 30 days.</p></main></body></html>"#;

        let scraped = scrape_html(html, "https://acme.test/help", &options());

        assert_eq!(scraped.title, "Help Centre");
        assert!(scraped.metadata.has_images);
        assert!(!scraped.content.contains("Acme"));
        assert!(scraped.content.contains("Our return policy allows 30 days."));
    }

    #[test]
    fn test_content_is_capped_with_marker() {
        let paragraph = "<p>lorem ipsum dolor sit amet consectetur adipiscing</p>".repeat(200);
        let html = format!("<body><article>{paragraph}</article></body>");
        let opts = ProcessingOptions {
            max_content_length: 1000,
            ..options()
        };

        let scraped = scrape_html(&html, "https://acme.test", &opts);

        assert!(scraped.content.ends_with(TRUNCATION_MARKER));
        assert!(char_len(&scraped.content) <= 1000 + char_len(TRUNCATION_MARKER));
        assert_eq!(scraped.metadata.word_count, word_count(&scraped.content));
    }

    #[test]
    fn test_raw_formatted_only_when_requested() {
        let html = "<body><h2>What is shipping?</h2><p>Shipping takes 3 days.</p></body>";

        let plain = scrape_html(html, "https://acme.test", &options());
        assert!(plain.raw_formatted.is_none());

        let opts = ProcessingOptions {
            raw_formatted: true,
            ..options()
        };
        let raw = scrape_html(html, "https://acme.test", &opts);
        let formatted = raw.raw_formatted.unwrap_or_default();
        assert!(formatted.contains("## What is shipping?\n\nShipping takes 3 days."));
    }

    #[test]
    fn test_empty_page_yields_empty_content() {
        let scraped = scrape_html("", "https://acme.test", &options());

        assert!(scraped.content.is_empty());
        assert_eq!(scraped.metadata.word_count, 0);
        assert_eq!(scraped.source, ContentSource::Aggressive);
    }
}

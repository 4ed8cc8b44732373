use kb_scrape::dom;
use kb_scrape::{format_raw_qa, scrape_html, ProcessingOptions};

fn raw_options() -> ProcessingOptions {
    ProcessingOptions {
        raw_formatted: true,
        ..ProcessingOptions::default()
    }
}

#[test]
fn shipping_question_is_paired_with_its_answer() {
    let doc = dom::parse("<h2>What is shipping?</h2><p>Shipping takes 3 days.</p>");
    let out = format_raw_qa(&doc, "What is shipping?\nShipping takes 3 days.");

    assert!(out.contains("## What is shipping?\n\nShipping takes 3 days."));
}

#[test]
fn heading_text_survives_verbatim() {
    let headings = [
        "Returns and exchanges",
        "Can I pay with a gift card?",
        "Warranty coverage details",
    ];
    let body = "This answer is comfortably longer than twenty characters.";

    for heading in headings {
        let html = format!("<body><h3>{heading}</h3><p>{body}</p></body>");
        let scraped = scrape_html(&html, "https://shop.example", &raw_options());
        let raw = scraped.raw_formatted.unwrap_or_default();

        assert!(raw.contains(&format!("## {heading}")), "{heading:?} missing from {raw:?}");
        assert!(raw.contains(body));
    }
}

#[test]
fn never_empty_for_non_empty_input() {
    let inputs = [
        "<body><p>Plain words.</p></body>",
        "<body><div>Just one line of text with no structure at all</div></body>",
        "<body><h2>Hi</h2></body>",
        "<body><span>x</span></body>",
    ];

    for html in inputs {
        let scraped = scrape_html(html, "https://shop.example", &raw_options());
        if scraped.content.is_empty() {
            continue;
        }
        let raw = scraped.raw_formatted.unwrap_or_default();
        assert!(!raw.is_empty(), "empty raw output for {html:?}");
    }
}

#[test]
fn runs_on_filtered_tree_independently_of_selected_content() {
    let html = r#"<body>
        <nav><h2>Site navigation menu</h2><p>Home, Shop, Help, Contact us today.</p></nav>
        <article>
            <p>Intro paragraph that is long enough to be picked as the article body by the cascade.
            It keeps going a little longer so it clears the length threshold.</p>
        </article>
        <section>
            <h2>Delivery windows</h2>
            <p>Choose a morning, afternoon or evening slot when you check out.</p>
            <h2>Missed deliveries</h2>
            <p>The courier leaves a card and tries again the next working day.</p>
        </section>
    </body>"#;

    let scraped = scrape_html(html, "https://shop.example", &raw_options());
    let raw = scraped.raw_formatted.unwrap_or_default();

    assert!(!scraped.content.contains("Delivery windows"));
    assert!(raw.contains("## Delivery windows\n\nChoose a morning"));
    assert!(raw.contains("## Missed deliveries"));
    assert!(!raw.contains("Site navigation"));
}

#[test]
fn sentence_fallback_builds_topics_from_content() {
    let html = r#"<body><main><p>
        Thanks for visiting our help pages. How do I track my order?
        Open the orders page and select the parcel you want to follow.
        Tracking updates every few hours while the parcel is moving.
    </p></main></body>"#;

    let scraped = scrape_html(html, "https://shop.example", &raw_options());
    let raw = scraped.raw_formatted.unwrap_or_default();

    assert!(raw.starts_with("## How do I track my order?\n\nOpen the orders page"));
    assert!(!raw.contains("Thanks for visiting"));
}

//! kb-extract: reads rendered HTML from stdin and prints the extracted
//! document to stdout.
//!
//! Usage: `kb-extract [URL] [--raw] [--text | --json] [--full-body]`
//!
//! Runs the extraction stage and the non-AI assembler; no browser or
//! language model is involved. Set `RUST_LOG=debug` to see which cascade
//! step picked the content.

use std::env;
use std::io::{self, Read};
use std::process::ExitCode;

use kb_scrape::{
    render_export, scrape_html, synthesize_structured, JobStatus, JobUpdate, OutputFormat,
    ProcessingOptions, ScrapeJob, SubmitRequest,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "https://localhost/";

struct Args {
    url: String,
    format: OutputFormat,
    raw: bool,
    full_body: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        url: DEFAULT_URL.to_string(),
        format: OutputFormat::Markdown,
        raw: false,
        full_body: false,
    };

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--raw" => args.raw = true,
            "--text" => args.format = OutputFormat::Text,
            "--json" => args.format = OutputFormat::Json,
            "--full-body" => args.full_body = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            url => url.clone_into(&mut args.url),
        }
    }
    Ok(args)
}

fn run(args: &Args, html: &str) -> kb_scrape::Result<String> {
    let options = ProcessingOptions {
        extract_main_content: !args.full_body,
        ai_organization: false,
        raw_formatted: args.raw,
        ..ProcessingOptions::default()
    };
    let request = SubmitRequest::new(args.url.clone())
        .with_options(options.clone())
        .with_format(args.format);
    request.validate()?;

    let scraped = scrape_html(html, &args.url, &options);
    let structured = synthesize_structured(&scraped);

    // Walk a local job through its lifecycle so rendering follows the same
    // rules as a stored job
    let mut job = ScrapeJob::new(request);
    job.apply(JobUpdate::status(JobStatus::Processing))?;
    let mut metadata = kb_scrape::job::JobMetadata::new();
    if let Some(raw) = &scraped.raw_formatted {
        metadata.insert("rawFormatted".to_string(), raw.clone().into());
    }
    job.apply(JobUpdate {
        status: Some(JobStatus::Completed),
        word_count: Some(scraped.metadata.word_count),
        original_content: Some(scraped.content.clone()),
        structured_content: Some(structured),
        metadata: Some(metadata),
        completed_at: Some(chrono::Utc::now()),
        ..JobUpdate::default()
    })?;

    let export = render_export(
        &job,
        kb_scrape::ExportRequest {
            format: Some(args.format),
            raw: args.raw,
        },
    )?;
    Ok(export.as_str().to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("kb-extract: {message}");
            eprintln!("usage: kb-extract [URL] [--raw] [--text | --json] [--full-body]");
            return ExitCode::from(2);
        }
    };

    let mut html = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut html) {
        eprintln!("kb-extract: failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args, &html) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(stage = %err.stage(), error = %err, "extraction failed");
            ExitCode::FAILURE
        }
    }
}

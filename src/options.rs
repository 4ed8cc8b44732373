//! Configuration options for a scrape job.
//!
//! `ProcessingOptions` is fixed when a job is submitted and read by every
//! pipeline stage. Bounds are checked once, at submission.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted `max_content_length`.
pub const MIN_CONTENT_LENGTH: usize = 1_000;

/// Largest accepted `max_content_length`.
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Shortest accepted job timeout.
pub const MIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest accepted job timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Per-job processing options.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use kb_scrape::ProcessingOptions;
///
/// let options = ProcessingOptions {
///     ai_organization: false,
///     raw_formatted: true,
///     ..ProcessingOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ProcessingOptions {
    /// Run the content-area cascade instead of taking the whole body.
    ///
    /// Default: `true`
    pub extract_main_content: bool,

    /// Attach page metadata (title, description, link/image counts) to the job.
    ///
    /// Default: `true`
    pub include_metadata: bool,

    /// Collect image references from the page.
    ///
    /// Default: `false`
    pub process_images: bool,

    /// Send the cleaned content to the organizer for sectioning.
    ///
    /// Default: `true`
    pub ai_organization: bool,

    /// Produce the heuristic heading/body Q&A text.
    ///
    /// Default: `false`
    pub raw_formatted: bool,

    /// Character limit for the cleaned content.
    ///
    /// Default: `10000`
    pub max_content_length: usize,

    /// Upper bound for each external call made by the job.
    ///
    /// Default: 60 seconds
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            extract_main_content: true,
            include_metadata: true,
            process_images: false,
            ai_organization: true,
            raw_formatted: false,
            max_content_length: 10_000,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ProcessingOptions {
    /// Check the submission bounds.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CONTENT_LENGTH..=MAX_CONTENT_LENGTH).contains(&self.max_content_length) {
            return Err(Error::InvalidInput(format!(
                "maxContentLength must be between {MIN_CONTENT_LENGTH} and {MAX_CONTENT_LENGTH}, got {}",
                self.max_content_length
            )));
        }
        if self.timeout < MIN_TIMEOUT || self.timeout > MAX_TIMEOUT {
            return Err(Error::InvalidInput(format!(
                "timeout must be between {}s and {}s, got {}ms",
                MIN_TIMEOUT.as_secs(),
                MAX_TIMEOUT.as_secs(),
                self.timeout.as_millis()
            )));
        }
        Ok(())
    }
}

/// Rendering target requested for a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(Error::InvalidInput(format!("unknown output format: {other}"))),
        }
    }
}

/// Serialize a `Duration` as whole milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ProcessingOptions::default();

        assert!(opts.extract_main_content);
        assert!(opts.include_metadata);
        assert!(!opts.process_images);
        assert!(opts.ai_organization);
        assert!(!opts.raw_formatted);
        assert_eq!(opts.max_content_length, 10_000);
        assert_eq!(opts.timeout, Duration::from_secs(60));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_content_length_bounds_are_inclusive() {
        for len in [MIN_CONTENT_LENGTH, MAX_CONTENT_LENGTH] {
            let opts = ProcessingOptions {
                max_content_length: len,
                ..ProcessingOptions::default()
            };
            assert!(opts.validate().is_ok(), "{len} should be accepted");
        }

        for len in [999, 50_001] {
            let opts = ProcessingOptions {
                max_content_length: len,
                ..ProcessingOptions::default()
            };
            assert!(matches!(opts.validate(), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_timeout_bounds() {
        let too_short = ProcessingOptions {
            timeout: Duration::from_secs(29),
            ..ProcessingOptions::default()
        };
        let too_long = ProcessingOptions {
            timeout: Duration::from_secs(301),
            ..ProcessingOptions::default()
        };
        let edge = ProcessingOptions {
            timeout: Duration::from_secs(300),
            ..ProcessingOptions::default()
        };

        assert!(too_short.validate().is_err());
        assert!(too_long.validate().is_err());
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_serde_uses_camel_case_and_millis() {
        let json = serde_json::to_value(ProcessingOptions::default()).unwrap();

        assert_eq!(json["extractMainContent"], true);
        assert_eq!(json["maxContentLength"], 10_000);
        assert_eq!(json["timeout"], 60_000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let opts: ProcessingOptions =
            serde_json::from_str(r#"{"aiOrganization": false, "timeout": 45000}"#).unwrap();

        assert!(!opts.ai_organization);
        assert!(opts.extract_main_content);
        assert_eq!(opts.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("Markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }
}

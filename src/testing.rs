//! Deterministic collaborators for tests and offline runs.
//!
//! These let the job pipeline run end to end without a browser or a
//! language model.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, RenderError, Result};
use crate::traits::{Organizer, PageRenderer};

/// A renderer serving fixed HTML per URL.
///
/// Unknown URLs fail with a navigation error. An optional delay is slept
/// before answering and counts against the caller's timeout.
#[derive(Debug, Default)]
pub struct StaticRenderer {
    pages: HashMap<String, String>,
    failures: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Fail navigation to `url` with `message`.
    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(url.into(), message.into());
        self
    }

    /// Sleep before every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of render calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> std::result::Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            if delay >= timeout {
                tokio::time::sleep(timeout).await;
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    after: timeout,
                });
            }
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failures.get(url) {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: message.clone(),
            });
        }
        self.pages.get(url).cloned().ok_or_else(|| RenderError::Navigation {
            url: url.to_string(),
            message: "no such page".to_string(),
        })
    }
}

/// What a [`ScriptedOrganizer`] does when called.
#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail(String),
    Hang,
}

/// An organizer returning a fixed reply.
#[derive(Debug)]
pub struct ScriptedOrganizer {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedOrganizer {
    /// Always answer with `reply`, verbatim.
    pub fn reply(reply: impl Into<String>) -> Self {
        Self::scripted(Script::Reply(reply.into()))
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::scripted(Script::Fail(message.into()))
    }

    /// Never answer; exercises the caller's timeout.
    #[must_use]
    pub fn hanging() -> Self {
        Self::scripted(Script::Hang)
    }

    fn scripted(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Organizer for ScriptedOrganizer {
    async fn organize(&self, _content: &str, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Fail(message) => Err(Error::Organization(message.clone())),
            Script::Hang => std::future::pending().await,
        }
    }
}

/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a three-field reply
 * - `MockProvider::failing()` - Always fails with a timeout
 * - `MockProvider::scripted(..)` - Replays a queue of replies and errors in order
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Reply used by `MockBehavior::Working`
pub const WORKING_REPLY: &str = "Translated title ||| Translated description ||| 1\n00:00:01,000 --> 00:00:02,000\nTranslated line";

/// One scripted reply
#[derive(Debug)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Return this error
    Fail(ProviderError),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `WORKING_REPLY`
    Working,
    /// Always fails with a timeout
    Failing,
    /// Returns an empty reply
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
///
/// Scripted replies are consumed first; once the script runs out the
/// provider falls back to its behavior mode.
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Queued replies
    script: Arc<Mutex<VecDeque<MockReply>>>,
    /// Every prompt received, in order
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always times out
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Create a mock that replays `replies` and then behaves like `working()`
    pub fn scripted(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let provider = Self::working();
        if let Ok(mut script) = provider.script.lock() {
            script.extend(replies);
        }
        provider
    }

    /// Number of `generate` calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_scripted(&self) -> Option<MockReply> {
        self.script.lock().ok().and_then(|mut script| script.pop_front())
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            script: Arc::clone(&self.script),
            prompts: Arc::clone(&self.prompts),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn generate(&self, _model: &str, prompt: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(reply) = self.next_scripted() {
            return match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Fail(error) => Err(error),
            };
        }

        match self.behavior {
            MockBehavior::Working => Ok(WORKING_REPLY.to_string()),
            MockBehavior::Failing => Err(ProviderError::Timeout("Simulated provider timeout".to_string())),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(WORKING_REPLY.to_string())
            }
        }
    }
}

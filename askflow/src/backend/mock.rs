//! Scripted generator for tests and offline runs.

use super::{BackendError, TextGenerator};
use crate::roles::{Role, RoleProfile};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A generator that replays a fixed script of replies.
///
/// Each call consumes the next scripted reply, which is either raw text or
/// a [`BackendError`] to inject. An exhausted script keeps failing with a
/// transport error, which exercises the executor's fallback path.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    exhausted_error: Mutex<BackendError>,
    calls: Mutex<Vec<(Role, String)>>,
    call_count: AtomicUsize,
}

impl ScriptedGenerator {
    /// Creates a generator over the given script.
    #[must_use]
    pub fn new(script: Vec<Result<String, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            exhausted_error: Mutex::new(BackendError::Transport("script exhausted".to_string())),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Creates a generator that answers with the given texts, in order.
    #[must_use]
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self::new(responses.into_iter().map(|text| Ok(text.to_string())).collect())
    }

    /// Creates a generator whose every call fails with `error`.
    #[must_use]
    pub fn always_failing(error: BackendError) -> Self {
        let generator = Self::new(Vec::new());
        *generator.exhausted_error.lock() = error;
        generator
    }

    /// Returns the number of generate calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns the `(role, instruction)` pairs observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(Role, String)> {
        self.calls.lock().clone()
    }

    /// Resets call accounting; the remaining script is untouched.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.calls.lock().clear();
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        profile: &RoleProfile,
        instruction: &str,
    ) -> Result<String, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push((profile.role, instruction.to_string()));

        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(self.exhausted_error.lock().clone()))
    }
}

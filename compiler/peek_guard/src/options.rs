//! String-keyed configuration for [`run_ensured`](crate::run_ensured).

use std::fmt;

use crate::GuardError;

/// Key of the closure to run.
pub const ACTION: &str = "action";
/// Key of the closure that must run exactly once afterwards.
pub const CLEANUP: &str = "cleanup";

/// A boxed, sendable, one-shot closure.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Named closures for a guarded run. Only [`ACTION`] and [`CLEANUP`] are
/// accepted; anything else is reported when the options are used.
#[derive(Default)]
pub struct EnsureOptions {
    entries: Vec<(String, Callback)>,
}

impl EnsureOptions {
    pub fn new() -> Self {
        EnsureOptions::default()
    }

    /// Set `key`, replacing an earlier closure under the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, f: impl FnOnce() + Send + 'static) -> Self {
        let key = key.into();
        let f: Callback = Box::new(f);
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = f,
            None => self.entries.push((key, f)),
        }
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Check the keys and split out the action and the cleanup.
    ///
    /// Missing keys are reported before unknown ones.
    pub fn into_parts(self) -> Result<(Callback, Callback), GuardError> {
        for required in [ACTION, CLEANUP] {
            if !self.contains(required) {
                return Err(GuardError::MissingKey(required));
            }
        }

        let mut action = None;
        let mut cleanup = None;
        let mut unknown = Vec::new();
        for (key, f) in self.entries {
            match key.as_str() {
                ACTION => action = Some(f),
                CLEANUP => cleanup = Some(f),
                _ => unknown.push(key),
            }
        }
        if unknown.len() == 1 {
            return Err(GuardError::UnknownKey(unknown.remove(0)));
        }
        if !unknown.is_empty() {
            return Err(GuardError::UnknownKeys(unknown));
        }

        match (action, cleanup) {
            (Some(action), Some(cleanup)) => Ok((action, cleanup)),
            (None, _) => Err(GuardError::MissingKey(ACTION)),
            (_, None) => Err(GuardError::MissingKey(CLEANUP)),
        }
    }
}

impl fmt::Debug for EnsureOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.iter().map(|(key, _)| key))
            .finish()
    }
}

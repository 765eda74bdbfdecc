use thiserror::Error;

/// Why a guarded run did not start.
///
/// Configuration problems are reported before anything is installed or
/// run. Failures of the action itself are not `GuardError`s: a panic
/// propagates to the caller once cleanup has run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("must pass the `{0}` key")]
    MissingKey(&'static str),

    #[error("unknown key: `{0}`")]
    UnknownKey(String),

    #[error("unknown keys: {}", format_keys(.0))]
    UnknownKeys(Vec<String>),

    /// Guarded runs do not nest on one thread.
    #[error("a guarded run is already active on this thread")]
    Nested,

    /// The interrupt disposition could not be read or replaced.
    #[cfg(unix)]
    #[error("failed to install the interrupt handler: {0}")]
    Signal(#[from] nix::errno::Errno),
}

fn format_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("`{key}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

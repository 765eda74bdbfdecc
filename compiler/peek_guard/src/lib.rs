//! Cleanup that runs exactly once, even when the process is interrupted.
//!
//! [`run_guarded`] runs an action and then its cleanup. If `SIGINT`
//! arrives while the action runs, the cleanup runs first and the interrupt
//! is then re-raised under the disposition that was in place before, so a
//! default disposition still terminates the process. A disposition of
//! "ignore" is left alone. On every path the previous disposition is back
//! in place once the cleanup has started.
//!
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! let cleaned = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&cleaned);
//! let answer = peek_guard::run_guarded(|| 42, move || flag.store(true, Ordering::SeqCst));
//! assert_eq!(answer, Ok(42));
//! assert!(cleaned.load(Ordering::SeqCst));
//! ```
//!
//! The cleanup may run inside a signal handler, so it should be brief:
//! removing a temp file, restoring terminal state.

mod error;
mod options;
#[cfg(unix)]
mod unix;

pub use error::GuardError;
pub use options::{Callback, EnsureOptions, ACTION, CLEANUP};

use std::cell::Cell;

use parking_lot::Mutex;
use tracing::debug;

/// One guarded run per process at a time; the handler slot is global.
static ACTIVE: Mutex<()> = Mutex::new(());

thread_local! {
    static ACTIVE_HERE: Cell<bool> = const { Cell::new(false) };
}

/// Clears the per-thread flag on every exit path.
struct ThreadMark;

impl ThreadMark {
    fn enter() -> Result<ThreadMark, GuardError> {
        if ACTIVE_HERE.with(Cell::get) {
            return Err(GuardError::Nested);
        }
        ACTIVE_HERE.with(|active| active.set(true));
        Ok(ThreadMark)
    }
}

impl Drop for ThreadMark {
    fn drop(&mut self) {
        ACTIVE_HERE.with(|active| active.set(false));
    }
}

/// Run `action`, then `cleanup`, with `cleanup` also covering an interrupt.
///
/// A panic in `action` propagates after the cleanup ran and the previous
/// disposition was restored. Runs on other threads wait for this one.
///
/// On interrupt, `cleanup` runs inside the signal handler. It must then
/// only do async-signal-safe work: no locks, no logging, no allocation.
/// The closure's own storage is released when it returns.
pub fn run_guarded<R>(
    action: impl FnOnce() -> R,
    cleanup: impl FnOnce() + Send + 'static,
) -> Result<R, GuardError> {
    let _mark = ThreadMark::enter()?;
    let _active = ACTIVE.lock();
    let _installed = install(Box::new(cleanup))?;
    debug!("running guarded action");
    Ok(action())
}

/// [`run_guarded`] configured by name.
///
/// Fails before anything runs when [`ACTION`] or [`CLEANUP`] is missing,
/// or when any other key is present.
pub fn run_ensured(options: EnsureOptions) -> Result<(), GuardError> {
    let (action, cleanup) = options.into_parts()?;
    run_guarded(action, cleanup)
}

#[cfg(unix)]
fn install(cleanup: Callback) -> Result<unix::Installed, GuardError> {
    unix::install(cleanup)
}

/// Without signals the cleanup simply runs on the way out.
#[cfg(not(unix))]
fn install(cleanup: Callback) -> Result<RunOnDrop, GuardError> {
    Ok(RunOnDrop(Some(cleanup)))
}

#[cfg(not(unix))]
struct RunOnDrop(Option<Callback>);

#[cfg(not(unix))]
impl Drop for RunOnDrop {
    fn drop(&mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests;

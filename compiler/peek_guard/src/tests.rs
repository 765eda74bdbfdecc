#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use super::*;

/// Tests touching the process-wide interrupt disposition take turns.
static SIGNALS: Mutex<()> = Mutex::new(());

fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inc = Arc::clone(&count);
    (count, move || {
        inc.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn runs_action_then_cleanup_once() {
    let _serial = SIGNALS.lock();
    let (cleanups, cleanup) = counter();
    let seen = Arc::clone(&cleanups);
    let value = run_guarded(
        move || {
            assert_eq!(seen.load(Ordering::SeqCst), 0);
            "done"
        },
        cleanup,
    );
    assert_eq!(value, Ok("done"));
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[test]
fn cleanup_runs_when_action_panics() {
    let _serial = SIGNALS.lock();
    let (cleanups, cleanup) = counter();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_guarded(|| panic!("boom"), cleanup)
    }));
    assert!(result.is_err());
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[test]
fn options_are_checked_before_running() {
    let (actions, action) = counter();
    let err = run_ensured(EnsureOptions::new().with("action", action)).unwrap_err();
    assert_eq!(err, GuardError::MissingKey("cleanup"));
    assert_eq!(actions.load(Ordering::SeqCst), 0);

    let err = run_ensured(EnsureOptions::new().with("cleanup", || {})).unwrap_err();
    assert_eq!(err.to_string(), "must pass the `action` key");
}

#[test]
fn ensured_run_uses_both_closures() {
    let _serial = SIGNALS.lock();
    let (actions, action) = counter();
    let (cleanups, cleanup) = counter();
    run_ensured(
        EnsureOptions::new()
            .with(ACTION, action)
            .with(CLEANUP, cleanup),
    )
    .unwrap();
    assert_eq!(actions.load(Ordering::SeqCst), 1);
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[test]
fn nested_runs_are_rejected() {
    let _serial = SIGNALS.lock();
    let (cleanups, cleanup) = counter();
    let inner = run_guarded(|| run_guarded(|| (), || {}), cleanup).unwrap();
    assert_eq!(inner, Err(GuardError::Nested));
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}

#[cfg(unix)]
mod interrupts {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nix::libc::c_int;
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
    use pretty_assertions::assert_eq;

    use super::{counter, SIGNALS};
    use crate::run_guarded;

    static OBSERVED: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn observe(_signal: c_int) {
        OBSERVED.fetch_add(1, Ordering::SeqCst);
    }

    fn set_disposition(handler: SigHandler) -> SigAction {
        let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
        unsafe { signal::sigaction(Signal::SIGINT, &action) }.unwrap()
    }

    /// The current disposition, read by swapping it out and back.
    fn disposition() -> SigHandler {
        let current = set_disposition(SigHandler::SigDfl);
        unsafe { signal::sigaction(Signal::SIGINT, &current) }.unwrap();
        current.handler()
    }

    #[test]
    fn interrupt_runs_cleanup_then_reaches_previous_handler() {
        let _serial = SIGNALS.lock();
        let original = set_disposition(SigHandler::Handler(observe));
        OBSERVED.store(0, Ordering::SeqCst);

        let (cleanups, cleanup) = counter();
        let seen = cleanups.clone();
        let after_interrupt = run_guarded(
            move || {
                signal::raise(Signal::SIGINT).unwrap();
                seen.load(Ordering::SeqCst)
            },
            cleanup,
        )
        .unwrap();

        assert_eq!(after_interrupt, 1);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(OBSERVED.load(Ordering::SeqCst), 1);
        assert_eq!(disposition(), SigHandler::Handler(observe));

        unsafe { signal::sigaction(Signal::SIGINT, &original) }.unwrap();
    }

    #[test]
    fn interrupt_during_install_is_acted_on_before_the_action() {
        let _serial = SIGNALS.lock();
        let original = set_disposition(SigHandler::Handler(observe));
        OBSERVED.store(0, Ordering::SeqCst);

        // What the handler records when it finds no published cleanup.
        crate::unix::DEFERRED.store(true, Ordering::SeqCst);
        let (cleanups, cleanup) = counter();
        let seen = cleanups.clone();
        let before_action = run_guarded(move || seen.load(Ordering::SeqCst), cleanup).unwrap();

        assert_eq!(before_action, 1);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(OBSERVED.load(Ordering::SeqCst), 1);
        assert_eq!(disposition(), SigHandler::Handler(observe));
        assert!(!crate::unix::DEFERRED.load(Ordering::SeqCst));

        unsafe { signal::sigaction(Signal::SIGINT, &original) }.unwrap();
    }

    #[test]
    fn ignored_interrupts_stay_ignored() {
        let _serial = SIGNALS.lock();
        let original = set_disposition(SigHandler::SigIgn);

        let (cleanups, cleanup) = counter();
        let seen = cleanups.clone();
        let during = run_guarded(
            move || {
                signal::raise(Signal::SIGINT).unwrap();
                seen.load(Ordering::SeqCst)
            },
            cleanup,
        )
        .unwrap();

        assert_eq!(during, 0);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(disposition(), SigHandler::SigIgn);

        unsafe { signal::sigaction(Signal::SIGINT, &original) }.unwrap();
    }

    #[test]
    fn disposition_is_restored_after_a_quiet_run() {
        let _serial = SIGNALS.lock();
        let original = set_disposition(SigHandler::Handler(observe));

        run_guarded(|| (), || {}).unwrap();
        assert_eq!(disposition(), SigHandler::Handler(observe));

        unsafe { signal::sigaction(Signal::SIGINT, &original) }.unwrap();
    }
}

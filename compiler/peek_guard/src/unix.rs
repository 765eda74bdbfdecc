//! The interrupt handler.
//!
//! The pending cleanup lives in a process-wide slot. Whoever swaps it out
//! first, the handler or the normal exit path, restores the previous
//! disposition and runs it; the other finds the slot empty. That swap is
//! the only synchronization the handler performs.
//!
//! The handler itself neither allocates nor frees, nor logs. A failure to
//! restore or re-raise there is recorded and reported by the next normal
//! exit.

use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use nix::libc::c_int;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::{debug, warn};

use crate::options::Callback;
use crate::GuardError;

struct Frame {
    /// Taken by whoever runs it.
    cleanup: Option<Callback>,
    /// Disposition to put back; `None` when nothing was installed.
    previous: Option<SigAction>,
}

static FRAME: AtomicPtr<Frame> = AtomicPtr::new(ptr::null_mut());

/// An interrupt reached the handler while no frame was published: either
/// before `install` published it or after the exit path took it.
pub(crate) static DEFERRED: AtomicBool = AtomicBool::new(false);

/// Restoring or re-raising failed inside the handler.
static HANDLER_FAILED: AtomicBool = AtomicBool::new(false);

/// Owns the installed handler; dropping it runs the cleanup unless the
/// handler already did.
pub(crate) struct Installed {
    _private: (),
}

/// Install the interrupt handler, unless interrupts are ignored.
pub(crate) fn install(cleanup: Callback) -> Result<Installed, GuardError> {
    let ours = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: `on_interrupt` only touches atomics and the frame it takes
    // sole ownership of.
    let previous = unsafe { signal::sigaction(Signal::SIGINT, &ours) }?;

    let previous = if previous.handler() == SigHandler::SigIgn {
        // SAFETY: reinstalls the disposition that was in place a moment ago.
        unsafe { signal::sigaction(Signal::SIGINT, &previous) }?;
        // Anything our handler saw meanwhile was meant to be ignored.
        DEFERRED.store(false, Ordering::Release);
        debug!("interrupts are ignored; handler not installed");
        None
    } else {
        debug!(previous = ?previous.handler(), "interrupt handler installed");
        Some(previous)
    };

    let frame = Box::into_raw(Box::new(Frame {
        cleanup: Some(cleanup),
        previous,
    }));
    FRAME.store(frame, Ordering::Release);

    // The handler found no frame between `sigaction` and the store above.
    if DEFERRED.swap(false, Ordering::AcqRel) {
        if let Some(frame) = take_frame() {
            warn!("interrupt arrived while installing the handler");
            finish(frame);
            reraise();
        }
    }
    Ok(Installed { _private: () })
}

impl Drop for Installed {
    fn drop(&mut self) {
        if HANDLER_FAILED.swap(false, Ordering::AcqRel) {
            warn!("interrupt handler could not restore the disposition or re-raise");
        }
        let Some(frame) = take_frame() else {
            debug!("cleanup already ran on interrupt");
            return;
        };
        finish(frame);
        if DEFERRED.swap(false, Ordering::AcqRel) {
            warn!("re-raising an interrupt received during cleanup hand-off");
            reraise();
        }
    }
}

fn take_frame() -> Option<Box<Frame>> {
    let frame = FRAME.swap(ptr::null_mut(), Ordering::AcqRel);
    if frame.is_null() {
        return None;
    }
    // SAFETY: non-null pointers in `FRAME` come from `Box::into_raw` in
    // `install`, and the swap leaves this caller as the only owner.
    Some(unsafe { Box::from_raw(frame) })
}

/// Restore the previous disposition, then run the cleanup.
fn finish(mut frame: Box<Frame>) {
    if let Err(errno) = restore(frame.previous) {
        warn!(%errno, "could not restore the interrupt disposition");
    }
    if let Some(cleanup) = frame.cleanup.take() {
        cleanup();
    }
}

fn reraise() {
    if let Err(errno) = signal::raise(Signal::SIGINT) {
        warn!(%errno, "could not re-raise the interrupt");
    }
}

fn restore(previous: Option<SigAction>) -> nix::Result<()> {
    match previous {
        // SAFETY: puts back the disposition `install` replaced.
        Some(previous) => unsafe { signal::sigaction(Signal::SIGINT, &previous) }.map(drop),
        None => Ok(()),
    }
}

extern "C" fn on_interrupt(_signal: c_int) {
    let frame = FRAME.swap(ptr::null_mut(), Ordering::AcqRel);
    if frame.is_null() {
        DEFERRED.store(true, Ordering::Release);
        return;
    }
    // SAFETY: the swap made this handler the only owner. The frame is
    // leaked rather than freed; deallocating is not async-signal-safe.
    let frame = unsafe { &mut *frame };
    let restored = restore(frame.previous).is_ok();
    if let Some(cleanup) = frame.cleanup.take() {
        cleanup();
    }
    // Delivered once this handler returns, to the restored disposition.
    let raised = signal::raise(Signal::SIGINT).is_ok();
    if !(restored && raised) {
        HANDLER_FAILED.store(true, Ordering::Release);
    }
}

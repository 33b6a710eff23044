//! Widget state for the download form, bound to the thread that created it.
//!
//! The form owns a progress bar, a start button, a cancel button and the
//! outcome of the last run. Checked mutators refuse to run off the owner
//! thread, the same way a retained-mode toolkit rejects cross-thread control
//! access. Workers either post their changes through [`dispatch`] or, for the
//! deliberately broken strategy, write through a [`DetachedSurface`].

pub mod dispatch;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crate::domain::{ProgressFraction, RunOutcome, SurfaceError};

const OUTCOME_NONE: u8 = 0;
const OUTCOME_COMPLETED: u8 = 1;
const OUTCOME_CANCELLED: u8 = 2;

#[derive(Debug)]
struct Widgets {
    progress_bits: AtomicU32,
    start_enabled: AtomicBool,
    cancel_enabled: AtomicBool,
    last_outcome: AtomicU8,
}

impl Widgets {
    fn idle() -> Self {
        Self {
            progress_bits: AtomicU32::new(0.0f32.to_bits()),
            start_enabled: AtomicBool::new(true),
            cancel_enabled: AtomicBool::new(false),
            last_outcome: AtomicU8::new(OUTCOME_NONE),
        }
    }

    // Relaxed except the start button: its Release store publishes the
    // cleared run state to whoever sees start enabled again.
    fn write_progress(&self, fraction: ProgressFraction) {
        self.progress_bits
            .store(fraction.value().to_bits(), Ordering::Relaxed);
    }

    fn write_running(&self) {
        self.start_enabled.store(false, Ordering::Relaxed);
        self.cancel_enabled.store(true, Ordering::Relaxed);
    }

    fn write_idle(&self, outcome: RunOutcome) {
        let code = match outcome {
            RunOutcome::Completed => OUTCOME_COMPLETED,
            RunOutcome::Cancelled => OUTCOME_CANCELLED,
        };
        self.last_outcome.store(code, Ordering::Relaxed);
        self.write_buttons_idle();
    }

    fn write_buttons_idle(&self) {
        self.cancel_enabled.store(false, Ordering::Relaxed);
        self.start_enabled.store(true, Ordering::Release);
    }
}

/// Handle to the form's widgets that enforces owner-thread access on writes.
#[derive(Debug, Clone)]
pub struct Surface {
    owner: ThreadId,
    widgets: Arc<Widgets>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Creates the form, owned by the calling thread.
    pub fn new() -> Self {
        Self {
            owner: thread::current().id(),
            widgets: Arc::new(Widgets::idle()),
        }
    }

    #[cfg(test)]
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// True when the caller must marshal instead of touching widgets.
    pub fn invoke_required(&self) -> bool {
        thread::current().id() != self.owner
    }

    pub fn ensure_owner(&self) -> Result<(), SurfaceError> {
        if !self.invoke_required() {
            return Ok(());
        }
        Err(SurfaceError::WrongThread {
            owner: self.owner,
            caller: thread::current().id(),
        })
    }

    pub fn set_progress(&self, fraction: ProgressFraction) -> Result<(), SurfaceError> {
        self.ensure_owner()?;
        self.widgets.write_progress(fraction);
        Ok(())
    }

    /// Disables start and enables cancel.
    pub fn show_running(&self) -> Result<(), SurfaceError> {
        self.ensure_owner()?;
        self.widgets.write_running();
        Ok(())
    }

    /// Re-enables start, disables cancel and records how the run ended.
    pub fn reset(&self, outcome: RunOutcome) -> Result<(), SurfaceError> {
        self.ensure_owner()?;
        self.widgets.write_idle(outcome);
        Ok(())
    }

    /// Back to idle without recording an outcome, for runs that never started.
    pub fn restore_idle(&self) -> Result<(), SurfaceError> {
        self.ensure_owner()?;
        self.widgets.write_buttons_idle();
        Ok(())
    }

    /// Unchecked write access for code that ignores thread affinity.
    pub fn detached(&self) -> DetachedSurface {
        DetachedSurface {
            widgets: Arc::clone(&self.widgets),
        }
    }

    pub fn progress(&self) -> ProgressFraction {
        ProgressFraction::new(f32::from_bits(
            self.widgets.progress_bits.load(Ordering::Relaxed),
        ))
    }

    pub fn start_enabled(&self) -> bool {
        self.widgets.start_enabled.load(Ordering::Acquire)
    }

    pub fn cancel_enabled(&self) -> bool {
        self.widgets.cancel_enabled.load(Ordering::Relaxed)
    }

    pub fn is_idle(&self) -> bool {
        self.start_enabled() && !self.cancel_enabled()
    }

    pub fn last_outcome(&self) -> Option<RunOutcome> {
        match self.widgets.last_outcome.load(Ordering::Relaxed) {
            OUTCOME_COMPLETED => Some(RunOutcome::Completed),
            OUTCOME_CANCELLED => Some(RunOutcome::Cancelled),
            _ => None,
        }
    }
}

/// Writes to the form's widgets from any thread, skipping the affinity check.
///
/// Nothing orders these writes against each other or against the UI thread's
/// own reads and redraws. Whatever the window shows afterwards is not
/// guaranteed: stale bars, half-reset buttons, or apparent success.
#[derive(Debug, Clone)]
pub struct DetachedSurface {
    widgets: Arc<Widgets>,
}

impl DetachedSurface {
    pub fn set_progress(&self, fraction: ProgressFraction) {
        self.widgets.write_progress(fraction);
    }

    pub fn reset(&self, outcome: RunOutcome) {
        self.widgets.write_idle(outcome);
    }
}

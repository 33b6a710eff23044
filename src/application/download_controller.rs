use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, error, info, trace, warn};

use crate::{
    config::DemoConfig,
    domain::{
        ControllerError, DownloadState, ProgressFraction, RunOutcome, RunSummary, Strategy,
        SurfaceError,
    },
    surface::{
        dispatch::{self, UiPoster, UiQueue, UiUpdate},
        DetachedSurface, Surface,
    },
    utils::simulated_latency,
};

const WORKER_THREAD_NAME: &str = "download-worker";

/// Where the loop's widget changes go. Chosen once when a run starts.
pub type UpdatePolicy = Box<dyn FnMut(UiUpdate) + Send>;

/// What `start` hands back, depending on where the loop runs.
#[derive(Debug)]
pub enum RunTicket {
    /// The loop already ran to the end on the calling (UI) thread.
    Finished(RunSummary),
    /// A worker is writing to the form directly.
    Detached(JoinHandle<RunSummary>),
    /// A worker is posting updates; drain `queue` on the UI thread.
    Marshaled {
        queue: UiQueue,
        worker: JoinHandle<RunSummary>,
    },
}

/// Starts, cancels and finishes simulated downloads for one form.
pub struct DownloadController {
    config: DemoConfig,
    surface: Surface,
    state: Arc<DownloadState>,
    active: Option<Strategy>,
}

impl DownloadController {
    pub fn new(config: DemoConfig, surface: Surface) -> Self {
        Self {
            config,
            surface,
            state: Arc::new(DownloadState::new()),
            active: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn state(&self) -> &DownloadState {
        &self.state
    }

    /// Strategy of the in-flight run, `None` once the form is idle again.
    pub fn active_strategy(&self) -> Option<Strategy> {
        if self.surface.is_idle() {
            None
        } else {
            self.active
        }
    }

    /// Starts a run with `strategy`. Only valid on the UI thread while idle.
    pub fn start(&mut self, strategy: Strategy) -> Result<RunTicket, ControllerError> {
        self.surface.ensure_owner()?;
        if !self.surface.start_enabled() {
            return Err(ControllerError::AlreadyRunning);
        }

        self.state.begin();
        self.surface.set_progress(ProgressFraction::ZERO)?;
        self.surface.show_running()?;
        self.active = Some(strategy);
        info!(%strategy, total_units = self.config.total_units, "starting download");

        let job = SimulatedDownload {
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            strategy,
        };

        match strategy {
            Strategy::DoWorkOnUiThread => {
                let mut policy = direct_policy(self.surface.clone(), Arc::clone(&self.state));
                let summary = job.run(&mut policy);
                self.active = None;
                Ok(RunTicket::Finished(summary))
            }
            Strategy::DoWorkInSeparateThreadButIncorrectly => {
                warn!("worker will write to the form directly, bypassing its owner thread");
                let policy = unsynchronized_policy(self.surface.detached(), Arc::clone(&self.state));
                let worker = self.spawn_worker(job, policy)?;
                Ok(RunTicket::Detached(worker))
            }
            Strategy::DoWorkInSeparateThread => {
                let (poster, queue) = dispatch::channel();
                let worker = self.spawn_worker(job, marshaled_policy(poster))?;
                Ok(RunTicket::Marshaled { queue, worker })
            }
        }
    }

    /// Asks the running loop to stop at its next iteration boundary.
    ///
    /// Returns `false` when no run is active.
    pub fn cancel(&self) -> bool {
        if !self.surface.cancel_enabled() {
            return false;
        }
        self.state.request_cancel();
        info!(
            completed_units = self.state.completed_units(),
            "cancel requested"
        );
        true
    }

    /// Applies an update that a worker posted to the UI thread.
    pub fn apply(&mut self, update: UiUpdate) -> Result<(), ControllerError> {
        apply_update(&self.surface, &self.state, update)?;
        if let UiUpdate::Reset(_) = update {
            self.active = None;
        }
        Ok(())
    }

    fn spawn_worker(
        &mut self,
        job: SimulatedDownload,
        mut policy: UpdatePolicy,
    ) -> Result<JoinHandle<RunSummary>, ControllerError> {
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || job.run(&mut policy));

        match spawned {
            Ok(handle) => Ok(handle),
            Err(err) => {
                error!(%err, "could not spawn download worker");
                self.abandon_start()?;
                Err(ControllerError::Spawn(err))
            }
        }
    }

    /// Undoes `start` for a run that never began; the last outcome is kept.
    fn abandon_start(&mut self) -> Result<(), SurfaceError> {
        self.state.clear();
        self.surface.restore_idle()?;
        self.active = None;
        Ok(())
    }
}

/// The simulated long-running download.
struct SimulatedDownload {
    config: DemoConfig,
    state: Arc<DownloadState>,
    strategy: Strategy,
}

impl SimulatedDownload {
    fn run(self, policy: &mut dyn FnMut(UiUpdate)) -> RunSummary {
        let total = self.config.total_units;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut outcome = RunOutcome::Completed;
        for _ in 0..total {
            if self.state.cancel_requested() {
                outcome = RunOutcome::Cancelled;
                break;
            }
            thread::sleep(simulated_latency(&mut rng, self.config.max_latency_ms));

            let done = self.state.advance();
            trace!(done, total, "file downloaded");
            policy(UiUpdate::Progress(ProgressFraction::from_units(done, total)));
        }

        let summary = RunSummary {
            strategy: self.strategy,
            completed_units: self.state.completed_units(),
            total_units: total,
            outcome,
        };
        info!(
            strategy = %summary.strategy,
            completed_units = summary.completed_units,
            outcome = ?summary.outcome,
            "download finished"
        );
        policy(UiUpdate::Reset(summary));
        summary
    }
}

fn apply_update(
    surface: &Surface,
    state: &DownloadState,
    update: UiUpdate,
) -> Result<(), SurfaceError> {
    match update {
        UiUpdate::Progress(fraction) => surface.set_progress(fraction),
        UiUpdate::Reset(summary) => {
            // State is cleared before start is re-enabled, so a new run's
            // begin() can never be undone by this one.
            surface.ensure_owner()?;
            state.clear();
            surface.reset(summary.outcome)
        }
    }
}

fn direct_policy(surface: Surface, state: Arc<DownloadState>) -> UpdatePolicy {
    Box::new(move |update| {
        if let Err(err) = apply_update(&surface, &state, update) {
            error!(%err, ?update, "form update rejected");
        }
    })
}

// Unsynchronized: writes race with the UI thread's own reads.
fn unsynchronized_policy(surface: DetachedSurface, state: Arc<DownloadState>) -> UpdatePolicy {
    Box::new(move |update| match update {
        UiUpdate::Progress(fraction) => surface.set_progress(fraction),
        UiUpdate::Reset(summary) => {
            state.clear();
            surface.reset(summary.outcome);
        }
    })
}

fn marshaled_policy(poster: UiPoster) -> UpdatePolicy {
    Box::new(move |update| {
        debug!(?update, "posting to UI thread");
        poster.post(update);
    })
}

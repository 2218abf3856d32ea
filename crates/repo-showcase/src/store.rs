//! Observable acquisition lifecycle bound to one owner handle at a time.
//!
//! Every run is stamped with the handle and a generation number taken at
//! start. On completion the stamp is compared against the current binding
//! and a mismatch means the run was superseded: its result is dropped.
//! In-flight requests are never aborted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::coordinator::{FallbackCoordinator, RunOutcome};
use crate::types::{AcquisitionState, AcquisitionView, OwnerHandle, ProjectSummary};

#[derive(Debug, Default)]
struct Binding {
    handle: Option<OwnerHandle>,
    generation: u64,
    notice: Option<String>,
    previous: Vec<ProjectSummary>,
}

struct Shared {
    binding: Mutex<Binding>,
    state_tx: watch::Sender<AcquisitionState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Binding> {
        self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit a finished run if it still owns the binding.
    fn commit(&self, handle: &OwnerHandle, generation: u64, outcome: RunOutcome) -> bool {
        let mut binding = self.lock();
        if binding.generation != generation || binding.handle.as_ref() != Some(handle) {
            tracing::debug!("Discarding superseded run for {handle} (generation {generation})");
            return false;
        }

        match outcome {
            RunOutcome::Ready(acq) => {
                binding.notice = acq.fallback_reason.map(|reason| {
                    format!(
                        "Pinned repositories unavailable ({reason}); showing most-starred repositories"
                    )
                });
                binding.previous = acq.projects.clone();
                self.state_tx.send_replace(AcquisitionState::Ready(acq.projects));
            }
            other => {
                self.state_tx.send_replace(other.into_state());
            }
        }
        true
    }
}

/// Holds the [`AcquisitionState`] for the currently bound handle.
///
/// Runs are spawned on the ambient Tokio runtime, so `bind` and `refresh`
/// must be called from within one.
pub struct AcquisitionStore {
    coordinator: FallbackCoordinator,
    shared: Arc<Shared>,
}

impl AcquisitionStore {
    pub fn new(coordinator: FallbackCoordinator) -> Self {
        let (state_tx, _) = watch::channel(AcquisitionState::Idle);
        Self {
            coordinator,
            shared: Arc::new(Shared {
                binding: Mutex::new(Binding::default()),
                state_tx,
            }),
        }
    }

    /// Bind to `raw_handle` and start a run for it.
    ///
    /// Blank input unbinds and leaves the store `Idle`. Binding the handle
    /// that is already bound does nothing; use [`refresh`](Self::refresh)
    /// to re-run.
    pub fn bind(&self, raw_handle: &str) -> Option<JoinHandle<()>> {
        let Some(handle) = OwnerHandle::parse(raw_handle) else {
            self.unbind();
            return None;
        };

        let generation = {
            let mut binding = self.shared.lock();
            if binding.handle.as_ref() == Some(&handle) {
                return None;
            }
            binding.generation += 1;
            binding.handle = Some(handle.clone());
            binding.notice = None;
            binding.previous.clear();
            self.shared.state_tx.send_replace(AcquisitionState::Loading);
            binding.generation
        };

        tracing::debug!("Bound to {handle} (generation {generation})");
        Some(self.spawn_run(handle, generation))
    }

    /// Re-run acquisition for the bound handle, keeping the last `Ready`
    /// list available as [`AcquisitionView::previous`].
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        let (handle, generation) = {
            let mut binding = self.shared.lock();
            let handle = binding.handle.clone()?;
            binding.generation += 1;
            binding.notice = None;
            self.shared.state_tx.send_replace(AcquisitionState::Loading);
            (handle, binding.generation)
        };

        tracing::debug!("Refreshing {handle} (generation {generation})");
        Some(self.spawn_run(handle, generation))
    }

    /// Drop the binding. Any in-flight run will be discarded.
    pub fn unbind(&self) {
        let mut binding = self.shared.lock();
        binding.generation += 1;
        binding.handle = None;
        binding.notice = None;
        binding.previous.clear();
        self.shared.state_tx.send_replace(AcquisitionState::Idle);
    }

    pub fn handle(&self) -> Option<OwnerHandle> {
        self.shared.lock().handle.clone()
    }

    pub fn state(&self) -> AcquisitionState {
        self.shared.state_tx.borrow().clone()
    }

    /// Presentation projection of the current state.
    pub fn view(&self) -> AcquisitionView {
        let binding = self.shared.lock();
        let state = self.shared.state_tx.borrow();
        AcquisitionView {
            projects: state.projects().to_vec(),
            loading: state.is_loading(),
            error: state.error().map(str::to_string),
            notice: binding.notice.clone(),
            previous: binding.previous.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until the current state is no longer `Loading`.
    pub async fn settled(&self) -> AcquisitionState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(AcquisitionState::is_settled).await;
        match settled {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    fn spawn_run(&self, handle: OwnerHandle, generation: u64) -> JoinHandle<()> {
        let coordinator = self.coordinator.clone();
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let outcome = coordinator.run(Some(&handle)).await;
            shared.commit(&handle, generation, outcome);
        })
    }
}

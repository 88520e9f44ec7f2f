use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::state_machine::{apply, Action, RawAction};
use super::types::RegistrationState;

/// Holds the current registration state and publishes every committed change.
///
/// Each dispatch replaces the whole value, so subscribers never observe a
/// half-applied transition.
#[derive(Debug, Clone)]
pub struct StateStore {
    sender: Arc<watch::Sender<RegistrationState>>,
    /// Bumped by every detection start and every reset
    detection_generation: Arc<AtomicU64>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(RegistrationState::default())
    }
}

impl StateStore {
    pub fn new(initial: RegistrationState) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            detection_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.sender.send_modify(|state| {
            if action == Action::Reset {
                // Bumped under the write lock so a detection commit cannot interleave
                self.detection_generation.fetch_add(1, Ordering::AcqRel);
            }
            *state = apply(state, action);
        });
    }

    pub fn dispatch_raw(&self, raw: &RawAction) {
        match raw.parse() {
            Some(action) => self.dispatch(action),
            None => debug!(kind = %raw.kind, "Ignoring unhandled registration action kind"),
        }
    }

    /// Replace the state with the result of a pure transition function
    pub fn update<F>(&self, transition: F)
    where
        F: FnOnce(&RegistrationState) -> RegistrationState,
    {
        self.sender.send_modify(|state| *state = transition(state));
    }

    /// Start a new detection; results from earlier ones become stale
    pub fn begin_detection(&self) -> u64 {
        self.detection_generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Apply detection results only if no newer detection or reset happened
    /// since `generation` was handed out. Returns whether they were applied.
    pub fn commit_detection<I>(&self, generation: u64, actions: I) -> bool
    where
        I: IntoIterator<Item = Action>,
    {
        self.sender.send_if_modified(|state| {
            if self.detection_generation.load(Ordering::Acquire) != generation {
                return false;
            }
            for action in actions {
                *state = apply(state, action);
            }
            true
        })
    }

    pub fn snapshot(&self) -> RegistrationState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RegistrationState> {
        self.sender.subscribe()
    }
}

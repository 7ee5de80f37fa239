// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application-wide single-flight coordinator for user-triggered actions.
//!
//! At most one action is active at a time across every button that shares a
//! coordinator. An action is active while it runs and, after it succeeds,
//! for its cooldown window. Failed actions release the coordinator at once
//! and hand the error back to the caller.
//!
//! State lives in a `tokio::sync::watch` channel: it is replaced wholesale on
//! every transition and observers get each new value through `subscribe()`.

use std::future::Future;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Cooldown applied when a button does not ask for a specific one.
pub const DEFAULT_COOLDOWN_SECS: u32 = 3;

/// Snapshot of the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CooldownState {
    pub is_loading: bool,
    pub cooldown_seconds: u32,
    pub action_id: Option<String>,
}

impl CooldownState {
    pub fn idle() -> Self {
        Self::default()
    }

    fn loading(action_id: &str) -> Self {
        Self {
            is_loading: true,
            cooldown_seconds: 0,
            action_id: Some(action_id.to_string()),
        }
    }

    fn cooling(action_id: &str, seconds: u32) -> Self {
        Self {
            is_loading: false,
            cooldown_seconds: seconds,
            action_id: Some(action_id.to_string()),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.is_loading && self.cooldown_seconds == 0
    }

    fn is_for(&self, action_id: &str) -> bool {
        self.action_id.as_deref() == Some(action_id)
    }
}

/// Result of asking the coordinator to run an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The action ran and succeeded; its cooldown has started.
    Completed,
    /// Another action is running. Nothing was invoked.
    Busy,
    /// An action is in its cooldown window. Nothing was invoked.
    CoolingDown { action_id: String, remaining: u32 },
}

impl StartOutcome {
    pub fn was_dropped(&self) -> bool {
        !matches!(self, StartOutcome::Completed)
    }

    /// User-facing wait notice for a call rejected during a cooldown.
    pub fn wait_notice(&self) -> Option<String> {
        match self {
            StartOutcome::CoolingDown { remaining, .. } => Some(format!(
                "Por favor, aguarde {} segundo{} antes de tentar novamente.",
                remaining,
                if *remaining > 1 { "s" } else { "" }
            )),
            _ => None,
        }
    }
}

struct Inner {
    state: watch::Sender<CooldownState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn replace_ticker(&self, handle: Option<JoinHandle<()>>) {
        let mut ticker = self.ticker.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = std::mem::replace(&mut *ticker, handle) {
            previous.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}

/// Shared handle to the coordinator. Clones share the same state.
#[derive(Clone)]
pub struct CooldownCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CooldownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownCoordinator")
            .field("state", &self.state())
            .finish()
    }
}

impl Default for CooldownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl CooldownCoordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CooldownState::idle());
        Self {
            inner: Arc::new(Inner {
                state,
                ticker: Mutex::new(None),
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> CooldownState {
        self.inner.state.borrow().clone()
    }

    /// Observe every state replacement.
    pub fn subscribe(&self) -> watch::Receiver<CooldownState> {
        self.inner.state.subscribe()
    }

    /// Per-button view bound to `action_id`.
    pub fn action(&self, action_id: impl Into<String>, cooldown_secs: u32) -> ActionHandle {
        ActionHandle {
            coordinator: self.clone(),
            action_id: action_id.into(),
            cooldown_secs,
        }
    }

    /// Run `action` under the single-flight rule.
    ///
    /// `action` is only invoked when the coordinator is idle. On success the
    /// action enters a `cooldown_secs` cooldown; on failure the coordinator
    /// returns to idle and the error is passed through untouched.
    pub async fn start<F, Fut, E>(
        &self,
        action_id: &str,
        cooldown_secs: u32,
        action: F,
    ) -> Result<StartOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let mut rejected = None;
        self.inner.state.send_if_modified(|state| {
            if state.is_loading {
                rejected = Some(StartOutcome::Busy);
                return false;
            }
            if state.cooldown_seconds > 0 {
                rejected = Some(StartOutcome::CoolingDown {
                    action_id: state.action_id.clone().unwrap_or_default(),
                    remaining: state.cooldown_seconds,
                });
                return false;
            }
            *state = CooldownState::loading(action_id);
            true
        });

        if let Some(outcome) = rejected {
            tracing::debug!(action = action_id, outcome = ?outcome, "Action dropped");
            return Ok(outcome);
        }

        let guard = LoadingGuard {
            inner: &self.inner,
            armed: true,
        };
        let result = action().await;
        guard.disarm();

        match result {
            Ok(()) => {
                self.begin_cooldown(action_id, cooldown_secs);
                Ok(StartOutcome::Completed)
            }
            Err(e) => {
                tracing::debug!(action = action_id, "Action failed, coordinator released");
                self.inner.state.send_replace(CooldownState::idle());
                Err(e)
            }
        }
    }

    fn begin_cooldown(&self, action_id: &str, cooldown_secs: u32) {
        if cooldown_secs == 0 {
            self.inner.state.send_replace(CooldownState::idle());
            return;
        }

        self.inner
            .state
            .send_replace(CooldownState::cooling(action_id, cooldown_secs));

        let ticker = tokio::spawn(run_countdown(
            Arc::downgrade(&self.inner),
            action_id.to_string(),
        ));
        self.inner.replace_ticker(Some(ticker));
    }
}

/// Decrement the cooldown once per second until it reaches zero.
async fn run_countdown(inner: Weak<Inner>, action_id: String) {
    let period = Duration::from_secs(1);
    let mut ticks = interval_at(Instant::now() + period, period);

    loop {
        ticks.tick().await;
        let Some(strong) = inner.upgrade() else {
            return;
        };

        let mut finished = false;
        strong.state.send_if_modified(|state| {
            if state.is_loading || !state.is_for(&action_id) || state.cooldown_seconds == 0 {
                finished = true;
                return false;
            }
            let remaining = state.cooldown_seconds - 1;
            *state = if remaining == 0 {
                finished = true;
                CooldownState::idle()
            } else {
                CooldownState::cooling(&action_id, remaining)
            };
            true
        });

        if finished {
            tracing::trace!(action = %action_id, "Cooldown finished");
            return;
        }
    }
}

/// Releases the coordinator if the caller abandons `start` mid-action.
struct LoadingGuard<'a> {
    inner: &'a Inner,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.state.send_replace(CooldownState::idle());
        }
    }
}

/// One button's view of the coordinator.
#[derive(Clone)]
pub struct ActionHandle {
    coordinator: CooldownCoordinator,
    action_id: String,
    cooldown_secs: u32,
}

impl ActionHandle {
    pub fn id(&self) -> &str {
        &self.action_id
    }

    pub async fn run<F, Fut, E>(&self, action: F) -> Result<StartOutcome, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.coordinator
            .start(&self.action_id, self.cooldown_secs, action)
            .await
    }

    /// Any action loading, or this action cooling down.
    pub fn is_disabled(&self) -> bool {
        let state = self.coordinator.state();
        state.is_loading || (state.cooldown_seconds > 0 && state.is_for(&self.action_id))
    }

    /// This action is the one currently running.
    pub fn is_loading(&self) -> bool {
        let state = self.coordinator.state();
        state.is_loading && state.is_for(&self.action_id)
    }

    /// Seconds left in this action's cooldown, zero for every other action.
    pub fn remaining_seconds(&self) -> u32 {
        let state = self.coordinator.state();
        if state.is_for(&self.action_id) {
            state.cooldown_seconds
        } else {
            0
        }
    }
}

//! Credential lifecycle monitoring.
//!
//! [`TokenMonitor`] watches one credential at a time: an immediate check
//! when watching starts, then one check per period. A check first judges
//! expiry locally against `now + buffer` (no remote call needed for an
//! expired token), then issues a lightweight authenticated probe. Any
//! probe failure invalidates the session, a transient network failure
//! included; the monitor does not distinguish kinds.
//!
//! When a check concludes the credential is invalid, the expiry callback
//! fires exactly once and the monitor returns to idle. An explicit
//! [`stop_watching`](TokenMonitor::stop_watching) never fires the
//! callback. Starting a watch while one is active tears the old timer
//! down first; a monitor instance never runs two timers.

use crate::clock::{Clock, SystemClock};
use crate::error::ApiError;
use crate::token::{Credential, DEFAULT_EXPIRY_BUFFER};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Default interval between credential checks.
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(5 * 60);

/// Lightweight authenticated request used solely to test whether the
/// remote service still accepts a credential.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Succeeds iff the service accepted the credential.
    async fn probe(&self, credential: &Credential) -> Result<(), ApiError>;
}

/// Observable monitor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// No credential is being watched.
    Idle,
    /// A credential is watched and the timer is armed.
    Watching,
    /// A verification pass is in flight.
    Checking,
}

const STATE_IDLE: u8 = 0;
const STATE_WATCHING: u8 = 1;
const STATE_CHECKING: u8 = 2;

/// Expiry notification callback.
pub type OnExpired = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    probe: Arc<dyn Probe>,
    clock: Arc<dyn Clock>,
    period: Duration,
    buffer: Duration,
    on_expired: OnExpired,
    credential: ArcSwapOption<Credential>,
    state: AtomicU8,
    checking: AtomicBool,
}

impl Inner {
    fn set_state(&self, state: u8) {
        self.state.store(state, Ordering::SeqCst);
    }

    /// One verification pass. Returns `false` when the watch should end.
    /// A tick that lands while another pass is in flight is skipped.
    async fn check_once(&self) -> bool {
        if self.checking.swap(true, Ordering::SeqCst) {
            debug!("verification already in flight, skipping tick");
            return true;
        }
        self.set_state(STATE_CHECKING);

        let verdict = match self.credential.load_full() {
            Some(credential) => self.verify(&credential).await,
            // Credential cleared under us: end the watch silently.
            None => {
                self.checking.store(false, Ordering::SeqCst);
                self.set_state(STATE_IDLE);
                return false;
            }
        };

        self.checking.store(false, Ordering::SeqCst);

        if verdict {
            self.set_state(STATE_WATCHING);
            true
        } else {
            self.credential.store(None);
            self.set_state(STATE_IDLE);
            (self.on_expired)();
            false
        }
    }

    async fn verify(&self, credential: &Credential) -> bool {
        if credential.is_expired(self.clock.as_ref(), self.buffer) {
            debug!("credential expired locally, no probe needed");
            return false;
        }
        match self.probe.probe(credential).await {
            Ok(()) => {
                debug!("credential accepted by probe");
                true
            }
            Err(e) => {
                // Any probe failure invalidates the session, a transient
                // network error included.
                warn!(kind = %e.kind(), "credential probe failed");
                false
            }
        }
    }
}

async fn watch_loop(inner: Arc<Inner>) {
    let mut ticks = tokio::time::interval(inner.period);
    // A tick missed during a slow check is dropped, not queued.
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        // First tick resolves immediately: the initial check runs on start.
        ticks.tick().await;
        if !inner.check_once().await {
            break;
        }
    }
}

/// Watches a credential and signals expiry exactly once per event.
pub struct TokenMonitor {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for TokenMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMonitor")
            .field("period", &self.inner.period)
            .field("buffer", &self.inner.buffer)
            .field("state", &self.state())
            .finish()
    }
}

impl TokenMonitor {
    /// Start building a monitor around a probe and an expiry callback.
    pub fn builder(probe: Arc<dyn Probe>, on_expired: OnExpired) -> TokenMonitorBuilder {
        TokenMonitorBuilder {
            probe,
            on_expired,
            clock: Arc::new(SystemClock),
            period: DEFAULT_CHECK_PERIOD,
            buffer: DEFAULT_EXPIRY_BUFFER,
        }
    }

    /// Monitor with the default period, buffer, and clock.
    pub fn new(probe: Arc<dyn Probe>, on_expired: OnExpired) -> Self {
        Self::builder(probe, on_expired).build()
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        match self.inner.state.load(Ordering::SeqCst) {
            STATE_WATCHING => MonitorState::Watching,
            STATE_CHECKING => MonitorState::Checking,
            _ => MonitorState::Idle,
        }
    }

    /// The credential currently being watched, if any.
    pub fn watched(&self) -> Option<Arc<Credential>> {
        self.inner.credential.load_full()
    }

    /// Watch a credential: tear down any previous watch, check
    /// immediately, then check every period.
    pub fn start_watching(&self, credential: Credential) {
        self.teardown();
        self.inner.credential.store(Some(Arc::new(credential)));
        self.inner.set_state(STATE_WATCHING);
        let handle = tokio::spawn(watch_loop(Arc::clone(&self.inner)));
        *self.task.lock().unwrap() = Some(handle);
        debug!(period_secs = self.inner.period.as_secs(), "watch started");
    }

    /// Stop watching without signaling expiry (logout-initiated clears
    /// are silent).
    pub fn stop_watching(&self) {
        self.teardown();
        debug!("watch stopped");
    }

    /// Run a verification pass right now, outside the timer. Subject to
    /// the same re-entrancy guard as timed checks.
    pub async fn check_now(&self) {
        if self.inner.credential.load().is_some() {
            self.inner.check_once().await;
        }
    }

    fn teardown(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
        self.inner.credential.store(None);
        self.inner.checking.store(false, Ordering::SeqCst);
        self.inner.set_state(STATE_IDLE);
    }
}

impl Drop for TokenMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

/// Builder for [`TokenMonitor`].
pub struct TokenMonitorBuilder {
    probe: Arc<dyn Probe>,
    on_expired: OnExpired,
    clock: Arc<dyn Clock>,
    period: Duration,
    buffer: Duration,
}

impl TokenMonitorBuilder {
    /// Interval between checks.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// How close to `exp` a credential is already treated as expired.
    pub fn buffer(mut self, buffer: Duration) -> Self {
        self.buffer = buffer;
        self
    }

    /// Provide a custom clock (tests).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the monitor in the idle state. Panics if the period is
    /// zero.
    pub fn build(self) -> TokenMonitor {
        assert!(self.period > Duration::ZERO, "check period must be non-zero");
        TokenMonitor {
            inner: Arc::new(Inner {
                probe: self.probe,
                clock: self.clock,
                period: self.period,
                buffer: self.buffer,
                on_expired: self.on_expired,
                credential: ArcSwapOption::from(None),
                state: AtomicU8::new(STATE_IDLE),
                checking: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        }
    }
}

//! Timers for the `Timeout` component.
//!
//! The component schedules through the [`TimerService`] found in context
//! (see [`Timers`]).  Which implementation makes sense depends on where the
//! view is rendered: [`TokioTimer`] on a server, [`BrowserTimer`] in the
//! browser and [`NullTimer`] wherever the deadline should never pass.

use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use leptos::prelude::{provide_context, use_context, ArcRwSignal, Get, Set};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Callback run once a timer fires.
pub type Fire = Box<dyn FnOnce() + Send>;

/// Schedules callbacks after a delay.
pub trait TimerService: Send + Sync {
    /// Runs `fire` once `delay` has elapsed, unless the returned handle is
    /// dropped first.
    fn schedule(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, Error>;
}

/// A scheduled timer; dropping it cancels the timer.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Cancels the timer now.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    /// Lets the timer run to completion even when the handle is dropped.
    pub fn forget(mut self) {
        self.cancel = None;
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            tracing::debug!("cancelling timer");
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// A timer that never fires.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTimer;

impl TimerService for NullTimer {
    fn schedule(&self, _: Duration, _: Fire) -> Result<TimerHandle, Error> {
        Ok(TimerHandle::inert())
    }
}

#[cfg(feature = "tokio")]
mod tokio_timer {
    use super::*;

    /// A timer driven by the ambient tokio runtime.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct TokioTimer;

    impl TimerService for TokioTimer {
        fn schedule(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, Error> {
            let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;
            let task = runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                tracing::trace!(?delay, "timer fired");
                fire();
            });
            Ok(TimerHandle::new(move || task.abort()))
        }
    }
}

#[cfg(feature = "tokio")]
pub use tokio_timer::TokioTimer;

#[cfg(feature = "browser")]
mod browser_timer {
    use super::*;

    /// A timer backed by the browser's `setTimeout`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserTimer;

    impl TimerService for BrowserTimer {
        fn schedule(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, Error> {
            let handle = leptos::prelude::set_timeout_with_handle(
                move || {
                    tracing::trace!(?delay, "timer fired");
                    fire();
                },
                delay,
            )
            .map_err(|e| Error::Timer(format!("{e:?}")))?;
            Ok(TimerHandle::new(move || handle.clear()))
        }
    }
}

#[cfg(feature = "browser")]
pub use browser_timer::BrowserTimer;

/// The timer service made available to `Timeout` through context.
#[derive(Clone)]
pub struct Timers(Arc<dyn TimerService>);

impl Timers {
    pub fn new(service: impl TimerService + 'static) -> Self {
        Self(Arc::new(service))
    }

    /// Provides the service to every `Timeout` below the current owner.
    pub fn provide(service: impl TimerService + 'static) -> Self {
        let timers = Self::new(service);
        provide_context(timers.clone());
        timers
    }

    /// The service in context, else the default for the enabled features.
    pub fn current() -> Self {
        use_context::<Self>().unwrap_or_default()
    }

    pub fn schedule(&self, delay: Duration, fire: Fire) -> Result<TimerHandle, Error> {
        self.0.schedule(delay, fire)
    }
}

impl Default for Timers {
    #[allow(unreachable_code)]
    fn default() -> Self {
        #[cfg(feature = "browser")]
        return Self::new(BrowserTimer);
        #[cfg(feature = "tokio")]
        return Self::new(TokioTimer);
        Self::new(NullTimer)
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Timers(..)")
    }
}

/// When `Timeout` shows its children relative to the deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutMode {
    /// Children appear once the deadline passes.
    #[default]
    After,
    /// Children show until the deadline passes.
    Before,
}

impl TimeoutMode {
    /// Whether children show before the deadline passes.
    pub fn initially_ready(self) -> bool {
        self == Self::Before
    }
}

impl FromStr for TimeoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "after" => Ok(Self::After),
            "before" => Ok(Self::Before),
            _ => Err(Error::UnknownTimeoutMode(s.to_string())),
        }
    }
}

impl fmt::Display for TimeoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::After => "after",
            Self::Before => "before",
        })
    }
}

/// The deadline state of one `Timeout`.
///
/// `ready` starts at `mode == Before` and flips exactly once when the
/// deadline passes; a deadline passing after [`disarm`](Self::disarm) is
/// ignored.
#[derive(Clone)]
pub struct TimeoutGate {
    ready: ArcRwSignal<bool>,
    armed: Arc<AtomicBool>,
    mode: TimeoutMode,
}

impl TimeoutGate {
    pub fn new(mode: TimeoutMode) -> Self {
        Self {
            ready: ArcRwSignal::new(mode.initially_ready()),
            armed: Arc::new(AtomicBool::new(true)),
            mode,
        }
    }

    pub fn mode(&self) -> TimeoutMode {
        self.mode
    }

    /// Whether the children show, tracked.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Marks the deadline as passed.  Returns whether this call flipped the
    /// state; only the first call on an armed gate does.
    pub fn expire(&self) -> bool {
        if !self.armed.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.ready.set(!self.mode.initially_ready());
        true
    }

    /// Ignores the deadline from now on.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Schedules the deadline on `timers`, running `on_timeout` when it
    /// flips the state.
    pub fn arm(
        &self,
        timers: &Timers,
        delay: Duration,
        on_timeout: Option<Box<dyn FnOnce() + Send>>,
    ) -> Result<TimerHandle, Error> {
        let gate = self.clone();
        timers.schedule(
            delay,
            Box::new(move || {
                if gate.expire() {
                    if let Some(on_timeout) = on_timeout {
                        on_timeout();
                    }
                }
            }),
        )
    }
}

impl fmt::Debug for TimeoutGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeoutGate")
            .field("mode", &self.mode)
            .field("armed", &self.armed.load(Ordering::Acquire))
            .finish()
    }
}

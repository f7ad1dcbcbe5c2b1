use std::time::Duration;

use leptos::{
    children::{ChildrenFn, ViewFn},
    prelude::*,
};

use crate::timer::{TimeoutGate, TimeoutMode, Timers};

/// Shows or hides `children` once `ms` milliseconds have passed.
///
/// In [`TimeoutMode::After`] the children replace `fallback` when the time
/// is up; in [`TimeoutMode::Before`] they show until then and nothing
/// renders afterwards.  `on_timeout` runs when the time is up, unless the
/// component was torn down first.
///
/// The timer is scheduled on the [`Timers`] service in context.
#[component]
pub fn Timeout(
    /// The delay in milliseconds.
    ms: u64,
    children: ChildrenFn,
    #[prop(optional)] mode: TimeoutMode,
    /// Rendered before the time is up in [`TimeoutMode::After`].
    #[prop(optional, into)]
    fallback: ViewFn,
    #[prop(optional, into)] on_timeout: Option<Callback<()>>,
) -> impl IntoView {
    let gate = TimeoutGate::new(mode);
    let on_timeout = on_timeout.map(|on_timeout| {
        Box::new(move || on_timeout.run(())) as Box<dyn FnOnce() + Send>
    });

    match gate.arm(&Timers::current(), Duration::from_millis(ms), on_timeout) {
        Ok(handle) => {
            let gate = gate.clone();
            on_cleanup(move || {
                gate.disarm();
                drop(handle);
            });
        }
        Err(error) => {
            tracing::warn!(%error, ms, "timer unavailable, timeout never passes");
        }
    }

    move || match (gate.is_ready(), gate.mode()) {
        (true, _) => children().into_any(),
        (false, TimeoutMode::After) => fallback.run(),
        (false, TimeoutMode::Before) => ().into_any(),
    }
}

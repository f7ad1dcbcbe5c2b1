use std::sync::Arc;

use leptos::{
    children::{ChildrenFn, ViewFn},
    prelude::*,
};

use crate::visibility::{
    next_region_id, Notify, ObserveOptions, VisibilityGate, VisibilityService, VisibilityState,
};

/// Renders `children` once the region it occupies becomes visible.
///
/// Observation goes through [`VisibilityService::current`], which in the
/// browser defaults to an `IntersectionObserver`.  Without a service, or
/// when it cannot observe, `children` render immediately.
/// Otherwise `fallback` renders inside a region anchor until the first
/// intersecting notification.  With `once` (the default) the children then
/// stay rendered and observation stops; without it the content follows
/// every change in and out of view.
#[component]
pub fn Visible(
    children: ChildrenFn,
    #[prop(optional, into)] fallback: ViewFn,
    /// Margin around the viewport, in CSS margin syntax.
    #[prop(optional, into)]
    root_margin: Option<String>,
    /// Fraction of the region that must be in view.
    #[prop(optional)]
    threshold: Option<f64>,
    #[prop(default = true)] once: bool,
    /// Called with every change in visibility.
    #[prop(optional, into)]
    on_visibility_change: Option<Callback<bool>>,
) -> impl IntoView {
    let Some(service) = VisibilityService::supported() else {
        return children().into_any();
    };

    let defaults = ObserveOptions::default();
    let options = ObserveOptions {
        root_margin: root_margin.unwrap_or(defaults.root_margin),
        threshold: threshold.unwrap_or(defaults.threshold),
    };
    let region = next_region_id();
    let state = ArcRwSignal::new(VisibilityState::default());
    let gate = VisibilityGate::new();

    let notify: Notify = {
        let state = state.clone();
        let gate = gate.clone();
        Arc::new(move |intersecting: bool| {
            if gate.is_stopped() {
                return;
            }
            let mut stop = false;
            state.update(|state| stop = state.notify(intersecting, once));
            if let Some(on_visibility_change) = on_visibility_change {
                on_visibility_change.run(intersecting);
            }
            if stop {
                gate.stop();
            }
        })
    };

    match service.observe(&region, &options, notify) {
        Ok(observation) => gate.attach(observation),
        Err(error) => {
            tracing::warn!(%error, "rendering content without visibility gating");
            return children().into_any();
        }
    }
    on_cleanup(move || gate.stop());

    let content = move || {
        if state.get().renders_children(once) {
            children().into_any()
        } else {
            fallback.run()
        }
    };
    view! { <div data-visible-region=region>{content}</div> }.into_any()
}

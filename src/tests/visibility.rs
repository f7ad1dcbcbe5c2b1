use std::sync::{Arc, Mutex};

use super::set_reactive_owner;
use crate::{
    visibility::{
        ManualObserver, NullObserver, ObserveOptions, VisibilityGate, VisibilityObserver,
        VisibilityService, VisibilityState,
    },
    Error,
};

#[test]
fn once_freezes_after_first_intersection() {
    let mut state = VisibilityState::default();
    assert!(!state.renders_children(true));

    assert!(!state.notify(false, true));
    assert!(!state.renders_children(true));

    assert!(state.notify(true, true));
    assert!(state.renders_children(true));

    state.notify(false, true);
    assert!(state.renders_children(true));
    assert!(state.has_been_visible);
}

#[test]
fn toggles_without_once() {
    let mut state = VisibilityState::default();
    assert!(!state.notify(true, false));
    assert!(state.renders_children(false));
    assert!(!state.notify(false, false));
    assert!(!state.renders_children(false));
    assert!(state.has_been_visible);
}

#[test]
fn manual_observer_delivers_and_detaches() {
    let observer = ManualObserver::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let observation = {
        let seen = seen.clone();
        observer.observe(
            "region",
            &ObserveOptions::default(),
            Arc::new(move |intersecting: bool| seen.lock().expect("lock").push(intersecting)),
        )
    }
    .expect("manual observation never fails");

    assert_eq!(observer.observed_regions(), ["region"]);
    assert_eq!(observer.options("region"), Some(ObserveOptions::default()));
    assert!(observer.notify("region", true));
    observer.notify_all(false);
    assert_eq!(*seen.lock().expect("lock"), [true, false]);

    drop(observation);
    assert!(observer.observed_regions().is_empty());
    assert!(!observer.notify("region", true));
    assert_eq!(seen.lock().expect("lock").len(), 2);
}

#[test]
fn gate_stops_observing_once_visible() {
    let observer = ManualObserver::new();
    let gate = VisibilityGate::new();
    let state = Arc::new(Mutex::new(VisibilityState::default()));

    let notify = {
        let gate = gate.clone();
        let state = state.clone();
        Arc::new(move |intersecting: bool| {
            let stop = state.lock().expect("lock").notify(intersecting, true);
            if stop {
                gate.stop();
            }
        })
    };
    let observation = observer
        .observe("region", &ObserveOptions::default(), notify)
        .expect("manual observation never fails");
    gate.attach(observation);

    observer.notify("region", false);
    assert_eq!(observer.observed_regions(), ["region"]);
    observer.notify("region", true);
    assert!(gate.is_stopped());
    assert!(observer.observed_regions().is_empty());
    // nothing left to deliver to
    assert!(!observer.notify("region", false));
    assert!(state.lock().expect("lock").renders_children(true));
}

#[test]
fn gate_stopped_before_attach_disconnects() {
    let observer = ManualObserver::new();
    let gate = VisibilityGate::new();
    gate.stop();
    let observation = observer
        .observe("region", &ObserveOptions::default(), Arc::new(|_: bool| ()))
        .expect("manual observation never fails");
    gate.attach(observation);
    assert!(observer.observed_regions().is_empty());
}

#[test]
fn null_observer_is_unsupported() {
    let observer = NullObserver;
    assert!(!observer.is_supported());
    let result = observer.observe("region", &ObserveOptions::default(), Arc::new(|_: bool| ()));
    assert_eq!(
        result.map(|_| ()).unwrap_err(),
        Error::ObserverUnavailable("region".to_string()),
    );
}

#[cfg(not(feature = "browser"))]
#[test]
fn service_lookup() {
    let _owner = set_reactive_owner();
    assert!(VisibilityService::current().is_none());
    assert!(VisibilityService::supported().is_none());

    VisibilityService::provide(NullObserver);
    assert!(VisibilityService::current().is_some());
    assert!(VisibilityService::supported().is_none());

    VisibilityService::provide(ManualObserver::new());
    assert!(VisibilityService::supported().is_some());
}

#[test]
fn default_options() {
    let options = ObserveOptions::default();
    assert_eq!(options.root_margin, "0px");
    assert_eq!(options.threshold, 0.0);
}

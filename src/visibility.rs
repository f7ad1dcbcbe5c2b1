//! Visibility observation for the `Visible` component.
//!
//! Whether a region of the page intersects the viewport is only knowable on
//! a client with an intersection observer.  The component does not talk to
//! one directly; it asks the [`VisibilityService`] provided through context,
//! and renders its children straight away when there is no service or the
//! service reports that observation is unsupported.  In the browser the
//! default service is a `BrowserObserver` over `IntersectionObserver`.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use leptos::prelude::{provide_context, use_context};

use crate::Error;

/// Identifies an observed region of the page.
pub type RegionId = String;

static NEXT_REGION: AtomicU64 = AtomicU64::new(0);

/// Allocates a region id unique within this process.
pub fn next_region_id() -> RegionId {
    format!("visible-{}", NEXT_REGION.fetch_add(1, Ordering::Relaxed))
}

/// Callback receiving intersection changes of an observed region.
pub type Notify = Arc<dyn Fn(bool) + Send + Sync>;

/// Options passed through to the underlying observer.
#[derive(Clone, Debug, PartialEq)]
pub struct ObserveOptions {
    /// Margin around the viewport, in CSS margin syntax.
    pub root_margin: String,
    /// Fraction of the region that must be visible to count as
    /// intersecting.
    pub threshold: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin: "0px".to_string(),
            threshold: 0.0,
        }
    }
}

/// A source of intersection notifications.
pub trait VisibilityObserver: Send + Sync {
    /// Whether observation works at all in this environment.
    fn is_supported(&self) -> bool {
        true
    }

    /// Starts observing `region`, calling `notify` on every change.
    ///
    /// Observation lasts until the returned [`Observation`] is dropped.
    fn observe(
        &self,
        region: &str,
        options: &ObserveOptions,
        notify: Notify,
    ) -> Result<Observation, Error>;
}

/// A running observation; dropping it stops observing.
pub struct Observation {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Observation {
    pub fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// An observation with nothing to detach.
    pub fn detached() -> Self {
        Self { detach: None }
    }

    /// Stops observing now.
    pub fn disconnect(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// The observer made available to `Visible` through context.
#[derive(Clone)]
pub struct VisibilityService(Arc<dyn VisibilityObserver>);

impl VisibilityService {
    pub fn new(observer: impl VisibilityObserver + 'static) -> Self {
        Self(Arc::new(observer))
    }

    /// Provides the observer to every `Visible` below the current owner.
    pub fn provide(observer: impl VisibilityObserver + 'static) -> Self {
        let service = Self::new(observer);
        provide_context(service.clone());
        service
    }

    /// The service in context, else the default for the enabled features,
    /// if there is one.
    pub fn current() -> Option<Self> {
        use_context::<Self>().or_else(Self::platform_default)
    }

    #[allow(unreachable_code)]
    fn platform_default() -> Option<Self> {
        #[cfg(feature = "browser")]
        return Some(Self::new(BrowserObserver));
        None
    }

    /// The service in context, if any and if it can observe.
    pub fn supported() -> Option<Self> {
        let service = Self::current()?;
        if service.0.is_supported() {
            Some(service)
        } else {
            tracing::warn!("visibility observation unsupported, content renders immediately");
            None
        }
    }

    pub fn observe(
        &self,
        region: &str,
        options: &ObserveOptions,
        notify: Notify,
    ) -> Result<Observation, Error> {
        self.0.observe(region, options, notify)
    }
}

impl fmt::Debug for VisibilityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityService")
            .field("supported", &self.0.is_supported())
            .finish()
    }
}

/// An observer for environments without intersection observation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl VisibilityObserver for NullObserver {
    fn is_supported(&self) -> bool {
        false
    }

    fn observe(&self, region: &str, _: &ObserveOptions, _: Notify) -> Result<Observation, Error> {
        Err(Error::ObserverUnavailable(region.to_string()))
    }
}

#[cfg(feature = "browser")]
mod browser_observer {
    use std::{cell::RefCell, collections::HashMap};

    use leptos::prelude::request_animation_frame;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

    use super::*;

    type EntriesCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

    enum Slot {
        /// Observation requested, region not mounted yet.
        Waiting,
        Connected(IntersectionObserver, EntriesCallback),
    }

    thread_local! {
        static SLOTS: RefCell<HashMap<RegionId, Slot>> = RefCell::new(HashMap::new());
    }

    /// An observer backed by the browser's `IntersectionObserver`.
    ///
    /// The observed element is the region anchor rendered by `Visible`,
    /// looked up by its `data-visible-region` attribute on the next
    /// animation frame, once the region has been mounted.  If the anchor
    /// cannot be observed the region is reported as visible.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserObserver;

    impl VisibilityObserver for BrowserObserver {
        fn is_supported(&self) -> bool {
            web_sys::window().is_some_and(|window| {
                js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
                    .unwrap_or(false)
            })
        }

        fn observe(
            &self,
            region: &str,
            options: &ObserveOptions,
            notify: Notify,
        ) -> Result<Observation, Error> {
            SLOTS.with_borrow_mut(|slots| slots.insert(region.to_string(), Slot::Waiting));
            let pending = (region.to_string(), options.clone());
            request_animation_frame(move || {
                let (region, options) = pending;
                if let Err(error) = connect(&region, &options, notify.clone()) {
                    tracing::warn!(%error, "rendering content without visibility gating");
                    notify(true);
                }
            });
            let region = region.to_string();
            Ok(Observation::new(move || disconnect(&region)))
        }
    }

    fn connect(region: &str, options: &ObserveOptions, notify: Notify) -> Result<(), Error> {
        let waiting = SLOTS.with_borrow(|slots| matches!(slots.get(region), Some(Slot::Waiting)));
        if !waiting {
            return Ok(());
        }
        let unavailable = || Error::ObserverUnavailable(region.to_string());
        let selector = format!("[data-visible-region=\"{region}\"]");
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.query_selector(&selector).ok().flatten())
            .ok_or_else(unavailable)?;

        let callback = EntriesCallback::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                tracing::trace!("delivering visibility change");
                notify(entry.unchecked_into::<IntersectionObserverEntry>().is_intersecting());
            }
        });
        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|_| unavailable())?;
        observer.observe(&element);
        SLOTS.with_borrow_mut(|slots| {
            slots.insert(region.to_string(), Slot::Connected(observer, callback))
        });
        Ok(())
    }

    fn disconnect(region: &str) {
        let slot = SLOTS.with_borrow_mut(|slots| slots.remove(region));
        if let Some(Slot::Connected(observer, callback)) = slot {
            observer.disconnect();
            // may be called from inside the callback itself
            request_animation_frame(move || drop(callback));
        }
    }
}

#[cfg(feature = "browser")]
pub use browser_observer::BrowserObserver;

#[derive(Default)]
struct Registry {
    regions: HashMap<RegionId, (ObserveOptions, Notify)>,
}

/// An observer driven by hand.
///
/// Notifications are delivered by calling [`notify`](Self::notify) and
/// friends, which makes it suitable for tests and for hosts that compute
/// visibility themselves.
#[derive(Clone, Default)]
pub struct ManualObserver {
    registry: Arc<Mutex<Registry>>,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a change for `region`, returning whether it is observed.
    pub fn notify(&self, region: &str, intersecting: bool) -> bool {
        // release the lock before calling out, the callback may detach
        let notify = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .get(region)
            .map(|(_, notify)| notify.clone());
        match notify {
            Some(notify) => {
                tracing::trace!(region, intersecting, "delivering visibility change");
                notify(intersecting);
                true
            }
            None => false,
        }
    }

    /// Delivers the same change to every observed region.
    pub fn notify_all(&self, intersecting: bool) {
        for region in self.observed_regions() {
            self.notify(&region, intersecting);
        }
    }

    /// The regions currently observed, sorted.
    pub fn observed_regions(&self) -> Vec<RegionId> {
        let mut regions = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        regions.sort();
        regions
    }

    /// The options a region is observed with.
    pub fn options(&self, region: &str) -> Option<ObserveOptions> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .get(region)
            .map(|(options, _)| options.clone())
    }
}

impl VisibilityObserver for ManualObserver {
    fn observe(
        &self,
        region: &str,
        options: &ObserveOptions,
        notify: Notify,
    ) -> Result<Observation, Error> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .insert(region.to_string(), (options.clone(), notify));
        let registry = self.registry.clone();
        let region = region.to_string();
        Ok(Observation::new(move || {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .regions
                .remove(&region);
        }))
    }
}

/// What a `Visible` has seen so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    /// Whether the region currently intersects.
    pub intersecting: bool,
    /// Whether the region has ever intersected.
    pub has_been_visible: bool,
}

impl VisibilityState {
    /// Applies a notification.  Returns whether observation should stop,
    /// which is the case once a `once` region has been seen.
    pub fn notify(&mut self, intersecting: bool, once: bool) -> bool {
        self.intersecting = intersecting;
        self.has_been_visible |= intersecting;
        once && self.has_been_visible
    }

    /// Whether the children are shown rather than the fallback.
    pub fn renders_children(&self, once: bool) -> bool {
        if once {
            self.has_been_visible
        } else {
            self.intersecting
        }
    }
}

/// Holds the observation of one region until it is stopped.
///
/// Stopping may be requested from inside a notification delivered while
/// `observe` is still running, before there is an observation to drop; the
/// request is remembered and honoured as soon as the observation arrives.
#[derive(Clone, Default)]
pub struct VisibilityGate {
    observation: Arc<Mutex<Option<Observation>>>,
    stopped: Arc<AtomicBool>,
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `observation` alive until [`stop`](Self::stop) is called.
    pub fn attach(&self, observation: Observation) {
        let mut slot = self
            .observation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.stopped.load(Ordering::Acquire) {
            drop(slot);
            observation.disconnect();
            return;
        }
        let previous = slot.replace(observation);
        drop(slot);
        drop(previous);
    }

    /// Stops observing.  Idempotent.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        let observation = self
            .observation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(observation) = observation {
            tracing::trace!("disconnecting visibility observation");
            observation.disconnect();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

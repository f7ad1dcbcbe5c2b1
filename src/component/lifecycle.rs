use std::{fmt, sync::Arc};

use leptos::{
    children::{ChildrenFn, ViewFn},
    prelude::*,
};

/// Renders `fallback` on the server and until the client has mounted, then
/// `children`.
///
/// Content that can only be produced in the browser goes in here, so the
/// markup the server sends always matches what hydration expects.
#[component]
pub fn ClientOnly(children: ChildrenFn, #[prop(optional, into)] fallback: ViewFn) -> impl IntoView {
    let mounted = RwSignal::new(false);
    // effects never run on the server
    Effect::new(move |_| mounted.set(true));

    move || {
        if mounted.get() {
            children().into_any()
        } else {
            fallback.run()
        }
    }
}

/// Content that may fail to render.
pub struct Fallible<E>(Arc<dyn Fn() -> Result<AnyView, E> + Send + Sync>);

impl<E> Clone for Fallible<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E, F, V> From<F> for Fallible<E>
where
    F: Fn() -> Result<V, E> + Send + Sync + 'static,
    V: IntoView + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move || f().map(IntoAny::into_any)))
    }
}

/// Renders the error trapped by an [`ErrorBoundary`].
pub struct Recover<E>(Arc<dyn Fn(E, ResetHandle) -> AnyView + Send + Sync>);

impl<E> Clone for Recover<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E, F, V> From<F> for Recover<E>
where
    F: Fn(E, ResetHandle) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |error, reset| f(error, reset).into_any()))
    }
}

/// Retries the content of an [`ErrorBoundary`].
#[derive(Clone)]
pub struct ResetHandle(ArcTrigger);

impl ResetHandle {
    /// Renders the content again, clearing the trapped error if it no
    /// longer fails.
    pub fn reset(&self) {
        tracing::debug!("resetting error boundary");
        self.0.notify();
    }
}

impl fmt::Debug for ResetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetHandle")
    }
}

/// Whatever reactive values an [`ErrorBoundary`] retries on.
pub struct ResetKey(Arc<dyn Fn() + Send + Sync>);

impl<F, K> From<F> for ResetKey
where
    F: Fn() -> K + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move || {
            f();
        }))
    }
}

/// Renders `children`, or `fallback` with the error while they fail.
///
/// The content is retried whenever `fallback` calls
/// [`ResetHandle::reset`] and whenever anything read by `reset_key`
/// changes.
#[component]
pub fn ErrorBoundary<E>(
    #[prop(into)] children: Fallible<E>,
    #[prop(into)] fallback: Recover<E>,
    #[prop(optional, into)] reset_key: Option<ResetKey>,
) -> impl IntoView
where
    E: Send + Sync + 'static,
{
    recovering(children, fallback, reset_key)
}

pub(crate) fn recovering<E>(
    children: Fallible<E>,
    fallback: Recover<E>,
    reset_key: Option<ResetKey>,
) -> impl Fn() -> AnyView + Send + Sync + 'static
where
    E: Send + Sync + 'static,
{
    let retry = ArcTrigger::new();
    move || {
        retry.track();
        if let Some(reset_key) = &reset_key {
            (reset_key.0)();
        }
        match (children.0)() {
            Ok(view) => view,
            Err(error) => (fallback.0)(error, ResetHandle(retry.clone())),
        }
    }
}

use leptos::{children::ViewFn, prelude::*};

use crate::{
    render::Renderable,
    resolve::{AsyncState, Awaitable, Resolution},
};

/// Renders the outcome of `promise`.
///
/// A ready value renders `children` right away.  A pending one renders
/// `loading` until it settles, then `children` with the value or `error`
/// with the rejection.  Only the latest `promise` is ever rendered: a value
/// that settles after it has been replaced is dropped.
#[component]
pub fn Await<T, E>(
    /// The value to wait for.
    #[prop(into)]
    promise: Signal<Awaitable<T, E>>,
    /// Rendered while the value is pending.
    #[prop(optional, into)]
    loading: ViewFn,
    /// Rendered with the rejection, if the value is rejected.
    #[prop(optional, into)]
    error: Option<Renderable<E>>,
    /// Rendered with the value once fulfilled.
    children: Renderable<T>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    let resolution = Resolution::<T, E>::new();

    let supplied = ArcMemo::new({
        let resolution = resolution.clone();
        move |_| {
            if let Some(task) = resolution.supply(promise.get()) {
                leptos::task::spawn(task);
            }
            resolution.generation()
        }
    });

    on_cleanup({
        let resolution = resolution.clone();
        move || resolution.cancel()
    });

    move || {
        supplied.track();
        match resolution.state() {
            AsyncState::Pending => loading.run(),
            AsyncState::Fulfilled(value) => children.resolve(value),
            AsyncState::Rejected(rejection) => match &error {
                Some(error) => error.resolve(rejection),
                None => ().into_any(),
            },
        }
    }
}

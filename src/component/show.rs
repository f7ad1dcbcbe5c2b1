use std::sync::Arc;

use leptos::{children::ViewFn, prelude::*};

use crate::{render::Renderable, truthy::Truthy};

/// Renders `children` while `when` is truthy and `fallback` otherwise.
///
/// Truthiness is emptiness-aware: zero, `NaN`, empty strings and empty
/// collections are falsy, as is `None`.  Computed children receive the
/// value narrowed out of `when`.  Fixed children are only rebuilt when the
/// condition flips, not on every change of a condition that stays truthy.
#[component]
pub fn Show<F, W>(
    /// Produces the condition.
    when: F,
    /// Rendered while the condition holds.
    children: Renderable<W::Value>,
    /// Rendered while it does not.
    #[prop(optional, into)]
    fallback: ViewFn,
) -> impl IntoView
where
    F: Fn() -> W + Send + Sync + 'static,
    W: Truthy + 'static,
    W::Value: 'static,
{
    showing(when, children, fallback)
}

pub(crate) fn showing<F, W>(
    when: F,
    children: Renderable<W::Value>,
    fallback: ViewFn,
) -> impl Fn() -> AnyView + Send + Sync + 'static
where
    F: Fn() -> W + Send + Sync + 'static,
    W: Truthy + 'static,
    W::Value: 'static,
{
    let when = Arc::new(when);
    let shown = ArcMemo::new({
        let when = when.clone();
        move |_| when().is_truthy()
    });

    move || {
        if !shown.get() {
            return fallback.run();
        }
        match &children {
            Renderable::Fixed(content) => content.run(),
            Renderable::Computed(content) => match when().truthy() {
                Some(value) => content(value),
                None => fallback.run(),
            },
        }
    }
}

/// Renders `children` for the first value of `value` only.
///
/// The value is read once, without tracking, so later changes to it never
/// re-render the content.
#[component]
pub fn Once<F, T>(value: F, children: Renderable<T>) -> impl IntoView
where
    F: Fn() -> T + Send + Sync + 'static,
    T: 'static,
{
    children.resolve(untrack(value))
}

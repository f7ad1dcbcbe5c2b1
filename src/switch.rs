//! Branch selection for the `Switch` component.
//!
//! A switch is a list of [`Case`]s walked in declaration order.  `Match`
//! cases are tested with the emptiness-aware [`Truthy`] predicate and the
//! first one that passes is rendered; `Default` cases only ever replace the
//! content used when nothing matches, the last one declared winning.

use std::sync::Arc;

use leptos::{children::ViewFn, prelude::AnyView};

use crate::{render::Renderable, truthy::Truthy};

/// One declared branch of a switch.
pub enum Case<V = AnyView> {
    /// Renders when its condition is truthy, producing `None` otherwise.
    Match(Arc<dyn Fn() -> Option<V> + Send + Sync>),
    /// Content for when no `Match` passes.
    Default(Arc<dyn Fn() -> V + Send + Sync>),
}

impl<V> Clone for Case<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Match(f) => Self::Match(f.clone()),
            Self::Default(f) => Self::Default(f.clone()),
        }
    }
}

impl<V: 'static> Case<V> {
    /// A `Match` case rendering `render` with the narrowed condition.
    pub fn new_match<W>(
        when: impl Fn() -> W + Send + Sync + 'static,
        render: impl Fn(W::Value) -> V + Send + Sync + 'static,
    ) -> Self
    where
        W: Truthy + 'static,
    {
        Self::Match(Arc::new(move || when().truthy().map(&render)))
    }

    /// A `Default` case.
    pub fn new_default(render: impl Fn() -> V + Send + Sync + 'static) -> Self {
        Self::Default(Arc::new(render))
    }
}

impl Case {
    /// A `Match` case rendering view content.
    pub fn when<W>(when: impl Fn() -> W + Send + Sync + 'static, children: Renderable<W::Value>) -> Self
    where
        W: Truthy + 'static,
        W::Value: 'static,
    {
        Self::new_match(when, move |value| children.resolve(value))
    }

    /// A `Default` case rendering view content.
    pub fn otherwise(children: impl Into<ViewFn>) -> Self {
        let children = children.into();
        Self::new_default(move || children.run())
    }
}

/// Walks the cases and renders the selected branch.
///
/// `fallback` supplies the content used when nothing matches and no
/// `Default` case was declared.
pub fn select<V>(cases: &[Case<V>], fallback: impl FnOnce() -> V) -> V {
    let mut default = None;
    for case in cases {
        match case {
            Case::Default(render) => default = Some(render),
            Case::Match(render) => {
                if let Some(view) = render() {
                    return view;
                }
            }
        }
    }
    match default {
        Some(render) => render(),
        None => fallback(),
    }
}

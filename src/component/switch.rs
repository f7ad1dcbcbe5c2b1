use leptos::{children::ViewFn, prelude::*};

use crate::switch::{select, Case};

/// Renders the first [`Case::Match`] whose condition is truthy.
///
/// When nothing matches, the last [`Case::Default`] renders, or `fallback`
/// if there is none.  Cases after the one that matched are never evaluated.
#[component]
pub fn Switch(
    /// The cases, in declaration order.
    cases: Vec<Case>,
    #[prop(optional, into)] fallback: ViewFn,
) -> impl IntoView {
    move || select(&cases, || fallback.run())
}

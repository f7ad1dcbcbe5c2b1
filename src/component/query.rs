use std::sync::Arc;

use leptos::{children::ViewFn, prelude::*};

use crate::{
    query::{branch, Branch, QueryResult},
    render::Renderable,
    truthy::Emptiness,
};

/// Decides whether the data of a query counts as empty.
///
/// The default only treats absent data as empty.  Use
/// [`IsEmptyFn::emptiness`] to also treat empty collections as empty, or
/// convert any `Fn(Option<&T>) -> bool`.
pub struct IsEmptyFn<T>(Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>);

impl<T> Clone for IsEmptyFn<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T, F> From<F> for IsEmptyFn<T>
where
    F: Fn(Option<&T>) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<T> IsEmptyFn<T> {
    /// Absent data, empty sequences and empty keyed collections are empty.
    pub fn emptiness() -> Self
    where
        T: Emptiness,
    {
        Self(Arc::new(|data: Option<&T>| data.is_empty_value()))
    }
}

impl<T> Default for IsEmptyFn<T> {
    fn default() -> Self {
        Self(Arc::new(|data: Option<&T>| data.is_none()))
    }
}

/// Renders the branch matching the state of `query`.
///
/// In order: nothing while `when` is false or there is no query, `loading`
/// while pending, `error` when the query failed with no data to show,
/// `empty` when the data is empty and `children` with the data otherwise.
/// Emptiness is the `is_empty` flag of the query when set, else
/// `is_empty_fn` applied to the data, which by default only treats absent
/// data as empty.
#[component]
pub fn QueryBoundary<T>(
    /// The query to render.
    #[prop(into)]
    query: Signal<Option<QueryResult<T>>>,
    /// Disables the boundary while false.
    #[prop(optional, into)]
    when: Option<Signal<bool>>,
    #[prop(optional, into)] loading: ViewFn,
    #[prop(optional, into)] error: ViewFn,
    #[prop(optional, into)] empty: ViewFn,
    /// Rendered with the data.
    children: Renderable<T>,
    #[prop(optional, into)] is_empty_fn: IsEmptyFn<T>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    move || {
        let enabled = when.map_or(true, |when| when.get());
        let query = query.get();
        match branch(query.as_ref(), enabled, |data| (is_empty_fn.0)(data)) {
            Branch::Nothing => ().into_any(),
            Branch::Loading => loading.run(),
            Branch::Error => error.run(),
            Branch::Empty => empty.run(),
            Branch::Content => children.resolve_optional(query.and_then(|query| query.data)),
        }
    }
}

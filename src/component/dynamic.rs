use leptos::{children::ViewFn, prelude::*};

use crate::render::Shape;

/// Renders whichever shape `component` selects, passing it `props`.
///
/// `fallback` renders while no shape is selected.
#[component]
pub fn Dynamic<P>(
    /// The selected shape, if any.
    #[prop(into)]
    component: Signal<Option<Shape<P>>>,
    /// Handed to the selected shape on every render.
    props: P,
    #[prop(optional, into)] fallback: ViewFn,
) -> impl IntoView
where
    P: Clone + Send + Sync + 'static,
{
    instantiating(component, props, fallback)
}

pub(crate) fn instantiating<P>(
    component: Signal<Option<Shape<P>>>,
    props: P,
    fallback: ViewFn,
) -> impl Fn() -> AnyView + Send + Sync + 'static
where
    P: Clone + Send + Sync + 'static,
{
    move || match component.get() {
        Some(shape) => shape.instantiate(props.clone()),
        None => fallback.run(),
    }
}

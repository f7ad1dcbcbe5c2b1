//! Render-prop types shared by the components.
//!
//! Many of the components accept content either as a fixed view or as a
//! function of some value (the narrowed condition of a `Show`, the
//! resolved value of an `Await`, ...).  Rather than branching on what
//! was passed at runtime, that choice is captured by [`Renderable`].

use std::sync::Arc;

use leptos::{
    children::{ChildrenOptContainer, ToChildren, ViewFn},
    prelude::{AnyView, IntoAny},
    IntoView,
};

use crate::iterate::{Key, Keyed};

/// Content that is either fixed or computed from a value.
pub enum Renderable<T> {
    /// Content that ignores the value.
    Fixed(ViewFn),
    /// Content rendered from the value.
    Computed(Arc<dyn Fn(T) -> AnyView + Send + Sync>),
}

impl<T> Clone for Renderable<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(view) => Self::Fixed(view.clone()),
            Self::Computed(f) => Self::Computed(f.clone()),
        }
    }
}

impl<T> Renderable<T> {
    /// Fixed content.
    pub fn fixed<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: IntoView + 'static,
    {
        Self::Fixed(ViewFn::from(f))
    }

    /// Content computed from the value.
    pub fn computed<F, V>(f: F) -> Self
    where
        F: Fn(T) -> V + Send + Sync + 'static,
        V: IntoView + 'static,
    {
        Self::Computed(Arc::new(move |value| f(value).into_any()))
    }

    /// Renders the content for the given value.
    pub fn resolve(&self, value: T) -> AnyView {
        match self {
            Self::Fixed(view) => view.run(),
            Self::Computed(f) => f(value),
        }
    }

    /// Renders the content when a value may be missing.
    ///
    /// Fixed content renders regardless; computed content needs a value
    /// and renders nothing without one.
    pub fn resolve_optional(&self, value: Option<T>) -> AnyView {
        match (self, value) {
            (Self::Fixed(view), _) => view.run(),
            (Self::Computed(f), Some(value)) => f(value),
            (Self::Computed(_), None) => ().into_any(),
        }
    }
}

impl<T> Default for Renderable<T> {
    fn default() -> Self {
        Self::Fixed(ViewFn::default())
    }
}

impl<T> From<ViewFn> for Renderable<T> {
    fn from(view: ViewFn) -> Self {
        Self::Fixed(view)
    }
}

// Children written inside a component's tags are always fixed content.
impl<T, F, C> ToChildren<F> for Renderable<T>
where
    F: Fn() -> C + Send + Sync + 'static,
    C: IntoView + 'static,
{
    fn to_children(f: F) -> Self {
        Self::fixed(f)
    }
}

impl<T, C> ToChildren<ChildrenOptContainer<C>> for Renderable<T>
where
    C: IntoView + Clone + Sync + 'static,
{
    fn to_children(container: ChildrenOptContainer<C>) -> Self {
        let content = container.0;
        Self::fixed(move || content.clone())
    }
}

/// A component shape, selected at runtime by [`Dynamic`](crate::component::Dynamic).
///
/// Any `#[component]` function is a shape over its props type.
pub struct Shape<P>(Arc<dyn Fn(P) -> AnyView + Send + Sync>);

impl<P> Clone for Shape<P> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<P> Shape<P> {
    /// Instantiates the shape with the given props.
    pub fn instantiate(&self, props: P) -> AnyView {
        (self.0)(props)
    }
}

impl<P, F, V> From<F> for Shape<P>
where
    F: Fn(P) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |props| f(props).into_any()))
    }
}

/// A container template that list content is placed into.
///
/// Each call builds a fresh container around the given content, so the
/// template's own attributes are kept on every render.
#[derive(Clone)]
pub struct Wrapper(Arc<dyn Fn(AnyView) -> AnyView + Send + Sync>);

impl Wrapper {
    /// Places the content into a new container.
    pub fn wrap(&self, content: AnyView) -> AnyView {
        (self.0)(content)
    }
}

impl<F, V> From<F> for Wrapper
where
    F: Fn(AnyView) -> V + Send + Sync + 'static,
    V: IntoView + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |content| f(content).into_any()))
    }
}

/// A rendered list item, possibly carrying its own key.
pub struct Node {
    pub key: Option<Key>,
    pub view: AnyView,
}

impl Node {
    pub fn new(view: impl IntoView + 'static) -> Self {
        Self {
            key: None,
            view: view.into_any(),
        }
    }

    pub fn keyed(key: impl ToString, view: impl IntoView + 'static) -> Self {
        Self {
            key: Some(key.to_string()),
            view: view.into_any(),
        }
    }
}

impl<V> From<V> for Node
where
    V: IntoView + 'static,
{
    fn from(view: V) -> Self {
        Self::new(view)
    }
}

impl<V> From<Keyed<V>> for Node
where
    V: IntoView + 'static,
{
    fn from(keyed: Keyed<V>) -> Self {
        Self {
            key: Some(keyed.key),
            view: keyed.view.into_any(),
        }
    }
}

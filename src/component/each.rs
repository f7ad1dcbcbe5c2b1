use std::sync::Arc;

use leptos::{
    children::ViewFn,
    prelude::*,
    tachys::view::keyed::keyed,
};

use crate::{
    iterate::{emit, repeat_indices, Entry, KeyFn},
    render::{Node, Wrapper},
    split::{split, Separator},
};

/// Renders one item of a list from the item, its index in the original
/// sequence and the whole original sequence.
pub struct ItemFn<T>(Arc<dyn Fn(T, usize, Arc<[T]>) -> Node + Send + Sync>);

impl<T> Clone for ItemFn<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T, F, N> From<F> for ItemFn<T>
where
    F: Fn(T, usize, Arc<[T]>) -> N + Send + Sync + 'static,
    N: Into<Node>,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |item, index, items| f(item, index, items).into()))
    }
}

/// Renders one repetition from its index, the repetition count and the
/// full index sequence.
#[derive(Clone)]
pub struct RepeatFn(Arc<dyn Fn(usize, usize, Arc<[usize]>) -> Node + Send + Sync>);

impl<F, N> From<F> for RepeatFn
where
    F: Fn(usize, usize, Arc<[usize]>) -> N + Send + Sync + 'static,
    N: Into<Node>,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |index, count, indices| f(index, count, indices).into()))
    }
}

/// The rendering options shared by `For`, `Repeat` and `Split`.
struct ListOptions<T> {
    key: Option<KeyFn<T>>,
    fallback: ViewFn,
    wrapper: Option<Wrapper>,
    reverse: Signal<bool>,
}

fn render_list<T>(
    each: impl Fn() -> Option<Arc<[T]>> + Send + 'static,
    render: impl Fn(&T, usize, &Arc<[T]>) -> Node + Send + 'static,
    options: ListOptions<T>,
) -> impl IntoView
where
    T: Send + Sync + 'static,
{
    move || {
        let items = match each() {
            Some(items) if !items.is_empty() => items,
            _ => return options.fallback.run(),
        };
        let entries = emit(
            &items,
            options.reverse.get(),
            options.key.as_ref(),
            |item, index| {
                let Node { key, view } = render(item, index, &items);
                (key, view)
            },
        );
        let list = keyed(
            entries,
            |entry: &Entry<AnyView>| entry.key.clone(),
            |_, entry: Entry<AnyView>| (|_: usize| {}, entry.view),
        )
        .into_any();
        match &options.wrapper {
            Some(wrapper) => wrapper.wrap(list),
            None => list,
        }
    }
}

/// Renders `children` for every item of `each`.
///
/// An absent or empty `each` renders `fallback` without calling `children`.
/// Items are keyed by `key` if given, else by the key of the rendered
/// [`Node`], else by their index.  Keys must be unique within a list:
/// duplicates are logged but not resolved, and items sharing a key may be
/// dropped or misplaced when the list is re-rendered.  `reverse` flips the
/// order the items are emitted in, but `children` always receives the
/// index an item has in `each`.
#[component]
pub fn For<T>(
    /// The items to render.
    #[prop(into)]
    each: Signal<Option<Vec<T>>>,
    /// Renders one item.
    #[prop(into)]
    children: ItemFn<T>,
    /// Derives the key of an item from the item and its index.
    #[prop(optional, into)]
    key: Option<KeyFn<T>>,
    /// Rendered when there are no items.
    #[prop(optional, into)]
    fallback: ViewFn,
    /// A container placed around the rendered items.
    #[prop(optional, into)]
    wrapper: Option<Wrapper>,
    /// Emits the items last to first.
    #[prop(optional, into)]
    reverse: Signal<bool>,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    render_list(
        move || each.get().map(Arc::from),
        move |item, index, items| (children.0)(item.clone(), index, items.clone()),
        ListOptions {
            key,
            fallback,
            wrapper,
            reverse,
        },
    )
}

/// Renders `children` `times` times, as `For` over the indices
/// `0..times`.  Nothing but `fallback` renders when `times` is not
/// positive.
#[component]
pub fn Repeat(
    #[prop(into)] times: Signal<i32>,
    #[prop(into)] children: RepeatFn,
    #[prop(optional, into)] key: Option<KeyFn<usize>>,
    #[prop(optional, into)] fallback: ViewFn,
    #[prop(optional, into)] wrapper: Option<Wrapper>,
    #[prop(optional, into)] reverse: Signal<bool>,
) -> impl IntoView {
    render_list(
        move || repeat_indices(i64::from(times.get())).map(Arc::from),
        move |index, _, indices| (children.0)(*index, indices.len(), indices.clone()),
        ListOptions {
            key,
            fallback,
            wrapper,
            reverse,
        },
    )
}

/// Splits `string` on `separator` and renders `children` for every part,
/// as `For` would.
///
/// The separator is a literal string, a regular expression (see
/// [`Separator::pattern`]) or a character predicate; every occurrence is
/// split on.
///
/// With `keep_separator` the separators themselves are rendered as parts
/// of their own.
#[component]
pub fn Split(
    #[prop(into)] string: Signal<Option<String>>,
    #[prop(into)] separator: Separator,
    #[prop(optional, into)] keep_separator: Signal<bool>,
    #[prop(into)] children: ItemFn<String>,
    #[prop(optional, into)] key: Option<KeyFn<String>>,
    #[prop(optional, into)] fallback: ViewFn,
    #[prop(optional, into)] wrapper: Option<Wrapper>,
    #[prop(optional, into)] reverse: Signal<bool>,
) -> impl IntoView {
    render_list(
        move || {
            string.with(|string| {
                let parts = split(string.as_deref(), &separator, keep_separator.get());
                Some(Arc::from(parts))
            })
        },
        move |part, index, parts| (children.0)(part.clone(), index, parts.clone()),
        ListOptions {
            key,
            fallback,
            wrapper,
            reverse,
        },
    )
}

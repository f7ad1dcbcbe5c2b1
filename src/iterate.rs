//! Iteration order and key derivation for `For`, `Repeat` and `Split`.
//!
//! The list components share a single contract, implemented here without
//! reference to any view type:
//!
//! - the source sequence is never touched; reversing only changes the order
//!   in which positions are emitted,
//! - the index handed to the render function is always the position in the
//!   original sequence,
//! - every emitted item gets a key, taken from the explicit key function if
//!   one was given, else from the rendered node if it carries one, else the
//!   original index.

use std::{collections::HashSet, sync::Arc};

/// Identity of an emitted item across re-renders.
pub type Key = String;

/// Derives a key from an item and its original index.
pub struct KeyFn<T>(Arc<dyn Fn(&T, usize) -> Key + Send + Sync>);

impl<T> Clone for KeyFn<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> KeyFn<T> {
    /// Derives the key of `item` found at `index`.
    pub fn key(&self, item: &T, index: usize) -> Key {
        (self.0)(item, index)
    }
}

impl<T, F, K> From<F> for KeyFn<T>
where
    F: Fn(&T, usize) -> K + Send + Sync + 'static,
    K: ToString,
{
    fn from(f: F) -> Self {
        Self(Arc::new(move |item, index| f(item, index).to_string()))
    }
}

/// A rendered node carrying its own key.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyed<V> {
    pub key: Key,
    pub view: V,
}

impl<V> Keyed<V> {
    pub fn new(key: impl ToString, view: V) -> Self {
        Self {
            key: key.to_string(),
            view,
        }
    }
}

/// One emitted item.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<V> {
    /// The derived key.
    pub key: Key,
    /// Position of the item in the original sequence.
    pub index: usize,
    /// The rendered node.
    pub view: V,
}

/// The order in which the positions of a sequence of `len` items are
/// emitted.
pub fn emission_order(len: usize, reverse: bool) -> Vec<usize> {
    let mut order = (0..len).collect::<Vec<_>>();
    if reverse {
        order.reverse();
    }
    order
}

/// Picks the key for an item, in priority order.
pub fn derive_key(explicit: Option<Key>, embedded: Option<Key>, index: usize) -> Key {
    explicit
        .or(embedded)
        .unwrap_or_else(|| index.to_string())
}

/// Renders every item of `items` in emission order.
///
/// Every item is rendered, but a key that was already derived for an
/// earlier item is only reported; reconciliation by key assumes keys are
/// unique.
///
/// `render` is called with each item and its original index, returning the
/// rendered node and the key embedded in it, if any.
pub fn emit<T, V>(
    items: &[T],
    reverse: bool,
    key: Option<&KeyFn<T>>,
    mut render: impl FnMut(&T, usize) -> (Option<Key>, V),
) -> Vec<Entry<V>> {
    let mut seen = HashSet::with_capacity(items.len());
    emission_order(items.len(), reverse)
        .into_iter()
        .map(|index| {
            let item = &items[index];
            let (embedded, view) = render(item, index);
            let key = derive_key(key.map(|f| f.key(item, index)), embedded, index);
            if !seen.insert(key.clone()) {
                tracing::warn!(%key, index, "duplicate key in list; keys must be unique");
            }
            Entry { key, index, view }
        })
        .collect()
}

/// The index sequence repeated by `Repeat`, or `None` when there is
/// nothing to repeat.
pub fn repeat_indices(times: i64) -> Option<Vec<usize>> {
    let times = usize::try_from(times).ok().filter(|times| *times > 0)?;
    Some((0..times).collect())
}

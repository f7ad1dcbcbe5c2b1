//! Race-safe resolution of possibly asynchronous values for `Await`.
//!
//! A [`Resolution`] is fed a sequence of inputs.  Each input is tagged with
//! a generation number when it is supplied, and a settlement is only applied
//! when it still belongs to the latest generation, so however inputs overlap
//! the settled state always reflects the input supplied last.

use std::{fmt, future::Future};

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use leptos::prelude::{ArcRwSignal, Get, GetUntracked, Update, WithUntracked};

/// A value that is either available now or still being computed.
pub enum Awaitable<T, E> {
    /// Available immediately.
    Ready(T),
    /// Settles once the future completes.
    Pending(Shared<BoxFuture<'static, Result<T, E>>>),
}

impl<T, E> Awaitable<T, E>
where
    T: Clone,
    E: Clone,
{
    pub fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    pub fn pending(future: impl Future<Output = Result<T, E>> + Send + 'static) -> Self {
        Self::Pending(future.boxed().shared())
    }
}

impl<T: Clone, E> Clone for Awaitable<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(value) => Self::Ready(value.clone()),
            Self::Pending(future) => Self::Pending(future.clone()),
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Awaitable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

// Two `Awaitable`s are only ever equal when they are the same instance, so
// supplying a new future always counts as a new input.
impl<T: PartialEq, E> PartialEq for Awaitable<T, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ready(a), Self::Ready(b)) => a == b,
            (Self::Pending(a), Self::Pending(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<T, E> From<T> for Awaitable<T, E> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}

/// The state of an awaited value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AsyncState<T, E> {
    #[default]
    Pending,
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> From<Result<T, E>> for AsyncState<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Fulfilled(value),
            Err(error) => Self::Rejected(error),
        }
    }
}

#[derive(Clone, Debug)]
struct Tracked<T, E> {
    generation: u64,
    state: AsyncState<T, E>,
}

/// Tracks the state of the most recently supplied input.
pub struct Resolution<T, E>
where
    T: 'static,
    E: 'static,
{
    inner: ArcRwSignal<Tracked<T, E>>,
}

impl<T, E> Clone for Resolution<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for Resolution<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Resolution<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: ArcRwSignal::new(Tracked {
                generation: 0,
                state: AsyncState::Pending,
            }),
        }
    }

    /// Supplies a new input, superseding every earlier one.
    ///
    /// A ready value, or a pending one that has already settled, is applied
    /// immediately.  Otherwise the state goes back to pending and the
    /// returned task must be driven to completion for the value to settle;
    /// dropping the task leaves the state pending.
    pub fn supply(&self, input: Awaitable<T, E>) -> Option<impl Future<Output = ()> + Send + 'static> {
        let (generation, future) = match input {
            Awaitable::Ready(value) => {
                self.advance(AsyncState::Fulfilled(value));
                return None;
            }
            Awaitable::Pending(future) => match future.peek() {
                Some(result) => {
                    self.advance(result.clone().into());
                    return None;
                }
                None => (self.advance(AsyncState::Pending), future),
            },
        };
        let resolution = self.clone();
        Some(async move {
            let result = future.await;
            resolution.settle(generation, result);
        })
    }

    /// Applies the outcome of the input supplied as `generation`.
    ///
    /// Returns whether it was applied; outcomes of superseded inputs are
    /// dropped.
    pub fn settle(&self, generation: u64, result: Result<T, E>) -> bool {
        let mut applied = false;
        self.inner.maybe_update(|tracked| {
            applied = tracked.generation == generation;
            if applied {
                tracked.state = result.into();
            }
            applied
        });
        if !applied {
            tracing::debug!(generation, "dropping outcome of a superseded input");
        }
        applied
    }

    /// Invalidates every input supplied so far without changing the state.
    ///
    /// Used on teardown so tasks still in flight settle into nothing.
    pub fn cancel(&self) {
        self.inner.maybe_update(|tracked| {
            tracked.generation += 1;
            false
        });
    }

    /// The generation of the latest input.
    pub fn generation(&self) -> u64 {
        self.inner.with_untracked(|tracked| tracked.generation)
    }

    /// The current state, tracked by the surrounding reactive scope.
    pub fn state(&self) -> AsyncState<T, E> {
        self.inner.get().state
    }

    /// The current state, without tracking.
    pub fn state_untracked(&self) -> AsyncState<T, E> {
        self.inner.get_untracked().state
    }

    fn advance(&self, state: AsyncState<T, E>) -> u64 {
        let mut generation = 0;
        self.inner.update(|tracked| {
            tracked.generation += 1;
            tracked.state = state;
            generation = tracked.generation;
        });
        generation
    }
}

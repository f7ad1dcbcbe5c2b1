//! Emptiness-aware truthiness and the emptiness predicate.
//!
//! [`Truthy`] is what [`Show`](crate::component::Show) and the
//! [`Switch`](crate::component::Switch) cases test their conditions with.
//! It is stricter than a plain boolean test: besides `false`, zero, `NaN`,
//! empty strings and absent values, it also rejects empty sequences and
//! empty keyed collections.
//!
//! [`Emptiness`] is the looser predicate used by
//! [`QueryBoundary`](crate::component::QueryBoundary) to decide whether
//! fetched data is worth rendering: only absent values, empty sequences and
//! empty keyed collections count as empty.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    rc::Rc,
    sync::Arc,
};

/// A condition value with emptiness-aware truthiness.
///
/// A truthy condition may also be narrowed into the value that gets handed
/// to a render function; for most types that is the value itself, while
/// `Option<T>` narrows to the narrowed value of `T`.
pub trait Truthy {
    /// The narrowed, always present value of a truthy condition.
    type Value;

    /// Whether the condition passes.
    fn is_truthy(&self) -> bool;

    /// Unwraps the value, returning `None` only when it is absent.
    fn into_value(self) -> Option<Self::Value>;

    /// Returns the narrowed value when the condition passes.
    fn truthy(self) -> Option<Self::Value>
    where
        Self: Sized,
    {
        if self.is_truthy() {
            self.into_value()
        } else {
            None
        }
    }
}

impl Truthy for bool {
    type Value = bool;

    fn is_truthy(&self) -> bool {
        *self
    }

    fn into_value(self) -> Option<bool> {
        Some(self)
    }
}

impl Truthy for () {
    type Value = ();

    fn is_truthy(&self) -> bool {
        false
    }

    fn into_value(self) -> Option<()> {
        None
    }
}

impl Truthy for char {
    type Value = char;

    fn is_truthy(&self) -> bool {
        true
    }

    fn into_value(self) -> Option<char> {
        Some(self)
    }
}

macro_rules! truthy_integer {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                type Value = $ty;

                fn is_truthy(&self) -> bool {
                    *self != 0
                }

                fn into_value(self) -> Option<$ty> {
                    Some(self)
                }
            }
        )*
    };
}

truthy_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! truthy_float {
    ($($ty:ty),*) => {
        $(
            impl Truthy for $ty {
                type Value = $ty;

                fn is_truthy(&self) -> bool {
                    *self != 0.0 && !self.is_nan()
                }

                fn into_value(self) -> Option<$ty> {
                    Some(self)
                }
            }
        )*
    };
}

truthy_float!(f32, f64);

// Anything with a length is truthy only when it holds something.
macro_rules! truthy_by_len {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Truthy for $ty {
                type Value = Self;

                fn is_truthy(&self) -> bool {
                    !self.is_empty()
                }

                fn into_value(self) -> Option<Self> {
                    Some(self)
                }
            }
        )*
    };
}

truthy_by_len!(
    [] String,
    ['a] &'a str,
    ['a] Cow<'a, str>,
    [T] Vec<T>,
    ['a, T] &'a [T],
    [T] Arc<[T]>,
    [T] VecDeque<T>,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
    [T, S] HashSet<T, S>,
    [T] BTreeSet<T>,
);

impl<T: Truthy> Truthy for Option<T> {
    type Value = T::Value;

    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(T::is_truthy)
    }

    fn into_value(self) -> Option<T::Value> {
        self.and_then(T::into_value)
    }
}

macro_rules! truthy_by_deref {
    ($($ptr:ident),*) => {
        $(
            impl<T: Truthy + ?Sized> Truthy for $ptr<T> {
                type Value = Self;

                fn is_truthy(&self) -> bool {
                    T::is_truthy(self)
                }

                fn into_value(self) -> Option<Self> {
                    Some(self)
                }
            }
        )*
    };
}

truthy_by_deref!(Box, Rc);

/// The emptiness predicate for fetched data.
///
/// Absent values are empty, sequences and keyed collections are empty when
/// they hold nothing, and every other value is never empty.  Notably an empty
/// string or a zero is *not* empty data.
pub trait Emptiness {
    /// Whether the value counts as empty data.
    fn is_empty_value(&self) -> bool;
}

impl<T: Emptiness> Emptiness for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, T::is_empty_value)
    }
}

impl<T: Emptiness + ?Sized> Emptiness for &T {
    fn is_empty_value(&self) -> bool {
        T::is_empty_value(self)
    }
}

macro_rules! empty_by_len {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($generics)*> Emptiness for $ty {
                fn is_empty_value(&self) -> bool {
                    self.is_empty()
                }
            }
        )*
    };
}

empty_by_len!(
    [T] Vec<T>,
    [T] [T],
    [T] Box<[T]>,
    [T] Arc<[T]>,
    [T] VecDeque<T>,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
    [T, S] HashSet<T, S>,
    [T] BTreeSet<T>,
);

macro_rules! never_empty {
    ($($ty:ty),*) => {
        $(
            impl Emptiness for $ty {
                fn is_empty_value(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_empty!(
    bool, char, String, str, f32, f64,
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

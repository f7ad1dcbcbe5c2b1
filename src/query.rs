//! Branch selection for the `QueryBoundary` component.

use serde::{Deserialize, Serialize};

/// The observable state of a data query.
///
/// This is the subset of a query client's state the boundary looks at; it
/// serializes so it can be carried from the server to the client along with
/// the rest of the page state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    pub data: Option<T>,
    pub is_pending: bool,
    pub is_error: bool,
    /// Overrides the emptiness check on `data` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
}

impl<T> QueryResult<T> {
    pub fn pending() -> Self {
        Self {
            data: None,
            is_pending: true,
            is_error: false,
            is_empty: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            is_pending: false,
            is_error: false,
            is_empty: None,
        }
    }

    pub fn error() -> Self {
        Self {
            data: None,
            is_pending: false,
            is_error: true,
            is_empty: None,
        }
    }

    pub fn with_empty(mut self, is_empty: bool) -> Self {
        self.is_empty = Some(is_empty);
        self
    }
}

/// What a `QueryBoundary` renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Nothing; the boundary is disabled or has no query.
    Nothing,
    Loading,
    Error,
    Empty,
    /// The children, with the data.
    Content,
}

/// Picks the branch to render for `query`.
///
/// An error only takes over while the data is empty; a failed refetch keeps
/// rendering the data it already had.  The `is_empty` flag of the query
/// decides the empty branch but never the error one.
pub fn branch<T>(
    query: Option<&QueryResult<T>>,
    when: bool,
    is_empty: impl Fn(Option<&T>) -> bool,
) -> Branch {
    let query = match query {
        Some(query) if when => query,
        _ => return Branch::Nothing,
    };
    if query.is_pending {
        return Branch::Loading;
    }
    if query.is_error && is_empty(query.data.as_ref()) {
        return Branch::Error;
    }
    let empty = query
        .is_empty
        .unwrap_or_else(|| is_empty(query.data.as_ref()));
    if empty {
        Branch::Empty
    } else {
        Branch::Content
    }
}

//! This crate provides declarative control-flow components for the Leptos
//! framework: conditional rendering, list iteration, multi-branch matching,
//! async resolution and a handful of lifecycle-gated renderers.  Each of
//! them is a thin `#[component]` over a decision core that knows nothing of
//! the DOM, so the rules they follow can be relied upon (and tested) on
//! their own.
//!
//! ## Components
//!
//! - [`Show`](component::Show) renders its children while a condition is
//!   truthy.  Truthiness here is stricter than a plain `bool` conversion:
//!   zero, `NaN`, empty strings and empty collections are all falsy (see
//!   [`Truthy`]).
//! - [`For`](component::For), [`Repeat`](component::Repeat) and
//!   [`Split`](component::Split) render a list of items, optionally
//!   reversed or wrapped in a container, each item keyed by an explicit key
//!   function, by the key carried by its rendered [`Node`], or by its index.
//! - [`Switch`](component::Switch) renders the first of its [`Case`]s whose
//!   condition is truthy.
//! - [`Await`](component::Await) renders the outcome of a value that may
//!   still be pending, never letting a superseded value overwrite a newer
//!   one.
//! - [`Dynamic`](component::Dynamic) renders a shape selected at runtime.
//! - [`Visible`](component::Visible) and [`Timeout`](component::Timeout)
//!   gate their children on visibility and on time.
//! - [`QueryBoundary`](component::QueryBoundary) branches on the state of
//!   a data query.
//! - [`ClientOnly`](component::ClientOnly), [`Once`](component::Once) and
//!   [`ErrorBoundary`](component::ErrorBoundary) round it off.
//!
//! ## Platform services
//!
//! Visibility and timers depend on the environment the view is rendered
//! in.  Rather than detecting it, the components look up a service through
//! context: a [`VisibilityService`](visibility::VisibilityService) for
//! `Visible` and [`Timers`](timer::Timers) for `Timeout`.  Without a
//! visibility service content renders immediately; without a timer service
//! the default for the enabled features is used.
//!
//! # Example
//!
//! ```
//! use leptos::prelude::*;
//! use leptos_control_flow::{
//!     component::{Show, Switch},
//!     Case, Renderable,
//! };
//!
//! #[component]
//! fn Inbox(#[prop(into)] unread: Signal<Vec<String>>) -> impl IntoView {
//!     view! {
//!         <Show
//!             when=move || unread.get()
//!             children={Renderable::computed(|unread: Vec<String>| {
//!                 view! { <p>{unread.len()}" unread"</p> }
//!             })}
//!             fallback=|| view! { <p>"All caught up"</p> }
//!         />
//!         <Switch
//!             cases={vec![
//!                 Case::when(move || unread.get().len() > 10, Renderable::fixed(|| "Busy day")),
//!                 Case::otherwise(|| "Quiet day"),
//!             ]}
//!         />
//!     }
//! }
//! ```
//!
//! # Feature Flags
#![cfg_attr(
    feature = "document-features",
    cfg_attr(doc, doc = ::document_features::document_features!())
)]

pub mod component;
mod error;
pub mod iterate;
pub mod query;
pub mod render;
pub mod resolve;
pub mod split;
pub mod switch;
pub mod timer;
pub mod truthy;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use iterate::{Key, KeyFn, Keyed};
pub use render::{Node, Renderable, Shape, Wrapper};
pub use resolve::{AsyncState, Awaitable};
pub use split::Separator;
pub use switch::Case;
pub use truthy::{Emptiness, Truthy};

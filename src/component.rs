//! The control-flow components.
//!
//! Several of these share a name with a component in the Leptos prelude
//! (`Show`, `For`, `Await`, `ErrorBoundary`); import them by path, which
//! takes precedence over the glob import of the prelude.

mod awaiting;
mod dynamic;
mod each;
mod lifecycle;
mod query;
mod show;
mod switch;
mod timeout;
mod visible;

pub use awaiting::*;
pub use dynamic::*;
pub use each::*;
pub use lifecycle::*;
pub use query::*;
pub use show::*;
pub use switch::*;
pub use timeout::*;
pub use visible::*;

#[cfg(test)]
pub(crate) use self::{dynamic::instantiating, lifecycle::recovering, show::showing};

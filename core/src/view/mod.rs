//! Derived views
//!
//! Stateless functions over a task slice. Nothing here is cached or stored,
//! so a view can never disagree with the collection it was computed from.

mod filter;
mod summary;

pub use filter::*;
pub use summary::*;

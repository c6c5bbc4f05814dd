//! Task module
//!
//! This module contains the task model and the task store.

mod model;
mod store;

pub use model::*;
pub use store::TaskStore;

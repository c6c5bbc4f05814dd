//! Theme preference
//!
//! Light/dark flag persisted next to the tasks.

mod model;
mod store;

pub use model::Theme;
pub use store::ThemeStore;

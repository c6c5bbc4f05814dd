//! Persistence adapters
//!
//! The task store and the theme store read from and write to a string
//! key-value store. This module defines that boundary and ships two
//! implementations.

mod adapter;
mod file;
mod memory;

pub use adapter::PersistenceAdapter;
pub use file::FileStorage;
pub use memory::MemoryStorage;

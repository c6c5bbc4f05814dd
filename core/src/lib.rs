//! Core library for the TaskPriority tracker
//!
//! This crate contains everything below the presentation layer:
//! - Task model and the task store (the only mutator of the collection)
//! - Persistence adapters (in-memory and file backed key-value stores)
//! - Derived views: filter & sort, summary statistics
//! - Theme preference and configuration

pub mod config;
pub mod error;
pub mod manager;
pub mod storage;
pub mod task;
pub mod theme;
pub mod view;

pub use config::Config;
pub use error::Error;
pub use manager::TaskManager;
pub type Result<T> = std::result::Result<T, Error>;

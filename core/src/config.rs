//! Runtime configuration
//!
//! Every setting has a default and can be overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::theme::Theme;

pub const DEFAULT_DATA_DIR: &str = ".tp-data";
pub const DEFAULT_TASKS_KEY: &str = "taskManager.tasks";
pub const DEFAULT_THEME_KEY: &str = "taskManager.theme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory used by the file-backed storage
    pub data_dir: PathBuf,
    pub tasks_key: String,
    pub theme_key: String,
    /// Theme used until the user picks one
    pub default_theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            tasks_key: DEFAULT_TASKS_KEY.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
            default_theme: Theme::default(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load from the process environment
    ///
    /// - `TP_DATA_DIR`
    /// - `TP_TASKS_KEY`
    /// - `TP_THEME_KEY`
    /// - `TP_PREFER_DARK` (1/true/yes/on or 0/false/no/off)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("TP_DATA_DIR").and_then(non_empty) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("TP_TASKS_KEY").and_then(non_empty) {
            config.tasks_key = key;
        }
        if let Some(key) = lookup("TP_THEME_KEY").and_then(non_empty) {
            config.theme_key = key;
        }
        match lookup("TP_PREFER_DARK").as_deref().and_then(parse_flag) {
            Some(true) => config.default_theme = Theme::Dark,
            Some(false) => config.default_theme = Theme::Light,
            None => {}
        }

        config
    }
}

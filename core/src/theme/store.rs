//! Theme persistent store

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::model::Theme;
use crate::storage::PersistenceAdapter;

/// Cloneable handle to the current theme
#[derive(Clone)]
pub struct ThemeStore {
    theme: Arc<RwLock<Theme>>,
    adapter: Arc<dyn PersistenceAdapter>,
    key: Arc<str>,
}

impl ThemeStore {
    /// Open the store
    ///
    /// Uses `fallback` when nothing is stored under `key` or it cannot be read.
    /// Any stored value is a user choice: `dark` reads as dark, everything else as light.
    pub async fn open(
        adapter: Arc<dyn PersistenceAdapter>,
        key: impl Into<String>,
        fallback: Theme,
    ) -> Self {
        let key: String = key.into();
        let theme = match adapter.load(&key).await {
            Ok(Some(raw)) => {
                if let Err(e) = raw.parse::<Theme>() {
                    debug!("Reading stored theme as light: {}", e);
                }
                Theme::from_stored(&raw)
            }
            Ok(None) => fallback,
            Err(e) => {
                warn!("Failed to load theme from {}: {}", key, e);
                fallback
            }
        };
        debug!("Theme is {}", theme);

        Self {
            theme: Arc::new(RwLock::new(theme)),
            adapter,
            key: key.into(),
        }
    }

    pub async fn current(&self) -> Theme {
        *self.theme.read().await
    }

    /// Switch between light and dark, returning the new theme
    pub async fn toggle(&self) -> Theme {
        let mut theme = self.theme.write().await;
        *theme = theme.toggled();

        if let Err(e) = self.adapter.save(&self.key, theme.as_str()).await {
            warn!("Failed to persist theme: {}", e);
        }
        *theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const KEY: &str = "taskManager.theme";

    #[tokio::test]
    async fn test_stored_value_wins() {
        let storage = Arc::new(MemoryStorage::new().with_entry(KEY, "dark"));
        let store = ThemeStore::open(storage, KEY, Theme::Light).await;
        assert_eq!(store.current().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_fallback() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::open(storage, KEY, Theme::Dark).await;
        assert_eq!(store.current().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_unknown_stored_value_reads_as_light() {
        for raw in ["purple", "Dark", ""] {
            let storage = Arc::new(MemoryStorage::new().with_entry(KEY, raw));
            let store = ThemeStore::open(storage, KEY, Theme::Dark).await;
            assert_eq!(store.current().await, Theme::Light, "stored {:?}", raw);
        }
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::open(storage.clone(), KEY, Theme::Light).await;

        assert_eq!(store.toggle().await, Theme::Dark);
        assert_eq!(storage.get(KEY).await.as_deref(), Some("dark"));

        assert_eq!(store.toggle().await, Theme::Light);
        assert_eq!(storage.get(KEY).await.as_deref(), Some("light"));

        let reopened = ThemeStore::open(storage, KEY, Theme::Dark).await;
        assert_eq!(reopened.current().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_survives_save_failure() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_read_only(true);
        let store = ThemeStore::open(storage.clone(), KEY, Theme::Light).await;

        assert_eq!(store.toggle().await, Theme::Dark);
        assert_eq!(store.current().await, Theme::Dark);
        assert!(storage.get(KEY).await.is_none());
    }
}

//! Task manager
//!
//! The single handle a presentation layer holds. It owns the task store, the
//! theme store and the list selectors, forwards user intents to the owning
//! component and recomputes derived views from a fresh snapshot on every
//! read.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::config::Config;
use crate::storage::{FileStorage, PersistenceAdapter};
use crate::task::{NewTask, Task, TaskEvent, TaskPatch, TaskPriority, TaskSnapshot, TaskStore};
use crate::theme::{Theme, ThemeStore};
use crate::view::{
    filter_and_sort, summarize, CompletionFilter, PriorityFilter, TaskFilter, TaskSummary,
};

#[derive(Clone)]
pub struct TaskManager {
    tasks: TaskStore,
    theme: ThemeStore,
    /// List selectors, kept in memory only
    filter: Arc<RwLock<TaskFilter>>,
}

impl TaskManager {
    /// Build a manager over any persistence adapter
    pub async fn new(adapter: Arc<dyn PersistenceAdapter>, config: &Config) -> Self {
        let tasks = TaskStore::open(adapter.clone(), config.tasks_key.as_str()).await;
        let theme =
            ThemeStore::open(adapter, config.theme_key.as_str(), config.default_theme).await;

        Self {
            tasks,
            theme,
            filter: Arc::new(RwLock::new(TaskFilter::default())),
        }
    }

    /// Build a manager persisting to files under `config.data_dir`
    pub async fn open(config: &Config) -> Self {
        tracing::info!("Using data directory: {:?}", config.data_dir);
        let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::new(storage, config).await
    }

    pub fn store(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.tasks.subscribe()
    }

    // Reads

    /// Full collection in insertion order
    pub async fn tasks(&self) -> TaskSnapshot {
        self.tasks.snapshot().await
    }

    /// Tasks passing the current selectors, in display order
    pub async fn visible_tasks(&self) -> Vec<Task> {
        let filter = self.filter().await;
        let snapshot = self.tasks.snapshot().await;
        filter_and_sort(&snapshot, &filter)
    }

    pub async fn visible_count(&self) -> usize {
        let filter = self.filter().await;
        let snapshot = self.tasks.snapshot().await;
        snapshot.iter().filter(|t| filter.matches(t)).count()
    }

    /// Statistics over the unfiltered collection
    pub async fn summary(&self) -> TaskSummary {
        summarize(&self.tasks.snapshot().await)
    }

    pub async fn theme(&self) -> Theme {
        self.theme.current().await
    }

    pub async fn filter(&self) -> TaskFilter {
        *self.filter.read().await
    }

    // Writes

    pub async fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Option<Uuid> {
        let request = NewTask::new(title)
            .with_description(description)
            .with_priority(priority);
        self.tasks.create_task(request).await
    }

    pub async fn delete_task(&self, id: Uuid) -> bool {
        self.tasks.delete_task(id).await
    }

    pub async fn toggle_complete(&self, id: Uuid) -> Option<Task> {
        self.tasks.toggle_complete(id).await
    }

    pub async fn update_progress(&self, id: Uuid, value: i64) -> Option<Task> {
        self.tasks.update_progress(id, value).await
    }

    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Option<Task> {
        self.tasks.update_task(id, patch).await
    }

    pub async fn set_completion_filter(&self, completion: CompletionFilter) {
        self.filter.write().await.completion = completion;
    }

    pub async fn set_priority_filter(&self, priority: PriorityFilter) {
        self.filter.write().await.priority = priority;
    }

    pub async fn toggle_theme(&self) -> Theme {
        self.theme.toggle().await
    }
}

//! Task store
//!
//! Owns the authoritative task collection. Every successful mutation builds
//! a new collection, swaps it in, writes it through the persistence adapter
//! and then notifies subscribers, all before the call returns.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::model::{NewTask, Task, TaskEvent, TaskPatch, TaskSnapshot};
use crate::storage::PersistenceAdapter;

/// Cloneable handle to the task collection
#[derive(Clone)]
pub struct TaskStore {
    /// Current collection, replaced wholesale on every mutation
    state: Arc<RwLock<TaskSnapshot>>,
    adapter: Arc<dyn PersistenceAdapter>,
    key: Arc<str>,
    event_tx: broadcast::Sender<TaskEvent>,
}

impl TaskStore {
    /// Open the store, loading whatever was persisted under `key`
    ///
    /// A missing or unreadable value starts an empty collection.
    pub async fn open(adapter: Arc<dyn PersistenceAdapter>, key: impl Into<String>) -> Self {
        let key: String = key.into();
        let snapshot = match adapter.load(&key).await {
            Ok(Some(content)) => match TaskSnapshot::from_json(&content) {
                Ok(snapshot) => {
                    info!("Loaded {} tasks from {}", snapshot.len(), key);
                    snapshot
                }
                Err(e) => {
                    warn!("Ignoring malformed task data in {}: {}", key, e);
                    TaskSnapshot::default()
                }
            },
            Ok(None) => {
                debug!("No persisted tasks under {}, starting empty", key);
                TaskSnapshot::default()
            }
            Err(e) => {
                warn!("Failed to load tasks from {}: {}", key, e);
                TaskSnapshot::default()
            }
        };

        let (event_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(snapshot)),
            adapter,
            key: key.into(),
            event_tx,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.event_tx.subscribe()
    }

    /// Current collection in insertion order
    pub async fn snapshot(&self) -> TaskSnapshot {
        self.state.read().await.clone()
    }

    /// Get a task by ID
    pub async fn get(&self, id: Uuid) -> Option<Task> {
        self.state.read().await.get(id).cloned()
    }

    /// Create a task and append it to the collection
    ///
    /// Returns `None` without touching the collection when the title is
    /// blank.
    pub async fn create_task(&self, new_task: NewTask) -> Option<Uuid> {
        if let Err(e) = new_task.validate() {
            debug!("Rejected task creation: {}", e);
            return None;
        }

        let task = Task::new(new_task);
        let id = task.id;
        let mut state = self.state.write().await;
        let mut tasks = state.to_vec();
        tasks.push(task);
        *state = TaskSnapshot::new(tasks);
        self.persist(&state).await;

        debug!("Created task {}", id);
        // Sent under the write guard so events follow mutation order
        self.notify(TaskEvent::Created(id));
        Some(id)
    }

    /// Delete a task, returning whether it existed
    pub async fn delete_task(&self, id: Uuid) -> bool {
        let mut state = self.state.write().await;
        if !state.contains(id) {
            return false;
        }
        let tasks: Vec<Task> = state.iter().filter(|t| t.id != id).cloned().collect();
        *state = TaskSnapshot::new(tasks);
        self.persist(&state).await;

        debug!("Deleted task {}", id);
        self.notify(TaskEvent::Deleted(id));
        true
    }

    /// Flip a task's completion
    ///
    /// Completing sets progress to 100; reopening leaves progress as it is.
    pub async fn toggle_complete(&self, id: Uuid) -> Option<Task> {
        self.modify(id, Task::toggle_complete).await
    }

    /// Set a task's progress, clamped to 0..=100
    ///
    /// The task counts as completed exactly when the clamped value is 100.
    pub async fn update_progress(&self, id: Uuid, value: i64) -> Option<Task> {
        self.modify(id, |task| task.set_progress(value)).await
    }

    /// Apply a patch to a task's title, description and priority
    ///
    /// An invalid patch is rejected as a whole and nothing changes.
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> Option<Task> {
        if let Err(e) = patch.validate() {
            debug!("Rejected update of task {}: {}", id, e);
            return None;
        }
        self.modify(id, |task| task.apply(&patch)).await
    }

    async fn modify<F>(&self, id: Uuid, f: F) -> Option<Task>
    where
        F: FnOnce(&mut Task),
    {
        let mut state = self.state.write().await;
        let mut tasks = state.to_vec();
        let task = tasks.iter_mut().find(|t| t.id == id)?;
        f(task);
        let updated = task.clone();
        *state = TaskSnapshot::new(tasks);
        self.persist(&state).await;

        debug!(
            "Updated task {} (progress {}, completed {})",
            id, updated.progress, updated.completed
        );
        self.notify(TaskEvent::Updated(id));
        Some(updated)
    }

    /// Write the collection through the adapter
    ///
    /// Failures are logged and otherwise ignored; the in-memory collection
    /// stays authoritative.
    async fn persist(&self, snapshot: &TaskSnapshot) {
        let content = match snapshot.to_json() {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize tasks: {}", e);
                return;
            }
        };

        if let Err(e) = self.adapter.save(&self.key, &content).await {
            warn!("Failed to persist {} tasks to {}: {}", snapshot.len(), self.key, e);
        }
    }

    fn notify(&self, event: TaskEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }
}

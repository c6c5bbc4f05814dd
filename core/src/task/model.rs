//! Task model definitions
//!
//! The serialized shape matches what the browser front end keeps in local
//! storage: camelCase fields, lowercase priorities and an ISO-8601
//! `createdAt`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

use crate::{Error, Result};

/// Upper bound of a task's progress
pub const MAX_PROGRESS: u8 = 100;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    /// Sort rank, high priority first
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::InvalidInput(format!("Unknown priority: {}", other))),
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp any integer into the valid progress range
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, MAX_PROGRESS as i64) as u8
}

fn deserialize_progress<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(clamp_progress(raw.round() as i64))
}

/// A tracked unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "deserialize_progress")]
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh task from a creation request
    ///
    /// Assigns a new id and creation time; progress starts at zero.
    pub fn new(new_task: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            priority: new_task.priority,
            completed: false,
            progress: 0,
            created_at: Utc::now(),
        }
    }

    /// Set progress, clamped, and derive completion from it
    pub fn set_progress(&mut self, value: i64) {
        self.progress = clamp_progress(value);
        self.completed = self.progress >= MAX_PROGRESS;
    }

    /// Flip completion
    ///
    /// Completing forces progress to 100. Reopening keeps whatever progress
    /// the task currently has, so a task completed through this toggle comes
    /// back at 100 rather than at its earlier value.
    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
        if self.completed {
            self.progress = MAX_PROGRESS;
        }
    }

    /// Apply the fields present in `patch`
    ///
    /// Callers validate the patch first; id, creation time, completion and
    /// progress are never touched here.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Request to create a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl NewTask {
    /// Create a request with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Reject blank titles
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Task title is required".to_string()));
        }
        Ok(())
    }
}

/// Partial update of a task's editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }

    /// A present title must not be blank
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) if title.trim().is_empty() => Err(Error::InvalidInput(
                "Task title cannot be blank".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Immutable point-in-time copy of the task collection, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    tasks: Arc<[Task]>,
}

impl TaskSnapshot {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }

    /// Find a task by id
    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Copy of the tasks, for building the next collection
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.to_vec()
    }

    /// Serialize to the persisted JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.tasks)?)
    }

    /// Parse the persisted JSON array
    pub fn from_json(content: &str) -> Result<Self> {
        let tasks: Vec<Task> = serde_json::from_str(content)?;
        Ok(Self::new(tasks))
    }
}

impl Default for TaskSnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for TaskSnapshot {
    type Target = [Task];

    fn deref(&self) -> &Self::Target {
        &self.tasks
    }
}

impl From<Vec<Task>> for TaskSnapshot {
    fn from(tasks: Vec<Task>) -> Self {
        Self::new(tasks)
    }
}

/// Change notification sent after a mutation has been applied and persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    Created(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
}

impl TaskEvent {
    pub fn task_id(&self) -> Uuid {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task() {
        let task = Task::new(NewTask::new("Test task"));
        assert_eq!(task.title, "Test task");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.progress, 0);
        assert!(!task.completed);
    }

    #[test]
    fn test_new_task_builders() {
        let request = NewTask::new("Write report")
            .with_description("Quarterly numbers")
            .with_priority(TaskPriority::High);
        let task = Task::new(request);

        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_new_task_validation() {
        assert!(NewTask::new("ok").validate().is_ok());
        assert!(NewTask::new("  padded  ").validate().is_ok());
        for blank in ["", " ", "\t\n", "   "] {
            match NewTask::new(blank).validate() {
                Err(Error::InvalidInput(_)) => {}
                other => panic!("Expected InvalidInput for {:?}, got: {:?}", blank, other),
            }
        }
    }

    #[test]
    fn test_priority_rank() {
        assert!(TaskPriority::High.rank() < TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::Low.rank());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert_eq!(" Low ".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_priority_display_matches_serialized_form() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            let serialized = serde_json::to_value(priority).unwrap();
            assert_eq!(serialized, priority.to_string());
            assert_eq!(priority.to_string().parse::<TaskPriority>().unwrap(), priority);
        }
    }

    #[test]
    fn test_set_progress_clamps_and_completes() {
        let mut task = Task::new(NewTask::new("Test task"));
        let cases: [(i64, u8, bool); 7] = [
            (-20, 0, false),
            (0, 0, false),
            (42, 42, false),
            (99, 99, false),
            (100, 100, true),
            (150, 100, true),
            (i64::MAX, 100, true),
        ];

        for (input, expected, completed) in cases {
            task.set_progress(input);
            assert_eq!(task.progress, expected, "progress for {}", input);
            assert_eq!(task.completed, completed, "completed for {}", input);
        }
    }

    #[test]
    fn test_toggle_complete_keeps_progress_when_reopened() {
        let mut task = Task::new(NewTask::new("Test task"));
        task.set_progress(30);

        task.toggle_complete();
        assert!(task.completed);
        assert_eq!(task.progress, 100);

        task.toggle_complete();
        assert!(!task.completed);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_apply_patch() {
        let mut task = Task::new(NewTask::new("Old").with_description("keep"));
        task.set_progress(40);
        let before = task.clone();

        task.apply(&TaskPatch::new().title("New").priority(TaskPriority::Low));

        assert_eq!(task.title, "New");
        assert_eq!(task.description, "keep");
        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.id, before.id);
        assert_eq!(task.created_at, before.created_at);
        assert_eq!(task.progress, 40);
        assert!(!task.completed);
    }

    #[test]
    fn test_patch_validation() {
        assert!(TaskPatch::new().validate().is_ok());
        assert!(TaskPatch::new().description("").validate().is_ok());
        assert!(TaskPatch::new().title("  ").validate().is_err());
        assert!(TaskPatch::new().is_empty());
        assert!(!TaskPatch::new().priority(TaskPriority::High).is_empty());
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task::new(NewTask::new("Test task").with_priority(TaskPriority::High));
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["priority"], "high");
        assert_eq!(value["completed"], false);
        assert_eq!(value["progress"], 0);
        assert!(value["createdAt"].is_string());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let mut done = Task::new(NewTask::new("Done").with_description("finished"));
        done.toggle_complete();
        let mut partial = Task::new(NewTask::new("Partial").with_priority(TaskPriority::Low));
        partial.set_progress(65);
        let snapshot = TaskSnapshot::new(vec![done, partial]);

        let json = snapshot.to_json().unwrap();
        let restored = TaskSnapshot::from_json(&json).unwrap();

        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_parse_browser_document() {
        let json = r#"[
            {"id":"5b0c6f0e-8d4a-4c1b-9a57-1f3b1c2d3e4f","title":"Buy milk",
             "priority":"low","completed":false,"progress":180,
             "createdAt":"2024-03-01T09:30:00.000Z"},
            {"id":"7e9f0a1b-2c3d-4e5f-8a9b-0c1d2e3f4a5b","title":"Ship it",
             "description":"","priority":"high","completed":true,"progress":-5,
             "createdAt":"2024-03-02T10:00:00.000Z"}
        ]"#;

        let snapshot = TaskSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].description, "");
        assert_eq!(snapshot[0].progress, 100);
        assert_eq!(snapshot[1].progress, 0);
        assert_eq!(
            snapshot[0].created_at,
            "2024-03-01T09:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_parse_malformed_document() {
        assert!(TaskSnapshot::from_json("not json").is_err());
        assert!(TaskSnapshot::from_json(r#"{"tasks":[]}"#).is_err());
    }

    #[test]
    fn test_event_task_id() {
        let id = Uuid::new_v4();
        assert_eq!(TaskEvent::Deleted(id).task_id(), id);
    }
}

//! Filter & sort view

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority};
use crate::{Error, Result};

/// Completion selector of the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl CompletionFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl std::str::FromStr for CompletionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(Error::InvalidInput(format!(
                "Unknown completion filter: {}",
                other
            ))),
        }
    }
}

/// Priority selector of the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(self, priority: TaskPriority) -> bool {
        match self {
            Self::All => true,
            Self::Low => priority == TaskPriority::Low,
            Self::Medium => priority == TaskPriority::Medium,
            Self::High => priority == TaskPriority::High,
        }
    }
}

impl From<TaskPriority> for PriorityFilter {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => Self::Low,
            TaskPriority::Medium => Self::Medium,
            TaskPriority::High => Self::High,
        }
    }
}

impl std::str::FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<TaskPriority>().map(Self::from)
    }
}

/// Both list selectors together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default)]
    pub completion: CompletionFilter,
    #[serde(default)]
    pub priority: PriorityFilter,
}

impl TaskFilter {
    pub fn new(completion: CompletionFilter, priority: PriorityFilter) -> Self {
        Self {
            completion,
            priority,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.completion.matches(task) && self.priority.matches(task.priority)
    }
}

/// Filter tasks and order them for display
///
/// Open tasks come before completed ones, then high before medium before
/// low. The sort is stable, so ties keep collection order.
pub fn filter_and_sort(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    visible.sort_by_key(|t| (t.completed, t.priority.rank()));
    visible
}

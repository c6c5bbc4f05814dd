//! Summary statistics over the whole collection

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskPriority};

/// Aggregate counts shown above the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Open tasks with high priority
    pub high_pending: usize,
    /// Mean progress over all tasks, rounded half up
    pub overall_progress: u8,
}

pub fn summarize(tasks: &[Task]) -> TaskSummary {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let high_pending = tasks
        .iter()
        .filter(|t| t.priority == TaskPriority::High && !t.completed)
        .count();

    TaskSummary {
        total,
        completed,
        active: total - completed,
        high_pending,
        overall_progress: mean_progress(tasks),
    }
}

fn mean_progress(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let total = tasks.len() as u64;
    let sum: u64 = tasks.iter().map(|t| u64::from(t.progress)).sum();
    // round(sum / total), halves up
    ((2 * sum + total) / (2 * total)) as u8
}

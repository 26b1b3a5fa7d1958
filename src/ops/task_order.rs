use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::TaskRecord;

/// Display order for tasks within a group.
///
/// Due date ascending (undated last), then priority descending, then
/// least recently updated first.
pub fn compare_tasks(a: &TaskRecord, b: &TaskRecord) -> Ordering {
    let due = |t: &TaskRecord| t.due_date.unwrap_or(NaiveDate::MAX);
    due(a)
        .cmp(&due(b))
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.updated.cmp(&b.updated))
}

/// Stable sort by [`compare_tasks`].
pub fn sort_tasks(tasks: &mut [TaskRecord]) {
    tasks.sort_by(compare_tasks);
}

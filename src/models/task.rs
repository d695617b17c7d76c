use serde::{Deserialize, Serialize};

// Define task status enum
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Checkbox toggle on the task list: DONE goes back to TODO, anything else completes.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Done => TaskStatus::Todo,
            _ => TaskStatus::Done,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: String,
    pub user_id: String,
}

/// Body of `POST /tasks`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: String,
}

impl NewTask {
    pub fn into_task(self, id: String, user_id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            user_id,
        }
    }
}

/// Body of `PUT /tasks/:id`. Absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Shallow merge. `id` and `userId` are never rewritten.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Status tab plus free-text search over titles.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub search: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.map_or(true, |s| s == task.status);
        let search_ok = task
            .title
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        status_ok && search_ok
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Kanban board columns, in TODO, IN_PROGRESS, DONE order.
pub fn kanban_columns(tasks: &[Task]) -> Vec<(TaskStatus, Vec<&Task>)> {
    TaskStatus::ALL
        .iter()
        .map(|status| {
            let column = tasks.iter().filter(|t| t.status == *status).collect();
            (*status, column)
        })
        .collect()
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub completion_rate: u32,  // whole percent
}

impl DashboardStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
        let completion_rate =
            ((completed_tasks as f64 / total_tasks.max(1) as f64) * 100.0).round() as u32;

        Self {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            status,
            priority: Priority::Medium,
            due_date: "2025-01-01".to_string(),
            user_id: "u_1".to_string(),
        }
    }

    #[test]
    fn test_task_uses_wire_field_names() {
        let json = serde_json::to_value(task("t_1", "Write report", TaskStatus::InProgress)).unwrap();
        assert_eq!(json["status"], "IN_PROGRESS");
        assert_eq!(json["priority"], "MEDIUM");
        assert_eq!(json["dueDate"], "2025-01-01");
        assert_eq!(json["userId"], "u_1");
    }

    #[test]
    fn test_patch_changes_only_given_fields() {
        let mut t = task("t_1", "Write report", TaskStatus::Todo);
        let before = t.clone();
        TaskPatch::status(TaskStatus::Done).apply(&mut t);

        assert_eq!(t.status, TaskStatus::Done);
        assert_eq!(t.title, before.title);
        assert_eq!(t.due_date, before.due_date);
        assert_eq!(t.id, before.id);
    }

    #[test]
    fn test_toggle_status() {
        assert_eq!(TaskStatus::Done.toggled(), TaskStatus::Todo);
        assert_eq!(TaskStatus::Todo.toggled(), TaskStatus::Done);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Done);
    }

    #[test]
    fn test_filter_by_status_and_search() {
        let tasks = vec![
            task("1", "Security Audit", TaskStatus::Todo),
            task("2", "Refactor core", TaskStatus::Done),
            task("3", "security review", TaskStatus::Done),
        ];

        let filter = TaskFilter { status: Some(TaskStatus::Done), search: "SECURITY".into() };
        let hits = filter.apply(&tasks);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");

        assert_eq!(TaskFilter::default().apply(&tasks).len(), 3);
    }

    #[test]
    fn test_dashboard_stats() {
        let tasks = vec![
            task("1", "a", TaskStatus::Done),
            task("2", "b", TaskStatus::Todo),
            task("3", "c", TaskStatus::InProgress),
        ];
        let stats = DashboardStats::from_tasks(&tasks);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 1);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.completion_rate, 33);

        assert_eq!(DashboardStats::from_tasks(&[]).completion_rate, 0);
    }

    #[test]
    fn test_kanban_columns_keep_status_order() {
        let tasks = vec![task("1", "a", TaskStatus::Done), task("2", "b", TaskStatus::Todo)];
        let columns = kanban_columns(&tasks);
        assert_eq!(columns[0].0, TaskStatus::Todo);
        assert_eq!(columns[0].1.len(), 1);
        assert!(columns[1].1.is_empty());
        assert_eq!(columns[2].1[0].id, "1");
    }
}

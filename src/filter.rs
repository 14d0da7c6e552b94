// View filtering over the task collection

use crate::models::{Priority, Status, Task};
use tracing::warn;

/// Filter for listing tasks: everything, one status, or one priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Status(Status),
    Priority(Priority),
}

impl TaskFilter {
    /// Parse filter text from the UI ("all", a status value, or a priority
    /// value). Unknown text degrades to `All` so stale filter state never
    /// breaks a listing.
    pub fn parse(s: &str) -> Self {
        if s == "all" {
            return TaskFilter::All;
        }
        if let Some(status) = Status::parse(s) {
            return TaskFilter::Status(status);
        }
        if let Some(priority) = Priority::parse(s) {
            return TaskFilter::Priority(priority);
        }
        warn!(filter = s, "unknown filter value, showing all tasks");
        TaskFilter::All
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Status(status) => task.status == *status,
            TaskFilter::Priority(priority) => task.priority == *priority,
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => f.write_str("all"),
            TaskFilter::Status(status) => write!(f, "{}", status),
            TaskFilter::Priority(priority) => write!(f, "{}", priority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(priority: Priority, status: Status) -> Task {
        Task {
            id: "t".to_string(),
            title: "t".to_string(),
            description: String::new(),
            priority,
            status,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_parse_all() {
        assert_eq!(TaskFilter::parse("all"), TaskFilter::All);
    }

    #[test]
    fn test_parse_status_and_priority() {
        assert_eq!(
            TaskFilter::parse("in-progress"),
            TaskFilter::Status(Status::InProgress)
        );
        assert_eq!(
            TaskFilter::parse("high"),
            TaskFilter::Priority(Priority::High)
        );
    }

    #[test]
    fn test_parse_unknown_degrades_to_all() {
        assert_eq!(TaskFilter::parse("urgent"), TaskFilter::All);
        assert_eq!(TaskFilter::parse(""), TaskFilter::All);
    }

    #[test]
    fn test_matches() {
        let t = task(Priority::High, Status::Done);

        assert!(TaskFilter::All.matches(&t));
        assert!(TaskFilter::Status(Status::Done).matches(&t));
        assert!(!TaskFilter::Status(Status::Todo).matches(&t));
        assert!(TaskFilter::Priority(Priority::High).matches(&t));
        assert!(!TaskFilter::Priority(Priority::Low).matches(&t));
    }
}

use chrono::NaiveDate;

use crate::task::{Task, TaskStatus};

/// Status facet shared by every task view. The source client re-derived
/// this predicate inline per view with slightly different status sets;
/// here it exists exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Completed,
    Incomplete,
    Pending,
    Overdue,
}

impl StatusFilter {
    pub fn all_options() -> [Self; 5] {
        [
            Self::All,
            Self::Completed,
            Self::Incomplete,
            Self::Pending,
            Self::Overdue,
        ]
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Completed",
            Self::Incomplete => "Incomplete",
            Self::Pending => "Pending",
            Self::Overdue => "Overdue",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "incomplete" => Some(Self::Incomplete),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// A task is overdue when its due date is strictly before `today`.
/// Due today is not overdue, tasks without a due date are never
/// overdue, and completed tasks are excluded.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.status == TaskStatus::Completed {
        return false;
    }
    task.due_date.is_some_and(|due| due < today)
}

/// Composes the case-insensitive search over title and description with
/// the status facet.
pub fn filter_tasks(
    tasks: &[Task],
    filter: StatusFilter,
    query: &str,
    today: NaiveDate,
) -> Vec<Task> {
    let needle = query.trim().to_ascii_lowercase();

    tasks
        .iter()
        .filter(|task| {
            if !needle.is_empty() {
                let title_match = task.title.to_ascii_lowercase().contains(&needle);
                let description_match =
                    task.description.to_ascii_lowercase().contains(&needle);
                if !title_match && !description_match {
                    return false;
                }
            }

            match filter {
                StatusFilter::All => true,
                StatusFilter::Completed => task.status == TaskStatus::Completed,
                StatusFilter::Incomplete => task.status == TaskStatus::Incomplete,
                StatusFilter::Pending => task.status == TaskStatus::Pending,
                StatusFilter::Overdue => is_overdue(task, today),
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{StatusFilter, filter_tasks, is_overdue};
    use crate::task::{Task, TaskId, TaskStatus, parse_due_date};

    fn task(title: &str, due: Option<&str>, status: TaskStatus) -> Task {
        let mut task = Task::new_local(title.to_string(), String::new(), None, 1);
        task.due_date = due.and_then(parse_due_date);
        task.status = status;
        task
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let yesterday = task("y", Some("2025-06-14"), TaskStatus::Incomplete);
        let due_today = task("t", Some("2025-06-15"), TaskStatus::Incomplete);
        let undated = task("u", None, TaskStatus::Incomplete);
        let done_late = task("d", Some("2025-01-01"), TaskStatus::Completed);

        assert!(is_overdue(&yesterday, today()));
        assert!(!is_overdue(&due_today, today()));
        assert!(!is_overdue(&undated, today()));
        assert!(!is_overdue(&done_late, today()));
    }

    #[test]
    fn completed_filter_selects_only_completed() {
        let tasks = vec![
            Task {
                id: TaskId::Remote("a".to_string()),
                ..task("a", None, TaskStatus::Completed)
            },
            Task {
                id: TaskId::Remote("b".to_string()),
                ..task("b", None, TaskStatus::Incomplete)
            },
        ];

        let visible = filter_tasks(&tasks, StatusFilter::Completed, "", today());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, TaskId::Remote("a".to_string()));
    }

    #[test]
    fn search_matches_title_and_description_case_insensitively() {
        let mut with_desc = task("misc", None, TaskStatus::Pending);
        with_desc.description = "Quarterly REPORT".to_string();
        let tasks = vec![task("Ship Report", None, TaskStatus::Incomplete), with_desc];

        let visible = filter_tasks(&tasks, StatusFilter::All, "report", today());
        assert_eq!(visible.len(), 2);

        let visible = filter_tasks(&tasks, StatusFilter::Pending, "report", today());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "misc");

        assert!(filter_tasks(&tasks, StatusFilter::All, "nothing", today()).is_empty());
    }

    #[test]
    fn filter_keys_round_trip() {
        for option in StatusFilter::all_options() {
            assert_eq!(StatusFilter::from_key(option.as_key()), Some(option));
        }
        assert_eq!(StatusFilter::from_key("bogus"), None);
    }
}

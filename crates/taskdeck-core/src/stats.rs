use chrono::{Datelike, NaiveDate, Weekday};

use crate::filter::is_overdue;
use crate::task::{Task, TaskPriority};

/// Dashboard card counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionSummary {
    pub completed: usize,
    pub open: usize,
    pub overdue: usize,
}

pub fn completion_summary(tasks: &[Task], today: NaiveDate) -> CompletionSummary {
    let mut summary = CompletionSummary::default();
    for task in tasks {
        if task.is_completed() {
            summary.completed += 1;
        } else {
            summary.open += 1;
        }
        if is_overdue(task, today) {
            summary.overdue += 1;
        }
    }
    summary
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Per-weekday task counts for the load chart, Monday first. The
/// explicit `day` label wins over the due date's weekday; tasks with
/// neither are skipped.
pub fn weekday_load(tasks: &[Task]) -> [(Weekday, usize); 7] {
    let mut counts = [0_usize; 7];
    for task in tasks {
        let weekday = task
            .day
            .as_deref()
            .and_then(|label| label.trim().parse::<Weekday>().ok())
            .or_else(|| task.due_date.map(|date| date.weekday()));

        if let Some(weekday) = weekday {
            counts[weekday.num_days_from_monday() as usize] += 1;
        }
    }

    let mut out = [(Weekday::Mon, 0_usize); 7];
    for (slot, (weekday, count)) in out.iter_mut().zip(WEEK.into_iter().zip(counts)) {
        *slot = (weekday, count);
    }
    out
}

/// Priority-by-completion counts for the quadrant widget. Tasks with no
/// priority are bucketed as medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityQuadrants {
    pub high_open: usize,
    pub high_done: usize,
    pub medium_open: usize,
    pub medium_done: usize,
    pub low_open: usize,
    pub low_done: usize,
}

pub fn priority_quadrants(tasks: &[Task]) -> PriorityQuadrants {
    let mut quadrants = PriorityQuadrants::default();
    for task in tasks {
        let priority = task.priority.unwrap_or(TaskPriority::Medium);
        let slot = match (priority, task.is_completed()) {
            (TaskPriority::High, false) => &mut quadrants.high_open,
            (TaskPriority::High, true) => &mut quadrants.high_done,
            (TaskPriority::Medium, false) => &mut quadrants.medium_open,
            (TaskPriority::Medium, true) => &mut quadrants.medium_done,
            (TaskPriority::Low, false) => &mut quadrants.low_open,
            (TaskPriority::Low, true) => &mut quadrants.low_done,
        };
        *slot += 1;
    }
    quadrants
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::{completion_summary, priority_quadrants, weekday_load};
    use crate::task::{Task, TaskPriority, TaskStatus, parse_due_date};

    fn task(title: &str, status: TaskStatus) -> Task {
        let mut task = Task::new_local(title.to_string(), String::new(), None, 1);
        task.status = status;
        task
    }

    #[test]
    fn summary_counts_completed_open_and_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
        let mut late = task("late", TaskStatus::Pending);
        late.due_date = parse_due_date("2025-06-01");

        let tasks = vec![
            task("done", TaskStatus::Completed),
            task("open", TaskStatus::Incomplete),
            late,
        ];

        let summary = completion_summary(&tasks, today);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.open, 2);
        assert_eq!(summary.overdue, 1);
    }

    #[test]
    fn weekday_buckets_prefer_the_day_label() {
        // 2025-06-16 is a Monday.
        let mut labeled = task("labeled", TaskStatus::Incomplete);
        labeled.day = Some("friday".to_string());
        labeled.due_date = parse_due_date("2025-06-16");

        let mut dated = task("dated", TaskStatus::Incomplete);
        dated.due_date = parse_due_date("2025-06-16");

        let unplaced = task("unplaced", TaskStatus::Incomplete);

        let load = weekday_load(&[labeled, dated, unplaced]);
        assert_eq!(load[0], (Weekday::Mon, 1));
        assert_eq!(load[4], (Weekday::Fri, 1));
        assert_eq!(load.iter().map(|(_, count)| count).sum::<usize>(), 2);
    }

    #[test]
    fn quadrants_default_missing_priority_to_medium() {
        let mut high = task("high", TaskStatus::Incomplete);
        high.priority = Some(TaskPriority::High);
        let mut low_done = task("low", TaskStatus::Completed);
        low_done.priority = Some(TaskPriority::Low);
        let unprioritized = task("none", TaskStatus::Pending);

        let quadrants = priority_quadrants(&[high, low_done, unprioritized]);
        assert_eq!(quadrants.high_open, 1);
        assert_eq!(quadrants.low_done, 1);
        assert_eq!(quadrants.medium_open, 1);
        assert_eq!(quadrants.medium_done, 0);
    }
}

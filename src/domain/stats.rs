use crate::domain::models::{Task, TaskStatus};
use chrono::{DateTime, Duration, NaiveTime, TimeZone};

/// Counts derived from a task collection. Always recomputed from its
/// source, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
    pub due_today: usize,
}

impl DashboardStats {
    /// Share of completed tasks in percent. An empty collection yields 0
    /// rather than a division by zero.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }
}

/// Classifies `tasks` against `now`. "Today" is the calendar day of `now`
/// in `now`'s timezone, truncated to midnight; a task strictly before that
/// midnight counts as overdue and can never also count as due today.
pub fn compute_stats<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> DashboardStats {
    // A DST transition can remove midnight from the calendar day.
    let day_start = now
        .timezone()
        .from_local_datetime(&now.date_naive().and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| now.clone());
    let day_end = day_start.clone() + Duration::days(1);

    let mut stats = DashboardStats {
        total: tasks.len(),
        ..DashboardStats::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Completed => {
                stats.completed += 1;
                continue;
            }
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Todo | TaskStatus::Review => {}
        }

        if task.due_date < *now {
            stats.overdue += 1;
        }
        if task.due_date >= day_start && task.due_date < day_end && task.due_date >= *now {
            stats.due_today += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TaskPriority;
    use chrono::Utc;
    use proptest::prelude::*;

    fn fixed_time(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .expect("valid datetime")
            .with_timezone(&Utc)
    }

    fn task_due(id: i64, status: TaskStatus, due: DateTime<Utc>) -> Task {
        Task {
            id,
            title: format!("task-{id}"),
            description: String::new(),
            due_date: due,
            priority: TaskPriority::Medium,
            status,
            department: None,
        }
    }

    #[test]
    fn dashboard_scenario_counts_each_bucket_once() {
        let now = fixed_time("2026-03-02T12:00:00Z");
        let tasks = vec![
            task_due(1, TaskStatus::Completed, fixed_time("2026-03-01T09:00:00Z")),
            task_due(2, TaskStatus::Todo, fixed_time("2026-03-02T18:00:00Z")),
            task_due(3, TaskStatus::InProgress, fixed_time("2026-03-03T09:00:00Z")),
            task_due(4, TaskStatus::Todo, fixed_time("2026-02-28T09:00:00Z")),
        ];

        let stats = compute_stats(&tasks, &now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn empty_collection_yields_zero_percent_not_nan() {
        let stats = compute_stats(&[], &fixed_time("2026-03-02T12:00:00Z"));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percent_complete(), 0.0);
        assert!(stats.percent_complete().is_finite());
    }

    #[test]
    fn completed_task_is_never_overdue_or_due_today() {
        let now = fixed_time("2026-03-02T12:00:00Z");
        let tasks = vec![
            task_due(1, TaskStatus::Completed, fixed_time("2026-02-01T09:00:00Z")),
            task_due(2, TaskStatus::Completed, fixed_time("2026-03-02T18:00:00Z")),
        ];

        let stats = compute_stats(&tasks, &now);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.due_today, 0);
    }

    #[test]
    fn due_earlier_today_counts_as_overdue_not_due_today() {
        let now = fixed_time("2026-03-02T12:00:00Z");
        let tasks = vec![task_due(
            1,
            TaskStatus::Todo,
            fixed_time("2026-03-02T08:00:00Z"),
        )];

        let stats = compute_stats(&tasks, &now);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 0);
    }

    fn arb_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Todo),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Review),
            Just(TaskStatus::Completed),
        ]
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (1i64..10_000, arb_status(), -72i64..72i64).prop_map(|(id, status, offset_hours)| {
            task_due(
                id,
                status,
                fixed_time("2026-03-02T12:00:00Z") + Duration::hours(offset_hours),
            )
        })
    }

    proptest! {
        #[test]
        fn status_buckets_partition_the_collection(tasks in prop::collection::vec(arb_task(), 0..32)) {
            let now = fixed_time("2026-03-02T12:00:00Z");
            let stats = compute_stats(&tasks, &now);

            let todo_or_review = tasks
                .iter()
                .filter(|task| matches!(task.status, TaskStatus::Todo | TaskStatus::Review))
                .count();
            prop_assert_eq!(stats.completed + stats.in_progress + todo_or_review, stats.total);
        }

        #[test]
        fn overdue_and_due_today_are_disjoint(tasks in prop::collection::vec(arb_task(), 0..32)) {
            let now = fixed_time("2026-03-02T12:00:00Z");
            let stats = compute_stats(&tasks, &now);

            let open = tasks
                .iter()
                .filter(|task| task.status != TaskStatus::Completed)
                .count();
            prop_assert!(stats.overdue + stats.due_today <= open);
        }

        #[test]
        fn percent_complete_is_always_finite(tasks in prop::collection::vec(arb_task(), 0..32)) {
            let now = fixed_time("2026-03-02T12:00:00Z");
            let percent = compute_stats(&tasks, &now).percent_complete();
            prop_assert!(percent.is_finite());
            prop_assert!((0.0..=100.0).contains(&percent));
        }
    }
}

//! Status aggregation and dashboard figures.
//!
//! Counts and columns are always reported in board order
//! (To Do, In Progress, Review, Done) so charts render stably.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::Status;
use crate::leaderboard::win_rate;
use crate::task::Task;

/// Task count per status, indexed by [`Status::column`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts([usize; 4]);

impl StatusCounts {
    pub fn get(&self, status: Status) -> usize {
        self.0[status.column()]
    }

    /// `(status, count)` pairs in board order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        Status::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

pub fn aggregate_by_status(tasks: &[Task]) -> StatusCounts {
    let mut counts = [0usize; 4];
    for t in tasks {
        counts[t.status.column()] += 1;
    }
    StatusCounts(counts)
}

/// Kanban columns: tasks grouped by status, input order kept within each column.
pub fn group_by_status(tasks: &[Task]) -> [(Status, Vec<&Task>); 4] {
    Status::ALL.map(|s| (s, tasks.iter().filter(|t| t.status == s).collect()))
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    /// In Progress plus Review.
    pub wip: usize,
    pub delivered: usize,
    pub overdue: usize,
    /// Overdue share of all tasks, whole percent.
    pub delay_rate: u32,
}

pub fn dashboard_summary(tasks: &[Task], today: NaiveDate) -> DashboardSummary {
    let counts = aggregate_by_status(tasks);
    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
    DashboardSummary {
        total: counts.total(),
        wip: counts.get(Status::InProgress) + counts.get(Status::Review),
        delivered: counts.get(Status::Done),
        overdue,
        delay_rate: win_rate(overdue, counts.total()),
    }
}

/// Open tasks due today or later, soonest first.
pub fn upcoming_deadlines(tasks: &[Task], today: NaiveDate, limit: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.status.is_done() && t.due_date >= today)
        .collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming.truncate(limit);
    upcoming
}

/// Distinct tags with the number of tasks carrying each.
pub fn tag_counts(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for t in tasks {
        for tag in &t.tags {
            *counts.entry(tag.clone()).or_default() += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: &str, status: Status, due: &str) -> Task {
        Task::new(id.to_string(), status, "Alice", date(due))
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", Status::Done, "2024-06-01"),
            task("2", Status::ToDo, "2024-06-20"),
            task("3", Status::InProgress, "2024-06-05"),
            task("4", Status::ToDo, "2024-06-12"),
            task("5", Status::Done, "2024-06-30"),
            task("6", Status::ToDo, "2024-06-12"),
        ]
    }

    #[test]
    fn test_counts_in_board_order_with_zeros() {
        let counts = aggregate_by_status(&sample());
        let pairs: Vec<(Status, usize)> = counts.iter().collect();
        assert_eq!(
            pairs,
            vec![(Status::ToDo, 3), (Status::InProgress, 1), (Status::Review, 0), (Status::Done, 2)]
        );
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_empty_counts() {
        let counts = aggregate_by_status(&[]);
        assert_eq!(counts.iter().count(), 4);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_group_by_status_keeps_order() {
        let tasks = sample();
        let columns = group_by_status(&tasks);
        assert_eq!(columns[0].0, Status::ToDo);
        let todo: Vec<&str> = columns[0].1.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(todo, vec!["2", "4", "6"]);
        assert!(columns[2].1.is_empty());
    }

    #[test]
    fn test_dashboard_summary() {
        let s = dashboard_summary(&sample(), date("2024-06-10"));
        assert_eq!(s.total, 6);
        assert_eq!(s.wip, 1);
        assert_eq!(s.delivered, 2);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.delay_rate, 17);
        assert_eq!(dashboard_summary(&[], date("2024-06-10")).delay_rate, 0);
    }

    #[test]
    fn test_upcoming_deadlines_sorted_and_limited() {
        let tasks = sample();
        let ids: Vec<&str> = upcoming_deadlines(&tasks, date("2024-06-10"), 3)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["4", "6", "2"]);
    }

    #[test]
    fn test_tag_counts() {
        let mut tasks = sample();
        tasks[0].tags = vec!["seo".into(), "report".into()];
        tasks[1].tags = vec!["seo".into()];
        let counts = tag_counts(&tasks);
        assert_eq!(counts.get("seo"), Some(&2));
        assert_eq!(counts.get("report"), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}

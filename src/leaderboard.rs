//! Team performance leaderboard.
//!
//! Each member is scored on the tasks assigned to them by name:
//! 20 points per delivered task, 5 per open task, minus 30 per delayed task,
//! floored at zero. Members are ranked by score; equal scores keep roster order.
//!
//! Assignment matching is exact and case-sensitive on the member's display name,
//! so renaming a member detaches their existing tasks from the board.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::task::Task;
use crate::team::Member;

pub const DELIVERED_POINTS: i64 = 20;
pub const OPEN_POINTS: i64 = 5;
pub const DELAYED_PENALTY: i64 = 30;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPerformance {
    pub member_id: String,
    pub name: String,
    pub delivered: usize,
    pub open: usize,
    pub delayed: usize,
    pub score: u64,
    /// Percentage of assigned tasks that are done, 0..=100.
    pub win_rate: u32,
}

impl MemberPerformance {
    pub fn total(&self) -> usize {
        self.delivered + self.open
    }
}

/// `max(0, 20*delivered + 5*open - 30*delayed)`.
pub fn score(delivered: usize, open: usize, delayed: usize) -> u64 {
    let raw = delivered as i64 * DELIVERED_POINTS + open as i64 * OPEN_POINTS
        - delayed as i64 * DELAYED_PENALTY;
    raw.max(0) as u64
}

/// Share of delivered tasks as a whole percentage, rounding halves up. Zero tasks gives 0.
pub fn win_rate(delivered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((delivered * 100 + total / 2) / total) as u32
}

fn performance_for(member: &Member, tasks: &[Task], today: NaiveDate) -> MemberPerformance {
    let mut delivered = 0;
    let mut open = 0;
    let mut delayed = 0;
    for t in tasks.iter().filter(|t| t.assignee == member.name) {
        if t.status.is_done() {
            delivered += 1;
        } else {
            open += 1;
            if t.due_date < today {
                delayed += 1;
            }
        }
    }
    MemberPerformance {
        member_id: member.id.clone(),
        name: member.name.clone(),
        delivered,
        open,
        delayed,
        score: score(delivered, open, delayed),
        win_rate: win_rate(delivered, delivered + open),
    }
}

/// Rank every member by score, highest first. Ties keep the order of `members`.
pub fn compute_leaderboard(tasks: &[Task], members: &[Member], today: NaiveDate) -> Vec<MemberPerformance> {
    let mut board: Vec<MemberPerformance> = members
        .iter()
        .map(|m| performance_for(m, tasks, today))
        .collect();
    // sort_by is stable
    board.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(members = board.len(), tasks = tasks.len(), "computed leaderboard");
    board
}

/// Assignee names on tasks that match no member. These tasks never reach the leaderboard.
pub fn orphaned_assignees<'a>(tasks: &'a [Task], members: &[Member]) -> Vec<&'a str> {
    let mut names: Vec<&str> = tasks
        .iter()
        .map(|t| t.assignee.as_str())
        .filter(|a| !members.iter().any(|m| m.name == *a))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

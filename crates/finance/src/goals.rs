//! Savings goal progress.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Goal;

/// Slack, in percentage points, before a goal counts as behind.
const ON_TRACK_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub percentage: f64,
    /// Share of the created→target span already elapsed, in percent.
    pub expected_percentage: f64,
    pub on_track: bool,
    pub amount_remaining: f64,
    pub days_remaining: i64,
    pub weeks_remaining: i64,
    /// Weekly deposit that would close the gap by the target date.
    pub suggested_weekly: Option<f64>,
}

impl GoalProgress {
    pub fn compute(goal: &Goal, today: NaiveDate) -> Self {
        let percentage = if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            100.0
        };

        let total_days = (goal.target_date - goal.created_on).num_days();
        let days_passed = (today - goal.created_on).num_days().clamp(0, total_days.max(0));
        let expected_percentage = if total_days > 0 {
            days_passed as f64 / total_days as f64 * 100.0
        } else {
            100.0
        };

        let days_remaining = (goal.target_date - today).num_days().max(0);
        let weeks_remaining = (days_remaining + 6) / 7;
        let amount_remaining = (goal.target_amount - goal.current_amount).max(0.0);
        let suggested_weekly = (weeks_remaining > 0).then(|| amount_remaining / weeks_remaining as f64);

        Self {
            goal_id: goal.id.clone(),
            percentage,
            expected_percentage,
            on_track: percentage >= expected_percentage - ON_TRACK_TOLERANCE,
            amount_remaining,
            days_remaining,
            weeks_remaining,
            suggested_weekly,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.amount_remaining <= 0.0
    }
}

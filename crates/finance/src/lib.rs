//! Read-only personal-finance data behind [`FinanceRepository`], plus the
//! goal-progress and budget arithmetic the dashboards display.

pub mod budget;
pub mod demo;
pub mod details;
pub mod goals;
pub mod model;

pub use budget::{BudgetPlan, CategoryUsage, SpendingSummary};
pub use demo::DemoFinances;
pub use details::{AccountDetails, GOALS_ACCOUNT, GoalAllocation};
pub use goals::GoalProgress;
pub use model::{
    Account, Activity, BudgetCategory, FinanceRepository, Goal, SpendingCategory, Transaction,
    TransactionKind, total_balance,
};

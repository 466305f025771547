//! Monthly budget planning and spending summaries.

use serde::Serialize;
use tracing::debug;

use crate::model::{BudgetCategory, FinanceRepository, SpendingCategory};

/// Income plus per-category allocations for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlan {
    income: f64,
    categories: Vec<BudgetCategory>,
}

impl BudgetPlan {
    pub fn new(income: f64, categories: Vec<BudgetCategory>) -> Self {
        Self { income, categories }
    }

    pub fn from_repository(repo: &dyn FinanceRepository) -> Self {
        Self::new(repo.monthly_income(), repo.budget_categories())
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn categories(&self) -> &[BudgetCategory] {
        &self.categories
    }

    /// Replace the monthly income. Non-finite or non-positive values are
    /// rejected and leave the plan unchanged.
    pub fn set_income(&mut self, value: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            debug!(value, "Rejected monthly income");
            return false;
        }
        self.income = value;
        true
    }

    pub fn total_allocated(&self) -> f64 {
        self.categories.iter().map(|c| c.allocated).sum()
    }

    pub fn total_spent(&self) -> f64 {
        self.categories.iter().map(|c| c.spent).sum()
    }

    /// Income not yet allocated to a category. Negative when over-allocated.
    pub fn remaining_income(&self) -> f64 {
        self.income - self.total_allocated()
    }

    pub fn over_budget(&self) -> Vec<&BudgetCategory> {
        self.categories
            .iter()
            .filter(|c| c.spent > c.allocated)
            .collect()
    }

    /// The 50/30/20 split of income: needs, wants, savings.
    pub fn fifty_thirty_twenty(&self) -> (f64, f64, f64) {
        (self.income * 0.5, self.income * 0.3, self.income * 0.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryUsage {
    pub name: String,
    pub spent: f64,
    pub budget: f64,
    /// spent / budget in percent; 0 when there is no budget.
    pub percent_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_spent: f64,
    pub total_budget: f64,
    pub categories: Vec<CategoryUsage>,
}

impl SpendingSummary {
    pub fn from_categories(categories: &[SpendingCategory]) -> Self {
        let usage = categories
            .iter()
            .map(|c| CategoryUsage {
                name: c.name.clone(),
                spent: c.spent,
                budget: c.budget,
                percent_used: if c.budget > 0.0 {
                    c.spent / c.budget * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            total_spent: categories.iter().map(|c| c.spent).sum(),
            total_budget: categories.iter().map(|c| c.budget).sum(),
            categories: usage,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.total_budget - self.total_spent
    }
}

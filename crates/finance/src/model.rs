//! Finance domain types and the repository seam.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Product name, e.g. "High Yield Savings"
    pub kind: String,
    pub balance: f64,
    /// Masked, e.g. "****4891"
    pub account_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Debit,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub kind: TransactionKind,
    /// Exact [`Account::name`] the entry posted to
    pub account: String,
}

impl Transaction {
    /// Positive for credits, negative for debits.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

/// A dashboard "recent activity" line with a relative date label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub weekly_target: f64,
    pub created_on: NaiveDate,
    pub target_date: NaiveDate,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingCategory {
    pub name: String,
    pub spent: f64,
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
}

/// Read-only source of the user's finances.
pub trait FinanceRepository: Send + Sync {
    fn accounts(&self) -> Vec<Account>;

    fn recent_activity(&self) -> Vec<Activity>;

    /// Dashboard feed of recent spending, newest first.
    fn transactions(&self) -> Vec<Transaction>;

    /// Per-account ledgers, newest first within each account.
    fn account_history(&self) -> Vec<Transaction>;

    fn goals(&self) -> Vec<Goal>;

    fn spending_categories(&self) -> Vec<SpendingCategory>;

    fn budget_categories(&self) -> Vec<BudgetCategory>;

    fn monthly_income(&self) -> f64;

    fn account(&self, id: &str) -> Option<Account> {
        self.accounts().into_iter().find(|a| a.id == id)
    }

    /// Ledger entries for the account named exactly `account`.
    fn transactions_for(&self, account: &str) -> Vec<Transaction> {
        self.account_history()
            .into_iter()
            .filter(|t| t.account == account)
            .collect()
    }
}

pub fn total_balance(accounts: &[Account]) -> f64 {
    accounts.iter().map(|a| a.balance).sum()
}

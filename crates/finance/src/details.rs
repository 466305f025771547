//! Per-account drill-down: ledger, goal allocations and CSV export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Account, FinanceRepository, Transaction, TransactionKind};

/// The account that holds the money set aside for savings goals.
pub const GOALS_ACCOUNT: &str = "Savings Account";

const CSV_HEADER: &str = "Date,Description,Category,Amount,Type";

/// How much of the goals account one goal has claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAllocation {
    pub goal_id: String,
    pub name: String,
    pub amount: f64,
    /// Percent of the account balance.
    pub share_of_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub account: Account,
    pub transactions: Vec<Transaction>,
    /// Empty unless this is the goals account.
    pub goal_breakdown: Vec<GoalAllocation>,
    /// Balance left after goal allocations; goals account only.
    pub unallocated_savings: Option<f64>,
}

impl AccountDetails {
    /// Returns `None` for an unknown account id.
    pub fn load(repo: &dyn FinanceRepository, account_id: &str) -> Option<Self> {
        let account = repo.account(account_id)?;
        let transactions = repo.transactions_for(&account.name);

        let (goal_breakdown, unallocated_savings) = if account.name == GOALS_ACCOUNT {
            let breakdown: Vec<GoalAllocation> = repo
                .goals()
                .into_iter()
                .map(|goal| GoalAllocation {
                    share_of_balance: if account.balance > 0.0 {
                        goal.current_amount / account.balance * 100.0
                    } else {
                        0.0
                    },
                    goal_id: goal.id,
                    name: goal.name,
                    amount: goal.current_amount,
                })
                .collect();
            let allocated: f64 = breakdown.iter().map(|g| g.amount).sum();
            let unallocated = account.balance - allocated;
            (breakdown, Some(unallocated))
        } else {
            (Vec::new(), None)
        };

        Some(Self {
            account,
            transactions,
            goal_breakdown,
            unallocated_savings,
        })
    }

    /// Ledger as CSV: `Date,Description,Category,Amount,Type`, one row per
    /// entry, newest first.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.transactions.len() + 1);
        lines.push(CSV_HEADER.to_string());
        lines.extend(self.transactions.iter().map(csv_row));
        lines.join("\n")
    }

    /// e.g. `Savings_Account_transactions_2025-11-15.csv`
    pub fn csv_file_name(&self, today: NaiveDate) -> String {
        let stem = self.account.name.split_whitespace().collect::<Vec<_>>().join("_");
        format!("{stem}_transactions_{}.csv", today.format("%Y-%m-%d"))
    }
}

fn csv_row(t: &Transaction) -> String {
    let kind = match t.kind {
        TransactionKind::Debit => "debit",
        TransactionKind::Credit => "credit",
    };
    format!(
        "{},{},{},{:.2},{}",
        t.date.format("%Y-%m-%d"),
        quote(&t.description),
        quote(&t.category),
        t.amount,
        kind
    )
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoFinances;

    #[test]
    fn savings_account_shows_goal_allocations() {
        let details = AccountDetails::load(&DemoFinances, "2").unwrap();
        assert_eq!(details.account.name, GOALS_ACCOUNT);
        assert_eq!(details.transactions.len(), 6);
        assert_eq!(details.goal_breakdown.len(), 4);

        // 5234.50 - (1500 + 850 + 600 + 500)
        let unallocated = details.unallocated_savings.unwrap();
        assert!((unallocated - 1784.50).abs() < 1e-9);

        let emergency = &details.goal_breakdown[0];
        assert_eq!(emergency.name, "Emergency Fund");
        assert!((emergency.share_of_balance - 1500.0 / 5234.5 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn other_accounts_have_no_breakdown() {
        let details = AccountDetails::load(&DemoFinances, "1").unwrap();
        assert_eq!(details.transactions.len(), 12);
        assert!(details.goal_breakdown.is_empty());
        assert!(details.unallocated_savings.is_none());
    }

    #[test]
    fn unknown_account() {
        assert!(AccountDetails::load(&DemoFinances, "42").is_none());
    }

    #[test]
    fn csv_export() {
        let details = AccountDetails::load(&DemoFinances, "3").unwrap();
        let csv = details.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Date,Description,Category,Amount,Type");
        assert_eq!(lines[1], "2025-10-29,\"Monthly Contribution\",\"Transfer\",75.00,credit");
    }

    #[test]
    fn csv_escapes_quotes() {
        let row = csv_row(&Transaction {
            id: "x".into(),
            date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            description: "Books \"used\", cheap".into(),
            category: "Education".into(),
            amount: 12.5,
            kind: TransactionKind::Debit,
            account: GOALS_ACCOUNT.into(),
        });
        assert_eq!(row, "2025-11-01,\"Books \"\"used\"\", cheap\",\"Education\",12.50,debit");
    }

    #[test]
    fn csv_file_name_uses_underscores_and_date() {
        let details = AccountDetails::load(&DemoFinances, "3").unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        assert_eq!(details.csv_file_name(today), "Emergency_Fund_transactions_2025-11-15.csv");
    }
}

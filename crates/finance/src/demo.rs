//! Built-in demo data for a student's accounts.

use chrono::NaiveDate;

use crate::model::{
    Account, Activity, BudgetCategory, FinanceRepository, Goal, SpendingCategory, Transaction,
    TransactionKind,
};

/// Static fixture repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoFinances;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Fixture dates are literal and valid.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn account(id: &str, name: &str, kind: &str, balance: f64, number: &str) -> Account {
    Account {
        id: id.into(),
        name: name.into(),
        kind: kind.into(),
        balance,
        account_number: number.into(),
    }
}

const CHECKING: &str = "Checking Account";
const SAVINGS: &str = "Savings Account";
const EMERGENCY: &str = "Emergency Fund";

fn tx(
    id: &str,
    date: NaiveDate,
    description: &str,
    category: &str,
    amount: f64,
    kind: TransactionKind,
    account: &str,
) -> Transaction {
    Transaction {
        id: id.into(),
        date,
        description: description.into(),
        category: category.into(),
        amount,
        kind,
        account: account.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn goal(
    id: &str,
    name: &str,
    target_amount: f64,
    current_amount: f64,
    weekly_target: f64,
    created_on: NaiveDate,
    target_date: NaiveDate,
    category: &str,
) -> Goal {
    Goal {
        id: id.into(),
        name: name.into(),
        target_amount,
        current_amount,
        weekly_target,
        created_on,
        target_date,
        category: category.into(),
    }
}

impl FinanceRepository for DemoFinances {
    fn accounts(&self) -> Vec<Account> {
        vec![
            account("1", CHECKING, "Student Checking", 2847.32, "****4891"),
            account("2", SAVINGS, "High Yield Savings", 5234.50, "****7623"),
            account("3", EMERGENCY, "Savings", 1500.00, "****9012"),
        ]
    }

    fn recent_activity(&self) -> Vec<Activity> {
        let item = |kind, description: &str, amount, when: &str| Activity {
            kind,
            description: description.into(),
            amount,
            when: when.into(),
        };
        vec![
            item(TransactionKind::Credit, "Part-time Job Deposit", 450.00, "2 days ago"),
            item(TransactionKind::Debit, "Starbucks", 6.75, "3 days ago"),
            item(TransactionKind::Credit, "Scholarship Payment", 1200.00, "1 week ago"),
        ]
    }

    fn transactions(&self) -> Vec<Transaction> {
        use TransactionKind::{Credit, Debit};
        let oct = |d| date(2025, 10, d);
        vec![
            tx("1", oct(12), "Part-time Job - Campus Library", "Income", 450.00, Credit, CHECKING),
            tx("2", oct(11), "Transfer to Savings", "Transfer", 200.00, Debit, CHECKING),
            tx("3", oct(11), "Amazon - Textbooks", "Education", 89.99, Debit, CHECKING),
            tx("4", oct(10), "Starbucks", "Food & Dining", 6.75, Debit, CHECKING),
            tx("5", oct(9), "Target - Groceries", "Shopping", 45.32, Debit, CHECKING),
            tx("6", oct(9), "Uber - Ride to Campus", "Transportation", 12.50, Debit, CHECKING),
            tx("7", oct(8), "Netflix Subscription", "Entertainment", 15.99, Debit, CHECKING),
            tx("8", oct(7), "Chipotle", "Food & Dining", 13.45, Debit, CHECKING),
            tx("9", oct(6), "Rent Payment", "Housing", 800.00, Debit, CHECKING),
            tx("10", oct(5), "Scholarship Deposit", "Income", 1200.00, Credit, CHECKING),
            tx("11", oct(5), "Transfer to Emergency Fund", "Transfer", 300.00, Debit, CHECKING),
            tx("12", oct(4), "Spotify Premium", "Entertainment", 10.99, Debit, CHECKING),
            tx("13", oct(3), "Gas Station", "Transportation", 35.00, Debit, CHECKING),
            tx("14", oct(3), "Transfer from Savings", "Transfer", 50.00, Credit, CHECKING),
            tx("15", oct(2), "Apple - App Store", "Shopping", 4.99, Debit, CHECKING),
        ]
    }

    fn account_history(&self) -> Vec<Transaction> {
        use TransactionKind::{Credit, Debit};
        let oct = |d| date(2025, 10, d);
        let nov = |d| date(2025, 11, d);
        vec![
            tx("1", nov(4), "Part-time Job - Campus Library", "Income", 450.00, Credit, CHECKING),
            tx("2", nov(3), "Amazon - Textbooks", "Education", 89.99, Debit, CHECKING),
            tx("3", nov(2), "Starbucks", "Food & Dining", 6.75, Debit, CHECKING),
            tx("4", nov(1), "Target - Groceries", "Shopping", 45.32, Debit, CHECKING),
            tx("5", nov(1), "Uber - Ride to Campus", "Transportation", 12.50, Debit, CHECKING),
            tx("6", oct(31), "Netflix Subscription", "Entertainment", 15.99, Debit, CHECKING),
            tx("7", oct(30), "Chipotle", "Food & Dining", 13.45, Debit, CHECKING),
            tx("8", oct(29), "Rent Payment", "Housing", 800.00, Debit, CHECKING),
            tx("9", oct(28), "Scholarship Deposit", "Income", 1200.00, Credit, CHECKING),
            tx("10", oct(27), "Spotify Premium", "Entertainment", 10.99, Debit, CHECKING),
            tx("11", oct(26), "Gas Station", "Transportation", 35.00, Debit, CHECKING),
            tx("12", oct(25), "Apple - App Store", "Shopping", 4.99, Debit, CHECKING),
            tx("13", nov(1), "Transfer from Checking", "Transfer", 200.00, Credit, SAVINGS),
            tx("14", oct(25), "Transfer from Checking", "Transfer", 150.00, Credit, SAVINGS),
            tx("15", oct(18), "Transfer from Checking", "Transfer", 200.00, Credit, SAVINGS),
            tx("16", oct(15), "Interest Payment", "Income", 12.50, Credit, SAVINGS),
            tx("17", oct(11), "Transfer from Checking", "Transfer", 175.00, Credit, SAVINGS),
            tx("18", oct(4), "Transfer from Checking", "Transfer", 200.00, Credit, SAVINGS),
            tx("19", oct(29), "Monthly Contribution", "Transfer", 75.00, Credit, EMERGENCY),
            tx("20", oct(22), "Weekly Contribution", "Transfer", 75.00, Credit, EMERGENCY),
            tx("21", oct(15), "Weekly Contribution", "Transfer", 75.00, Credit, EMERGENCY),
            tx("22", oct(8), "Weekly Contribution", "Transfer", 75.00, Credit, EMERGENCY),
            tx("23", oct(1), "Weekly Contribution", "Transfer", 75.00, Credit, EMERGENCY),
        ]
    }

    fn goals(&self) -> Vec<Goal> {
        vec![
            goal("1", "Emergency Fund", 3000.00, 1500.00, 75.00, date(2025, 8, 15), date(2026, 2, 15), "Savings"),
            goal("2", "Spring Break Trip", 1200.00, 850.00, 50.00, date(2025, 9, 1), date(2026, 3, 1), "Travel"),
            goal("3", "New Laptop", 1500.00, 600.00, 60.00, date(2025, 10, 1), date(2026, 1, 1), "Technology"),
            goal("4", "Summer Internship Fund", 2000.00, 500.00, 40.00, date(2025, 9, 15), date(2026, 5, 1), "Career"),
        ]
    }

    fn spending_categories(&self) -> Vec<SpendingCategory> {
        [
            ("Housing", 800.00, 800.00),
            ("Food & Dining", 267.53, 300.00),
            ("Shopping", 140.30, 200.00),
            ("Transportation", 95.50, 150.00),
            ("Education", 89.99, 100.00),
            ("Entertainment", 26.98, 50.00),
        ]
        .into_iter()
        .map(|(name, spent, budget)| SpendingCategory {
            name: name.into(),
            spent,
            budget,
        })
        .collect()
    }

    fn budget_categories(&self) -> Vec<BudgetCategory> {
        [
            ("Housing", 800.00, 800.00),
            ("Food & Dining", 300.00, 267.53),
            ("Transportation", 150.00, 95.50),
            ("Shopping", 200.00, 140.30),
            ("Entertainment", 50.00, 26.98),
            ("Education", 100.00, 89.99),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (name, allocated, spent))| BudgetCategory {
            id: (i + 1).to_string(),
            name: name.into(),
            allocated,
            spent,
        })
        .collect()
    }

    fn monthly_income(&self) -> f64 {
        1650.00
    }
}

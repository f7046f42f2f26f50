use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Aggregated totals and recent activity from `/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "totalBalance", default)]
    pub total_balance: f64,
    #[serde(rename = "totalIncome", default)]
    pub total_income: f64,
    #[serde(rename = "totalExpense", default)]
    pub total_expense: f64,
    #[serde(rename = "recent5Income", default)]
    pub recent_incomes: Vec<Transaction>,
    #[serde(rename = "recent5Expense", default)]
    pub recent_expenses: Vec<Transaction>,
    #[serde(rename = "recentTransactions", default)]
    pub recent_transactions: Vec<Transaction>,
}

impl DashboardSummary {
    /// Share of income already spent, as a percentage. `None` with no income.
    pub fn spent_ratio(&self) -> Option<f64> {
        if self.total_income > 0.0 {
            Some(self.total_expense / self.total_income * 100.0)
        } else {
            None
        }
    }
}

//! Data models for budgetbaba entities.
//!
//! This module contains the request and response types exchanged with
//! the budget API:
//!
//! - `UserProfile`, `LoginRequest`, `LoginResponse`, `RegisterRequest`: accounts
//! - `Category`, `CategoryRequest`, `CategoryType`: income/expense categories
//! - `Transaction`, `NewTransaction`: incomes and expenses
//! - `DashboardSummary`: totals and recent activity
//! - `FilterRequest`: server-side search over transactions
//! - `ReportRequest`, `MessageResponse`: emailed reports

pub mod category;
pub mod dashboard;
pub mod filter;
pub mod report;
pub mod transaction;
pub mod user;

pub use category::{filter_by_type, Category, CategoryRequest, CategoryType};
pub use dashboard::DashboardSummary;
pub use filter::{FilterRequest, SortField, SortOrder};
pub use report::{MessageResponse, ReportRequest};
pub use transaction::{total_amount, CategorySummary, NewTransaction, Transaction, TransactionKind};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};

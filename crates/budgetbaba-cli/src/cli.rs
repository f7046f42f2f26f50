//! Command line definitions.

use std::path::PathBuf;

use budgetbaba_core::models::{CategoryType, SortField, SortOrder, TransactionKind};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "budgetbaba")]
#[command(about = "Track incomes, expenses and categories from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and remember the session on this machine
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Profile photo to upload
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Check that the API is reachable
    Health,
    /// Totals and recent activity
    Dashboard,
    /// Manage income and expense categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage incomes
    Incomes {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Search transactions by date range and keyword
    Filter(FilterArgs),
    /// Email a report of incomes or expenses to yourself
    Report {
        /// income or expense
        kind: TransactionKind,
    },
    /// Upload an image and print its hosted URL (for icons)
    Upload { file: PathBuf },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        #[arg(long = "type")]
        kind: Option<CategoryType>,
    },
    /// Add a category
    Add {
        name: String,
        #[arg(long = "type", default_value = "income")]
        kind: CategoryType,
        /// Icon URL
        #[arg(long)]
        icon: Option<String>,
    },
    /// Update a category; omitted fields keep their current value
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        kind: Option<CategoryType>,
        #[arg(long)]
        icon: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TransactionAction {
    /// List all records
    List,
    /// Add a record
    Add {
        name: String,
        amount: f64,
        /// Category id
        #[arg(long)]
        category: Option<i64>,
        /// Day of the transaction (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Icon URL
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a record
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct FilterArgs {
    #[arg(long = "type", default_value = "income")]
    pub kind: TransactionKind,
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long, default_value = "date")]
    pub sort: SortField,
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,
    #[arg(long, default_value = "")]
    pub keyword: String,
}

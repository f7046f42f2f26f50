//! One function per subcommand. Each returns an error for the shell to
//! report; success is announced here.

pub mod account;
pub mod categories;
pub mod overview;
pub mod transactions;

/// Capitalized label for a transaction kind, for messages
pub(crate) fn label(kind: budgetbaba_core::models::TransactionKind) -> &'static str {
    use budgetbaba_core::models::TransactionKind;
    match kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expense",
    }
}

//! Terminal output: notifications on stderr, tables on stdout.

pub mod notify;
pub mod table;

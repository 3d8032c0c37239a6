//! Core data models for cashflow
//!
//! Transaction records, the ordered store that holds them, money amounts and
//! reporting periods.

pub mod money;
pub mod period;
pub mod store;
pub mod transaction;

pub use money::Money;
pub use period::{DateWindow, Month};
pub use store::TransactionStore;
pub use transaction::{
    Description, RecordField, TransactionRecord, OTHER_EXPENSES, OTHER_INCOME, UNSET_CATEGORY,
};

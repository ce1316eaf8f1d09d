//! tally-core: record types shared by every Tally crate

pub mod money;
pub mod record;
pub mod statement;

pub use money::{format_money, group_thousands};
pub use record::{TransactionRecord, TxnType};
pub use statement::Statement;

//! Deposits and withdrawals recorded against savings goals.
//!
//! The transaction table is append-only. Rows are never updated or deleted,
//! so a goal's balance is always the sum of its full history.

mod core;
mod create_endpoint;
mod form;

pub use core::{
    Transaction, TransactionKind, append_transaction, create_transaction_table, current_balance,
    list_transactions,
};
pub use create_endpoint::{CreateTransactionEndpointState, create_transaction_endpoint};
pub(crate) use form::transaction_form;

//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The entry form and its validation
//! - View handlers and endpoints for creating, viewing, editing and deleting transactions

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod detail_page;
mod edit_endpoint;
mod edit_page;
mod form;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionType, create_transaction,
    create_transaction_table, delete_transaction, delete_transaction_at, get_all_transactions,
    get_transaction, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use detail_page::get_transaction_detail_page;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;

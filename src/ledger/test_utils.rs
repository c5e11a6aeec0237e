//! Transaction fixtures for the ledger tests.

use time::Date;

use crate::{
    category::{Category, CategoryName},
    transaction::{Transaction, TransactionId, TransactionType},
};

fn categorized(
    id: TransactionId,
    amount: f64,
    type_: TransactionType,
    date: Date,
    category_name: &str,
) -> Transaction {
    Transaction {
        category: Some(Category {
            // Give each distinct name a stable ID so equal names compare equal.
            id: category_name.bytes().map(i64::from).sum(),
            name: CategoryName::new_unchecked(category_name),
            icon: None,
        }),
        ..uncategorized(id, amount, type_, date)
    }
}

pub fn income(id: TransactionId, amount: f64, date: Date, category_name: &str) -> Transaction {
    categorized(id, amount, TransactionType::Income, date, category_name)
}

pub fn expense(id: TransactionId, amount: f64, date: Date, category_name: &str) -> Transaction {
    categorized(id, amount, TransactionType::Expense, date, category_name)
}

pub fn uncategorized(
    id: TransactionId,
    amount: f64,
    type_: TransactionType,
    date: Date,
) -> Transaction {
    Transaction {
        id,
        amount,
        date,
        note: format!("transaction #{id}"),
        type_,
        category: None,
    }
}

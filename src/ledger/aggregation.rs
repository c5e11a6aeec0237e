//! Income, expense and balance totals over a set of transactions.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// Summed amounts for a set of transactions.
///
/// The sums are kept at full `f64` precision. Rounding to two decimal places
/// only happens when the totals are displayed, see [crate::html::format_amount].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts, as a non-negative magnitude.
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
}

impl Totals {
    fn from_sums(income: f64, expenses: f64) -> Self {
        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// Sum the income and expenses in `transactions`.
///
/// An empty input gives all-zero totals.
pub fn aggregate<'a, I>(transactions: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = 0.0;
    let mut expenses = 0.0;

    for transaction in transactions {
        match transaction.type_ {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expenses += transaction.amount,
        }
    }

    Totals::from_sums(income, expenses)
}

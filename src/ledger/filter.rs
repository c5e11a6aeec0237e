//! Narrowing a transaction snapshot down to the current filter selection.

use crate::{
    ledger::MonthBucket,
    transaction::{Transaction, TransactionType},
};

/// The month, category and type a user has chosen to view.
///
/// A `None` field places no constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// The calendar month a transaction's date must fall within.
    pub month: Option<MonthBucket>,
    /// Compared case-sensitively against the transaction's category name.
    pub category: Option<String>,
    /// Income or expense.
    pub type_: Option<TransactionType>,
}

impl FilterSelection {
    /// A selection that matches every transaction.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.category.is_none() && self.type_.is_none()
    }

    /// Whether `transaction` satisfies every constrained dimension.
    ///
    /// Uncategorized transactions never match a category constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let matches_month = self
            .month
            .is_none_or(|month| month.contains(transaction.date));

        let matches_category = self.category.as_deref().is_none_or(|wanted| {
            transaction
                .category
                .as_ref()
                .is_some_and(|category| category.name.as_str() == wanted)
        });

        let matches_type = self.type_.is_none_or(|type_| type_ == transaction.type_);

        matches_month && matches_category && matches_type
    }
}

/// Keep the transactions that match `selection`, in their original order.
///
/// A selection naming a month, category or type that no longer exists in the
/// data simply yields an empty list.
pub fn filter_transactions<'a, I>(
    transactions: I,
    selection: &FilterSelection,
) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|transaction| selection.matches(transaction))
        .collect()
}

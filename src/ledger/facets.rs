//! The distinct months, categories and types present in a transaction set.
//!
//! These populate the filter pickers, so every value offered to the user is
//! one that at least one transaction actually has.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    ledger::MonthBucket,
    transaction::{Transaction, TransactionType},
};

/// The values available for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Most recent month first.
    pub months: Vec<MonthBucket>,
    /// Sorted by ordinal (byte-wise, case-sensitive) order.
    pub categories: Vec<String>,
    /// Sorted by name.
    pub types: Vec<TransactionType>,
}

impl Facets {
    /// True when there are no transactions to offer any value for.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty() && self.categories.is_empty() && self.types.is_empty()
    }
}

/// Derive the facets for `transactions`.
///
/// Uncategorized transactions contribute a month and a type but no category.
/// Category names that differ only by case are kept as separate entries.
pub fn facets<'a, I>(transactions: I) -> Facets
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut months = HashSet::new();
    let mut categories = HashSet::new();
    let mut types = HashSet::new();

    for transaction in transactions {
        months.insert(MonthBucket::from_date(transaction.date));
        types.insert(transaction.type_);

        if let Some(ref category) = transaction.category {
            categories.insert(category.name.as_str());
        }
    }

    let mut months: Vec<_> = months.into_iter().collect();
    months.sort_by(|a, b| b.cmp(a));

    let mut categories: Vec<_> = categories.into_iter().map(str::to_owned).collect();
    categories.sort();

    let mut types: Vec<_> = types.into_iter().collect();
    types.sort_by_key(|type_| type_.as_str());

    Facets {
        months,
        categories,
        types,
    }
}

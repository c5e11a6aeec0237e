//! Partitioning transactions into calendar months for the history list.

use std::{cmp::Reverse, collections::BTreeMap};

use serde::Serialize;

use crate::{
    ledger::{MonthBucket, Totals, aggregate},
    transaction::Transaction,
};

/// The transactions that fall within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup<'a> {
    /// The month every transaction in the group falls within.
    pub month: MonthBucket,
    /// Income and expense subtotals for just this month.
    pub totals: Totals,
    /// Most recent first.
    pub transactions: Vec<&'a Transaction>,
}

/// Group `transactions` by month, most recent month first.
///
/// The input does not need to be sorted. Transactions within a month are
/// ordered by date, most recent first, with same-day transactions keeping
/// their relative input order. Months without transactions are never
/// returned.
pub fn group_by_month<'a, I>(transactions: I) -> Vec<MonthGroup<'a>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<MonthBucket, Vec<&'a Transaction>> = BTreeMap::new();

    for transaction in transactions {
        buckets
            .entry(MonthBucket::from_date(transaction.date))
            .or_default()
            .push(transaction);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(month, mut transactions)| {
            // `sort_by_key` is stable, so same-day entries keep their input order.
            transactions.sort_by_key(|transaction| Reverse(transaction.date));

            MonthGroup {
                month,
                totals: aggregate(transactions.iter().copied()),
                transactions,
            }
        })
        .collect()
}

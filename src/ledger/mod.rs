//! The aggregation, filtering and grouping engine behind the dashboard.
//!
//! Everything in here is a pure function over a snapshot of transactions read
//! from the database. Nothing is stored and nothing can fail: a filter
//! selection that no longer matches anything simply produces empty results.
//!
//! The dashboard pipeline is:
//! - snapshot → [facets] for the filter pickers
//! - snapshot → [filter_transactions] → [aggregate] and [group_by_month]

mod aggregation;
mod facets;
mod filter;
mod grouping;
mod month;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregation::{Totals, aggregate};
pub use facets::{Facets, facets};
pub use filter::{FilterSelection, filter_transactions};
pub use grouping::{MonthGroup, group_by_month};
pub use month::MonthBucket;

use serde::Serialize;

use crate::transaction::Transaction;

/// Everything the dashboard needs to render one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary<'a> {
    /// Derived from the whole snapshot, not the filtered subset, so the
    /// pickers always offer every value that exists.
    pub facets: Facets,
    /// Totals over the filtered subset.
    pub totals: Totals,
    /// The filtered subset grouped by month.
    pub groups: Vec<MonthGroup<'a>>,
}

/// Run the full pipeline over `transactions` for `selection`.
pub fn summarize<'a>(
    transactions: &'a [Transaction],
    selection: &FilterSelection,
) -> LedgerSummary<'a> {
    let filtered = filter_transactions(transactions, selection);

    LedgerSummary {
        facets: facets(transactions),
        totals: aggregate(filtered.iter().copied()),
        groups: group_by_month(filtered),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        ledger::{
            FilterSelection, MonthBucket, Totals, summarize,
            test_utils::{expense, income},
        },
        transaction::{Transaction, TransactionType},
    };

    #[test]
    fn empty_snapshot_gives_empty_summary() {
        let transactions: Vec<Transaction> = Vec::new();

        let got = summarize(&transactions, &FilterSelection::all());

        assert!(got.facets.is_empty());
        assert_eq!(got.totals, Totals::default());
        assert!(got.groups.is_empty());
    }

    #[test]
    fn facets_ignore_the_selection() {
        let transactions = vec![
            income(1, 50.0, date!(2024 - 01 - 10), "Salary"),
            expense(2, 20.0, date!(2024 - 01 - 15), "Food"),
        ];
        let selection = FilterSelection {
            type_: Some(TransactionType::Expense),
            ..Default::default()
        };

        let got = summarize(&transactions, &selection);

        assert_eq!(got.facets.categories, vec!["Food", "Salary"]);
        assert_eq!(
            got.facets.types,
            vec![TransactionType::Expense, TransactionType::Income]
        );
        assert_eq!(
            got.totals,
            Totals {
                income: 0.0,
                expenses: 20.0,
                balance: -20.0,
            }
        );
        assert_eq!(got.groups.len(), 1);
        assert_eq!(got.groups[0].transactions, vec![&transactions[1]]);
    }

    #[test]
    fn month_without_matches_gives_zero_totals_and_no_groups() {
        let transactions = vec![
            income(1, 50.0, date!(2024 - 01 - 10), "Salary"),
            expense(2, 20.0, date!(2024 - 01 - 15), "Food"),
        ];
        let selection = FilterSelection {
            month: Some(MonthBucket::from_date(date!(2024 - 06 - 01))),
            ..Default::default()
        };

        let got = summarize(&transactions, &selection);

        assert_eq!(got.totals, Totals::default());
        assert!(got.groups.is_empty());
        assert_eq!(got.facets.months.len(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let transactions = vec![expense(7, 20.0, date!(2024 - 01 - 15), "Food")];

        let got = summarize(&transactions, &FilterSelection::all());
        let json = serde_json::to_value(&got).expect("could not serialize summary");

        assert_eq!(json["facets"]["months"], serde_json::json!(["2024-01"]));
        assert_eq!(json["facets"]["types"], serde_json::json!(["Expense"]));
        assert_eq!(json["totals"]["balance"], serde_json::json!(-20.0));
        assert_eq!(json["groups"][0]["month"], serde_json::json!("2024-01"));
        assert_eq!(
            json["groups"][0]["transactions"][0]["id"],
            serde_json::json!(7)
        );
        assert_eq!(
            json["groups"][0]["transactions"][0]["type"],
            serde_json::json!("Expense")
        );
        assert_eq!(
            json["groups"][0]["transactions"][0]["category"]["name"],
            serde_json::json!("Food")
        );
    }
}

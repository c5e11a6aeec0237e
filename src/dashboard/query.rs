//! The dashboard's filter query parameters.

use serde::Deserialize;

use crate::{
    Error,
    ledger::{FilterSelection, MonthBucket},
    transaction::TransactionType,
};

/// The raw `month`, `category` and `type` query parameters.
///
/// An absent or empty parameter means "All" for that dimension.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct DashboardQuery {
    /// A month in the `YYYY-MM` form.
    pub month: Option<String>,
    /// An exact, case-sensitive category name.
    pub category: Option<String>,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl DashboardQuery {
    /// Parse the query into a [FilterSelection].
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] or [Error::InvalidTransactionType] for
    /// malformed values. A well-formed value that matches no transactions is
    /// not an error.
    pub fn into_selection(self) -> Result<FilterSelection, Error> {
        let month = non_empty(self.month)
            .map(|month| month.parse::<MonthBucket>())
            .transpose()?;

        let type_ = non_empty(self.type_)
            .map(|type_| {
                TransactionType::from_form_value(&type_)
                    .ok_or(Error::InvalidTransactionType(type_))
            })
            .transpose()?;

        Ok(FilterSelection {
            month,
            category: non_empty(self.category),
            type_,
        })
    }
}

/// The query string that reproduces `selection`, without the leading "?".
///
/// Unconstrained dimensions are left out, so [FilterSelection::all] gives an
/// empty string.
pub fn selection_query_string(selection: &FilterSelection) -> String {
    let month = selection.month.map(|month| month.as_query_value());
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(3);

    if let Some(ref month) = month {
        pairs.push(("month", month.as_str()));
    }

    if let Some(ref category) = selection.category {
        pairs.push(("category", category.as_str()));
    }

    if let Some(type_) = selection.type_ {
        pairs.push(("type", type_.as_form_value()));
    }

    serde_urlencoded::to_string(&pairs)
        .inspect_err(|error| tracing::error!("Could not encode filter selection: {error}"))
        .unwrap_or_default()
}

/// The URL of `route` filtered to `selection`.
pub fn selection_url(route: &str, selection: &FilterSelection) -> String {
    let query = selection_query_string(selection);

    if query.is_empty() {
        route.to_owned()
    } else {
        format!("{route}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{
        Error,
        ledger::{FilterSelection, MonthBucket},
        transaction::TransactionType,
    };

    use super::{DashboardQuery, selection_url};

    fn query(month: &str, category: &str, type_: &str) -> DashboardQuery {
        DashboardQuery {
            month: Some(month.to_owned()),
            category: Some(category.to_owned()),
            type_: Some(type_.to_owned()),
        }
    }

    #[test]
    fn empty_values_mean_all() {
        assert_eq!(query("", "", "").into_selection(), Ok(FilterSelection::all()));
        assert_eq!(
            DashboardQuery::default().into_selection(),
            Ok(FilterSelection::all())
        );
    }

    #[test]
    fn parses_every_dimension() {
        let selection = query("2024-01", "Food", "expense")
            .into_selection()
            .expect("Could not parse query");

        assert_eq!(
            selection,
            FilterSelection {
                month: Some(MonthBucket::new(2024, Month::January).unwrap()),
                category: Some("Food".to_owned()),
                type_: Some(TransactionType::Expense),
            }
        );
    }

    #[test]
    fn category_is_kept_verbatim() {
        let selection = query("", "food", "").into_selection().unwrap();

        assert_eq!(selection.category.as_deref(), Some("food"));
    }

    #[test]
    fn rejects_malformed_month() {
        assert_eq!(
            query("January", "", "").into_selection(),
            Err(Error::InvalidMonth("January".to_owned()))
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            query("", "", "transfer").into_selection(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn rejects_legacy_and_mixed_case_types() {
        for raw in ["outcome", "Expenses", "EXPENSE", "Income"] {
            assert_eq!(
                query("", "", raw).into_selection(),
                Err(Error::InvalidTransactionType(raw.to_owned())),
                "parsing {raw:?}"
            );
        }
    }

    #[test]
    fn url_round_trips_through_query() {
        let selection = FilterSelection {
            month: Some(MonthBucket::new(2024, Month::February).unwrap()),
            category: Some("Eating Out & Bars".to_owned()),
            type_: Some(TransactionType::Income),
        };

        let url = selection_url("/dashboard", &selection);

        assert_eq!(
            url,
            "/dashboard?month=2024-02&category=Eating+Out+%26+Bars&type=income"
        );
        let query_string = url.split_once('?').unwrap().1;
        let parsed: DashboardQuery = serde_urlencoded::from_str(query_string).unwrap();
        assert_eq!(parsed.into_selection(), Ok(selection));
    }

    #[test]
    fn unfiltered_url_has_no_query() {
        assert_eq!(
            selection_url("/dashboard", &FilterSelection::all()),
            "/dashboard"
        );
    }
}

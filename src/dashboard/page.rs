//! The dashboard page: balance, income and expense totals, filter pickers and
//! the month-grouped history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, EXPENSE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        INCOME_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_amount,
    },
    ledger::{Facets, FilterSelection, LedgerSummary, Totals, summarize},
    navigation::NavBar,
    transaction::get_all_transactions,
};

use super::{
    history::history_view,
    query::{DashboardQuery, selection_url},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the balance and history for the filter selection in the query string.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let selection = query.into_selection()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    // The snapshot is all the page needs, so release the lock before rendering.
    drop(connection);

    let summary = summarize(&transactions, &selection);
    let redirect_url = selection_url(endpoints::DASHBOARD_VIEW, &selection);

    Ok(dashboard_view(&summary, &selection, &redirect_url).into_response())
}

fn dashboard_view(
    summary: &LedgerSummary<'_>,
    selection: &FilterSelection,
    redirect_url: &str,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-6"
            {
                (totals_view(&summary.totals))
                (filter_form_view(&summary.facets, selection))
                (history_view(&summary.groups, redirect_url))
            }
        }
    };

    base("Dashboard", &content)
}

fn totals_view(totals: &Totals) -> Markup {
    html! {
        section id="totals" class="space-y-4"
        {
            h1 class="text-2xl font-bold" data-balance="true"
            {
                "Balance: " (format_amount(totals.balance))
            }

            div class="grid grid-cols-2 gap-4"
            {
                div class=(CARD_STYLE) data-income="true"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                    p class={ "text-xl font-semibold " (INCOME_STYLE) } { (format_amount(totals.income)) }
                }

                div class=(CARD_STYLE) data-expenses="true"
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                    p class={ "text-xl font-semibold " (EXPENSE_STYLE) } { (format_amount(totals.expenses)) }
                }
            }
        }
    }
}

/// Append `selected` to `options` if none of them has its value.
///
/// A filter value can outlive the last transaction that had it, and the
/// picker must still show that value as the active choice.
fn with_selected(mut options: Vec<(String, String)>, selected: Option<(String, String)>) -> Vec<(String, String)> {
    if let Some((value, text)) = selected {
        if !options.iter().any(|(option, _)| *option == value) {
            options.push((value, text));
        }
    }

    options
}

/// One `<option>` per value, after an "All" option with an empty value.
fn picker_view(name: &str, label: &str, options: &[(String, String)], selected: Option<&str>) -> Markup {
    html! {
        div class="flex-1 min-w-32"
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected.is_none()] { "All" }

                @for (value, text) in options {
                    option value=(value) selected[selected == Some(value.as_str())] { (text) }
                }
            }
        }
    }
}

fn filter_form_view(facets: &Facets, selection: &FilterSelection) -> Markup {
    let months = with_selected(
        facets
            .months
            .iter()
            .map(|month| (month.as_query_value(), month.to_string()))
            .collect(),
        selection
            .month
            .map(|month| (month.as_query_value(), month.to_string())),
    );
    let categories = with_selected(
        facets
            .categories
            .iter()
            .map(|category| (category.clone(), category.clone()))
            .collect(),
        selection
            .category
            .as_ref()
            .map(|category| (category.clone(), category.clone())),
    );
    let types = with_selected(
        facets
            .types
            .iter()
            .map(|type_| (type_.as_form_value().to_owned(), type_.to_string()))
            .collect(),
        selection
            .type_
            .map(|type_| (type_.as_form_value().to_owned(), type_.to_string())),
    );

    let selected_month = selection.month.map(|month| month.as_query_value());
    let selected_type = selection.type_.map(|type_| type_.as_form_value());

    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            (picker_view("month", "Month", &months, selected_month.as_deref()))
            (picker_view("category", "Category", &categories, selection.category.as_deref()))
            (picker_view("type", "Type", &types, selected_type))

            div class="flex items-center gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

                @if !selection.is_empty() {
                    a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}

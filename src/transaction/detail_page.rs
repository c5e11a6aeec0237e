//! The read-only page showing every field of a single transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::amount_style,
    endpoints::{self, format_endpoint},
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_amount},
    navigation::NavBar,
    redirect::RedirectQuery,
    transaction::{Transaction, TransactionId, core::get_transaction},
};

/// The state needed for the transaction details page.
#[derive(Debug, Clone)]
pub struct TransactionDetailState {
    /// The database connection for reading the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDetailState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn detail_row(label: &str, value: Markup) -> Markup {
    html! {
        div class="flex justify-between gap-4 py-2"
        {
            dt class="text-gray-500 dark:text-gray-400" { (label) }
            dd class="text-right font-medium" data-field=(label.to_lowercase()) { (value) }
        }
    }
}

fn transaction_detail_view(transaction: &Transaction, edit_url: &str, back_url: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTION_VIEW).into_html();
    let note = if transaction.note.trim().is_empty() {
        "-"
    } else {
        transaction.note.as_str()
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class={ "max-w-md space-y-4 " (CARD_STYLE) }
            {
                h1 class="text-xl font-bold" { "Transaction Details" }

                dl class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    (detail_row("Category", html! {
                        @match transaction.category {
                            Some(ref category) => {
                                @if let Some(ref icon) = category.icon {
                                    (icon) " "
                                }
                                (category.name)
                            },
                            None => "None",
                        }
                    }))
                    (detail_row("Date", html! { (transaction.date) }))
                    (detail_row("Amount", html! {
                        span class=(amount_style(transaction.type_)) { (format_amount(transaction.amount)) }
                    }))
                    (detail_row("Type", html! { (transaction.type_) }))
                    (detail_row("Note", html! { (note) }))
                }

                div class="flex justify-between"
                {
                    a href=(back_url) class=(LINK_STYLE) { "Back" }
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }
            }
        }
    };

    base("Transaction Details", &content)
}

/// Renders the details of a transaction, or the 404 page if it does not exist.
pub async fn get_transaction_detail_page(
    State(state): State<TransactionDetailState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response, Error> {
    let transaction = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transaction(transaction_id, &connection)?
    };

    let edit_url =
        query.forward_to(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id));
    let back_url = query.target_or(endpoints::DASHBOARD_VIEW);

    Ok(transaction_detail_view(&transaction, &edit_url, &back_url).into_response())
}

//! Defines the route handler for the page for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    redirect::RedirectQuery,
    transaction::{
        TransactionId,
        core::get_transaction,
        form::{FormAction, TransactionForm, transaction_form_view},
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_transaction_view(
    update_endpoint: &str,
    cancel_url: &str,
    form: &TransactionForm,
    categories: &[Category],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Edit Transaction" }

                (transaction_form_view(FormAction::Edit(update_endpoint), form, categories, ""))

                a href=(cancel_url) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Transaction", &content)
}

/// Renders the page for editing a transaction, or the 404 page if it does not exist.
///
/// The `redirect_url` query parameter is passed on to the update endpoint so
/// the user ends up back where they started.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response, Error> {
    let (transaction, categories) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transaction = get_transaction(transaction_id, &connection)?;
        let categories = get_all_categories(&connection)
            .inspect_err(|error| tracing::error!("could not get categories: {error}"))?;

        (transaction, categories)
    };

    let update_endpoint =
        query.forward_to(format_endpoint(endpoints::TRANSACTION_API, transaction_id));
    let cancel_url = query.target_or(endpoints::DASHBOARD_VIEW);

    Ok(edit_transaction_view(
        &update_endpoint,
        &cancel_url,
        &TransactionForm::from_transaction(&transaction),
        &categories,
    )
    .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        db::initialize,
        redirect::RedirectQuery,
        test_utils::{
            assert_form_input_with_value, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{Transaction, TransactionType, core::create_transaction},
    };

    use super::{EditTransactionPageState, get_edit_transaction_page};

    fn get_test_state() -> EditTransactionPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let food = create_category(CategoryName::new_unchecked("Food"), None, &connection).unwrap();
        create_transaction(
            Transaction::build(12.5, TransactionType::Expense, date!(2024 - 02 - 03), "Lunch")
                .category_id(Some(food.id)),
            &connection,
        )
        .unwrap();

        EditTransactionPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn form_is_filled_with_transaction() {
        let state = get_test_state();

        let response = get_edit_transaction_page(
            State(state),
            Path(1),
            Query(RedirectQuery {
                redirect_url: Some("/dashboard?month=2024-02".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            "/api/transactions/1?redirect_url=%2Fdashboard%3Fmonth%3D2024-02",
            "hx-put",
        );
        assert_form_submit_button_with_text(&form, "Save Changes");
        assert_form_input_with_value(&form, "amount", "text", "12.5");
        assert_form_input_with_value(&form, "note", "text", "Lunch");
        assert_form_input_with_value(&form, "date", "date", "2024-02-03");

        let selected: Vec<String> = form
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .map(|option| option.text().collect())
            .collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].contains("Food"), "got {selected:?}");

        let cancel = html
            .select(&Selector::parse("a[href='/dashboard?month=2024-02']").unwrap())
            .next();
        assert!(cancel.is_some(), "No cancel link back to the dashboard");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let state = get_test_state();

        let result =
            get_edit_transaction_page(State(state), Path(42), Query(RedirectQuery::default())).await;

        assert_eq!(result.as_ref().err(), Some(&Error::NotFound));
        assert_eq!(
            result.unwrap_err().into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}

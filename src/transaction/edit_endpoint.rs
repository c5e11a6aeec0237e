//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    AppState, Error,
    category::get_all_categories,
    endpoints::{self, format_endpoint},
    redirect::RedirectQuery,
    transaction::{
        Transaction, TransactionId,
        core::update_transaction,
        form::{FormAction, TransactionFields, TransactionForm, transaction_form_view},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the fields of a transaction.
///
/// Redirects to `redirect_url` on success, or the dashboard if none was given.
/// An invalid form is sent back with its error message and status 422.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Query(query): Query<RedirectQuery>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let categories = match get_all_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not get categories: {error}");
            return error.into_alert_response();
        }
    };

    let fields = match form.validate(&categories) {
        Ok(fields) => fields,
        Err(error) => {
            let update_endpoint =
                query.forward_to(format_endpoint(endpoints::TRANSACTION_API, transaction_id));

            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                transaction_form_view(
                    FormAction::Edit(&update_endpoint),
                    &form,
                    &categories,
                    &error.to_string(),
                ),
            )
                .into_response();
        }
    };

    match save_transaction(transaction_id, fields, &connection) {
        Ok(transaction) => {
            tracing::info!("Updated transaction {}", transaction.id);
            (
                HxRedirect(query.target_or(endpoints::DASHBOARD_VIEW)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Update the transaction and create its new category, if one was named, together.
fn save_transaction(
    id: TransactionId,
    fields: TransactionFields,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let builder = fields.into_builder(&sql_transaction)?;
    let transaction = update_transaction(id, builder, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(transaction)
}

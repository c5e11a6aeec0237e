//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    AppState, Error,
    category::get_all_categories,
    endpoints,
    transaction::{
        Transaction,
        core::create_transaction,
        form::{FormAction, TransactionFields, TransactionForm, transaction_form_view},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the dashboard on success.
///
/// An invalid form is sent back with its error message and status 422.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
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
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                transaction_form_view(FormAction::Create, &form, &categories, &error.to_string()),
            )
                .into_response();
        }
    };

    match save_new_transaction(fields, &connection) {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

/// Create the transaction and, if one was named, its new category.
///
/// Either both are saved or neither is.
fn save_new_transaction(
    fields: TransactionFields,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let builder = fields.into_builder(&sql_transaction)?;
    let transaction = create_transaction(builder, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(transaction)
}

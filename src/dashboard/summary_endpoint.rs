//! JSON access to the same facets, totals and groups the dashboard renders.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use crate::{Error, ledger::summarize, transaction::get_all_transactions};

use super::{DashboardState, query::DashboardQuery};

/// Respond with the ledger summary for the filter selection in the query string.
pub async fn get_summary(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let selection = query.into_selection()?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    Ok(Json(summarize(&transactions, &selection)).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        db::initialize,
        test_utils::assert_content_type,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{DashboardQuery, DashboardState, get_summary};

    async fn must_get_json(state: DashboardState, query: DashboardQuery) -> Value {
        let response = get_summary(State(state), Query(query)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");

        serde_json::from_slice(&body).expect("Could not parse JSON")
    }

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        for (amount, type_, date) in [
            (50.0, TransactionType::Income, date!(2024 - 01 - 10)),
            (20.0, TransactionType::Expense, date!(2024 - 01 - 15)),
            (5.0, TransactionType::Expense, date!(2024 - 02 - 01)),
        ] {
            create_transaction(Transaction::build(amount, type_, date, "test"), &connection)
                .unwrap();
        }

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn summarizes_everything_without_filters() {
        let json = must_get_json(get_test_state(), DashboardQuery::default()).await;

        assert_eq!(json["totals"]["income"], 50.0);
        assert_eq!(json["totals"]["expenses"], 25.0);
        assert_eq!(json["totals"]["balance"], 25.0);
        assert_eq!(json["facets"]["months"], serde_json::json!(["2024-02", "2024-01"]));
        assert_eq!(json["groups"].as_array().unwrap().len(), 2);
        assert_eq!(json["groups"][0]["month"], "2024-02");
    }

    #[tokio::test]
    async fn filters_by_month() {
        let query = DashboardQuery {
            month: Some("2024-01".to_owned()),
            ..Default::default()
        };

        let json = must_get_json(get_test_state(), query).await;

        assert_eq!(json["totals"]["balance"], 30.0);
        assert_eq!(json["groups"].as_array().unwrap().len(), 1);
        // Facets still cover the whole data set.
        assert_eq!(json["facets"]["months"].as_array().unwrap().len(), 2);
    }
}

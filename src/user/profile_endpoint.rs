//! Defines the endpoint for renaming the profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error, endpoints,
    user::{profile_page::name_form_view, update_user_name},
};

use super::ProfileState;

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
}

/// Rename the profile and redirect back to the profile page.
///
/// An empty name re-renders the form with an error message.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_user_name(&form.name, &connection) {
        Ok(user) => {
            tracing::info!("Renamed profile to \"{}\"", user.name);
            (
                HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::EmptyUserName) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            name_form_view(&form.name, &error.to_string()),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update profile name: {error}");
            error.into_alert_response()
        }
    }
}

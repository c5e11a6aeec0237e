//! Uploading and serving the profile picture.

use axum::{
    extract::{Multipart, State, multipart::Field},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    user::{Avatar, get_user_avatar, update_user_avatar},
};

use super::ProfileState;

/// The name of the file input on the profile page.
const AVATAR_FIELD_NAME: &str = "avatar";

/// Save the image in the `avatar` field of a multipart form as the profile picture.
pub async fn upload_avatar_endpoint(
    State(state): State<ProfileState>,
    mut multipart: Multipart,
) -> Response {
    let avatar = match read_avatar(&mut multipart).await {
        Ok(avatar) => avatar,
        Err(error) => {
            tracing::error!("Could not read avatar upload: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_user_avatar(&avatar.bytes, &avatar.content_type, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not save avatar: {error}");
            error.into_alert_response()
        }
    }
}

/// Respond with the profile picture as it was uploaded.
pub async fn get_avatar(State(state): State<ProfileState>) -> Result<Response, Error> {
    let avatar = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_avatar(&connection)?
    };

    match avatar {
        Some(avatar) => Ok((
            [
                (header::CONTENT_TYPE, avatar.content_type),
                (header::CACHE_CONTROL, "no-cache".to_owned()),
            ],
            avatar.bytes,
        )
            .into_response()),
        None => Err(Error::NotFound),
    }
}

async fn read_avatar(multipart: &mut Multipart) -> Result<Avatar, Error> {
    loop {
        let field = multipart.next_field().await.map_err(|error| {
            tracing::error!("Could not read multipart form field: {error}");
            Error::MultipartError(error.body_text())
        })?;

        match field {
            Some(field) if field.name() == Some(AVATAR_FIELD_NAME) => {
                return parse_avatar_field(field).await;
            }
            Some(field) => {
                tracing::debug!("Ignoring multipart field {:?}", field.name());
            }
            None => {
                return Err(Error::MultipartError(format!(
                    "the form has no \"{AVATAR_FIELD_NAME}\" file"
                )));
            }
        }
    }
}

async fn parse_avatar_field(field: Field<'_>) -> Result<Avatar, Error> {
    // A missing content type is left for `update_user_avatar` to reject.
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();
    let file_name = field.file_name().unwrap_or_default().to_owned();

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!(
        "Received avatar '{file_name}' of type {content_type} that is {} bytes",
        bytes.len()
    );

    Ok(Avatar {
        bytes,
        content_type,
    })
}

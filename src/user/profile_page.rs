//! The profile page: avatar, name and the full transaction history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    dashboard::history_view,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    ledger::group_by_month,
    navigation::NavBar,
    transaction::get_all_transactions,
    user::{User, get_user},
};

const MEMBER_SINCE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none] [month repr:long] [year]");

/// The state needed for the profile page and its endpoints.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for the profile and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the profile along with every transaction ever recorded.
pub async fn get_profile_page(State(state): State<ProfileState>) -> Result<Response, Error> {
    let (user, transactions) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let user = get_user(&connection)
            .inspect_err(|error| tracing::error!("could not get user profile: {error}"))?;
        let transactions = get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

        (user, transactions)
    };

    let groups = group_by_month(&transactions);

    let content = html! {
        (NavBar::new(endpoints::PROFILE_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-6"
            {
                section class={ (CARD_STYLE) " flex flex-col items-center gap-4 sm:flex-row sm:items-start" }
                {
                    (avatar_view(&user))

                    div class="w-full space-y-4"
                    {
                        div
                        {
                            h1 class="text-2xl font-bold" data-user-name="true" { (user.name) }
                            @if let Ok(since) = user.created_at.format(MEMBER_SINCE_FORMAT) {
                                p class="text-sm text-gray-500 dark:text-gray-400" { "Member since " (since) }
                            }
                        }

                        (name_form_view(&user.name, ""))
                        (avatar_form_view())
                    }
                }

                (history_view(&groups, endpoints::PROFILE_VIEW))
            }
        }
    };

    Ok(base("Profile", &content).into_response())
}

/// The first letter of up to the first two words of `name`, e.g. "Jane Doe" → "JD".
fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.graphemes(true).next())
        .collect::<String>()
        .to_uppercase()
}

fn avatar_view(user: &User) -> Markup {
    html! {
        @if user.has_avatar {
            img
                src=(endpoints::AVATAR)
                alt="Avatar"
                class="w-24 h-24 shrink-0 rounded-full object-cover";
        } @else {
            div
                data-avatar-placeholder="true"
                aria-hidden="true"
                class="flex w-24 h-24 shrink-0 items-center justify-center rounded-full
                    bg-blue-100 text-3xl font-semibold text-blue-700
                    dark:bg-blue-900 dark:text-blue-200"
            {
                (initials(&user.name))
            }
        }
    }
}

/// The form for changing the profile name, with an optional error message.
pub(crate) fn name_form_view(name: &str, error_message: &str) -> Markup {
    html! {
        form
            hx-put=(endpoints::PROFILE_API)
            hx-target-error="#alert-container"
            hx-target-422="this"
            hx-swap="outerHTML"
            class="w-full space-y-2"
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                value=(name)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Name" }
        }
    }
}

fn avatar_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::AVATAR_API)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-2"
        {
            label for="avatar" class=(FORM_LABEL_STYLE) { "Avatar" }

            input
                id="avatar"
                type="file"
                name="avatar"
                accept="image/*"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload Avatar" }
        }
    }
}

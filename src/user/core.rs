//! The singleton user profile and its database queries.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use time::OffsetDateTime;

use crate::Error;

/// The name given to the profile when the app is first started.
pub const DEFAULT_USER_NAME: &str = "New User";

/// The ID of the only row in the user table.
const USER_ID: i64 = 1;

/// The person using the app.
///
/// There is exactly one user per database. The avatar image is loaded
/// separately with [get_user_avatar] since it is only needed when serving the
/// image itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The display name.
    pub name: String,
    /// Whether an avatar image has been uploaded.
    pub has_avatar: bool,
    /// When the profile was first created.
    pub created_at: OffsetDateTime,
}

/// An uploaded profile picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    /// The raw image data.
    pub bytes: Vec<u8>,
    /// The MIME type the image was uploaded with, e.g. "image/png".
    pub content_type: String,
}

/// Create the profile if it does not exist yet and return it.
///
/// Calling this again leaves an existing profile untouched.
pub fn ensure_default_user(connection: &Connection) -> Result<User, Error> {
    let rows_inserted = connection.execute(
        "INSERT OR IGNORE INTO user (id, name, created_at) VALUES (?1, ?2, ?3)",
        (USER_ID, DEFAULT_USER_NAME, OffsetDateTime::now_utc()),
    )?;

    if rows_inserted > 0 {
        tracing::info!("Created default user profile");
    }

    get_user(connection)
}

/// Get the profile.
///
/// # Errors
/// Returns [Error::NotFound] if [ensure_default_user] has not been called.
pub fn get_user(connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT name, avatar IS NOT NULL, created_at FROM user WHERE id = :id",
        )?
        .query_one(&[(":id", &USER_ID)], map_user_row)
        .map_err(|error| error.into())
}

/// Change the profile name.
///
/// Surrounding whitespace is removed.
///
/// # Errors
/// Returns [Error::EmptyUserName] if `name` is empty or only whitespace.
pub fn update_user_name(name: &str, connection: &Connection) -> Result<User, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyUserName);
    }

    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1 WHERE id = ?2",
        (name, USER_ID),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_user(connection)
}

/// Replace the profile picture.
///
/// # Errors
/// Returns [Error::InvalidAvatar] if `bytes` is empty or `content_type` is
/// not an image type.
pub fn update_user_avatar(
    bytes: &[u8],
    content_type: &str,
    connection: &Connection,
) -> Result<(), Error> {
    if !content_type.starts_with("image/") {
        return Err(Error::InvalidAvatar(format!(
            "expected an image but got a file of type \"{content_type}\""
        )));
    }

    if bytes.is_empty() {
        return Err(Error::InvalidAvatar("the image is empty".to_owned()));
    }

    let rows_affected = connection.execute(
        "UPDATE user SET avatar = ?1, avatar_content_type = ?2 WHERE id = ?3",
        (bytes, content_type, USER_ID),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::debug!("Saved {} byte {content_type} avatar", bytes.len());

    Ok(())
}

/// Get the profile picture, or `None` if one has not been uploaded.
pub fn get_user_avatar(connection: &Connection) -> Result<Option<Avatar>, Error> {
    let avatar = connection
        .query_row(
            "SELECT avatar, avatar_content_type FROM user
             WHERE id = ?1 AND avatar IS NOT NULL",
            [USER_ID],
            |row| {
                Ok(Avatar {
                    bytes: row.get(0)?,
                    content_type: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(avatar)
}

/// Create the user table in the database.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                name TEXT NOT NULL,
                avatar BLOB,
                avatar_content_type TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        name: row.get(0)?,
        has_avatar: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{
        Avatar, DEFAULT_USER_NAME, ensure_default_user, get_user, get_user_avatar,
        update_user_avatar, update_user_name,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn get_user_before_default_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_user(&conn), Err(Error::NotFound));
    }

    #[test]
    fn ensure_default_user_creates_profile() {
        let conn = get_test_connection();

        let user = ensure_default_user(&conn).expect("Could not create user");

        assert_eq!(user.name, DEFAULT_USER_NAME);
        assert!(!user.has_avatar);
    }

    #[test]
    fn ensure_default_user_is_idempotent() {
        let conn = get_test_connection();
        let first = ensure_default_user(&conn).unwrap();
        update_user_name("Alice", &conn).unwrap();

        let second = ensure_default_user(&conn).unwrap();

        assert_eq!(second.name, "Alice");
        assert_eq!(second.created_at, first.created_at);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM user", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn update_name_trims_whitespace() {
        let conn = get_test_connection();
        ensure_default_user(&conn).unwrap();

        let user = update_user_name("  Bob \n", &conn).expect("Could not update name");

        assert_eq!(user.name, "Bob");
    }

    #[test]
    fn update_name_rejects_empty_name() {
        let conn = get_test_connection();
        ensure_default_user(&conn).unwrap();

        assert_eq!(update_user_name(" ", &conn), Err(Error::EmptyUserName));
        assert_eq!(get_user(&conn).unwrap().name, DEFAULT_USER_NAME);
    }

    #[test]
    fn avatar_round_trips() {
        let conn = get_test_connection();
        ensure_default_user(&conn).unwrap();
        assert_eq!(get_user_avatar(&conn), Ok(None));

        update_user_avatar(&[1, 2, 3], "image/png", &conn).expect("Could not save avatar");

        assert_eq!(
            get_user_avatar(&conn),
            Ok(Some(Avatar {
                bytes: vec![1, 2, 3],
                content_type: "image/png".to_owned(),
            }))
        );
        assert!(get_user(&conn).unwrap().has_avatar);
    }

    #[test]
    fn avatar_must_be_a_non_empty_image() {
        let conn = get_test_connection();
        ensure_default_user(&conn).unwrap();

        let not_image = update_user_avatar(&[1, 2, 3], "text/plain", &conn);
        let empty = update_user_avatar(&[], "image/jpeg", &conn);

        assert!(matches!(not_image, Err(Error::InvalidAvatar(_))));
        assert!(matches!(empty, Err(Error::InvalidAvatar(_))));
        assert_eq!(get_user_avatar(&conn), Ok(None));
    }
}

//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name,
///   ignoring case, already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    icon: Option<&str>,
    connection: &Connection,
) -> Result<Category, Error> {
    if find_category_by_name(name.as_str(), connection)?.is_some() {
        return Err(Error::DuplicateCategoryName(name.to_string()));
    }

    connection
        .execute(
            "INSERT INTO category (name, icon) VALUES (?1, ?2);",
            (name.as_str(), icon),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    tracing::debug!("Created category {id} \"{name}\"");

    Ok(Category {
        id,
        name,
        icon: icon.map(str::to_owned),
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, icon FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, icon FROM category ORDER BY name ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Find the category called `name`, ignoring case and surrounding whitespace.
///
/// SQLite's `NOCASE` collation only folds ASCII letters, so the comparison is
/// done here instead.
pub fn find_category_by_name(
    name: &str,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    let categories = get_all_categories(connection)?;

    Ok(categories
        .into_iter()
        .find(|category| category.name.eq_ignore_case(name)))
}

/// Get the category called `name`, creating it if it does not exist yet.
///
/// Used when a transaction is saved with a category name typed by the user.
pub fn resolve_or_create_category(
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    match find_category_by_name(name.as_str(), connection)? {
        Some(category) => Ok(category),
        None => create_category(name, None, connection),
    }
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            icon TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let icon = row.get(2)?;

    Ok(Category { id, name, icon })
}

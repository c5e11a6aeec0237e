//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, de};
use time::Date;

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether money was earned or spent.
///
/// The amount of a transaction is always stored as a non-negative magnitude,
/// the sign comes from the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The canonical name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// The lowercase form used for form and query values.
    pub fn as_form_value(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse the exact lowercase form produced by [TransactionType::as_form_value].
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Parse a stored transaction type, ignoring case.
    ///
    /// "Outcome" and "Expenses" were used for expenses by older versions of
    /// the app and are still accepted. User input goes through
    /// [TransactionType::from_form_value] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" | "expenses" | "outcome" => Ok(TransactionType::Expense),
            _ => Err(format!("\"{s}\" is not a valid transaction type")),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        TransactionType::from_form_value(&raw).ok_or_else(|| {
            de::Error::custom(format!("\"{raw}\" is not a valid transaction type"))
        })
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always zero or more.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub note: String,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The category the transaction belongs to, `None` if uncategorized.
    pub category: Option<Category>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        type_: TransactionType,
        date: Date,
        note: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            type_,
            date,
            note: note.to_owned(),
            category_id: None,
        }
    }
}

/// A builder for creating and replacing [Transaction] rows.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, TransactionType};
///
/// let builder = Transaction::build(
///         45.99,
///         TransactionType::Expense,
///         date!(2025-01-15),
///         "Coffee beans",
///     )
///     .category_id(Some(2));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// This is a magnitude, e.g. a $12.50 lunch is `12.5` with
    /// [TransactionType::Expense].
    pub amount: f64,

    /// Whether the amount was earned or spent.
    pub type_: TransactionType,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable note about the transaction.
    pub note: String,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category_id: Option<CategoryId>,
}

impl TransactionBuilder {
    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str = "SELECT t.id, t.amount, t.date, t.note, t.type, c.id, c.name, c.icon
    FROM \"transaction\" t
    LEFT JOIN category c ON c.id = t.category_id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if specified category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\" (amount, date, note, type, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                builder.amount,
                builder.date,
                &builder.note,
                builder.type_,
                builder.category_id,
            ),
        )
        .map_err(|error| map_category_error(error, builder.category_id))?;

    let id = connection.last_insert_rowid();

    tracing::debug!("Created {} transaction {id}", builder.type_);

    get_transaction(id, connection)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE t.id = :id"))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction with its category, most recent first.
///
/// Transactions on the same date are ordered by most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace every field of the transaction `id` with the values in `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidCategory] if specified category ID does not refer to a real category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET amount = ?1, date = ?2, note = ?3, type = ?4, category_id = ?5
             WHERE id = ?6",
            (
                builder.amount,
                builder.date,
                &builder.note,
                builder.type_,
                builder.category_id,
                id,
            ),
        )
        .map_err(|error| map_category_error(error, builder.category_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, connection)
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction at position `index` in the order given by
/// [get_all_transactions] and return its ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `index` is past the last transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction_at(index: usize, connection: &Connection) -> Result<TransactionId, Error> {
    let offset = i64::try_from(index).map_err(|_| Error::DeleteMissingTransaction)?;

    let id: TransactionId = connection
        .prepare(
            "SELECT id FROM \"transaction\" ORDER BY date DESC, id DESC LIMIT 1 OFFSET ?1",
        )?
        .query_one([offset], |row| row.get(0))
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::DeleteMissingTransaction,
            error => error.into(),
        })?;

    delete_transaction(id, connection)?;

    Ok(id)
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount >= 0),
                date TEXT NOT NULL,
                note TEXT NOT NULL,
                type TEXT NOT NULL,
                category_id INTEGER,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a row selected with the transaction columns followed by the category
/// columns to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let note = row.get(3)?;
    let type_ = row.get(4)?;

    let category_id: Option<CategoryId> = row.get(5)?;
    let category = match category_id {
        Some(category_id) => {
            let raw_name: String = row.get(6)?;

            Some(Category {
                id: category_id,
                name: CategoryName::new_unchecked(&raw_name),
                icon: row.get(7)?,
            })
        }
        None => None,
    };

    Ok(Transaction {
        id,
        amount,
        date,
        note,
        type_,
        category,
    })
}

fn map_category_error(error: rusqlite::Error, category_id: Option<CategoryId>) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

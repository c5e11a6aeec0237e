//! The transaction entry form shared by the create and edit pages, and the
//! validation that runs before anything is written to the database.

use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error, endpoints,
    category::{Category, CategoryId, CategoryName, resolve_or_create_category},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    transaction::{Transaction, TransactionBuilder, TransactionType},
};

/// The value of the category select option for creating a new category.
pub const NEW_CATEGORY_OPTION: &str = "new";

/// The raw form data for creating or editing a transaction.
///
/// Everything except the type and date is kept as the user typed it so the
/// form can be shown again unchanged when validation fails.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionForm {
    pub type_: TransactionType,
    /// A positive decimal number, with either a dot or a comma as the decimal separator.
    pub amount: String,
    pub date: Date,
    #[serde(default)]
    pub note: String,
    /// Empty for no category, a category ID, or [NEW_CATEGORY_OPTION].
    #[serde(default)]
    pub category: String,
    /// The name of the category to create when `category` is [NEW_CATEGORY_OPTION].
    #[serde(default)]
    pub new_category_name: String,
}

/// Why a submitted transaction form was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid amount.")]
    InvalidAmount,
    #[error("Note cannot be empty.")]
    EmptyNote,
    #[error("Category name cannot be empty.")]
    EmptyCategoryName,
    #[error("This category already exists.")]
    DuplicateCategory,
    #[error("Please choose a valid category.")]
    UnknownCategory,
}

/// Which category a validated form refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryChoice {
    None,
    Existing(CategoryId),
    /// A category that does not exist yet and is created when the form is saved.
    New(CategoryName),
}

/// A transaction form that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub type_: TransactionType,
    pub amount: f64,
    pub date: Date,
    pub note: String,
    pub category: CategoryChoice,
}

impl TransactionForm {
    /// An empty expense form dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            type_: TransactionType::Expense,
            amount: String::new(),
            date: today,
            note: String::new(),
            category: String::new(),
            new_category_name: String::new(),
        }
    }

    /// A form filled in with the values of `transaction`.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            type_: transaction.type_,
            amount: transaction.amount.to_string(),
            date: transaction.date,
            note: transaction.note.clone(),
            category: transaction
                .category
                .as_ref()
                .map(|category| category.id.to_string())
                .unwrap_or_default(),
            new_category_name: String::new(),
        }
    }

    /// Check the form against the rules for a transaction.
    ///
    /// `categories` are the categories that currently exist. A new category
    /// name must not match any of them, ignoring case.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found, checking the amount, then
    /// the note, then the category.
    pub fn validate(&self, categories: &[Category]) -> Result<TransactionFields, ValidationError> {
        let amount = parse_amount(&self.amount).ok_or(ValidationError::InvalidAmount)?;

        let note = self.note.trim();
        if note.is_empty() {
            return Err(ValidationError::EmptyNote);
        }

        let category = match self.category.trim() {
            "" => CategoryChoice::None,
            NEW_CATEGORY_OPTION => {
                let name = CategoryName::new(&self.new_category_name)
                    .map_err(|_| ValidationError::EmptyCategoryName)?;

                if categories
                    .iter()
                    .any(|category| category.name.eq_ignore_case(name.as_str()))
                {
                    return Err(ValidationError::DuplicateCategory);
                }

                CategoryChoice::New(name)
            }
            id => {
                let id: CategoryId = id.parse().map_err(|_| ValidationError::UnknownCategory)?;

                if !categories.iter().any(|category| category.id == id) {
                    return Err(ValidationError::UnknownCategory);
                }

                CategoryChoice::Existing(id)
            }
        };

        Ok(TransactionFields {
            type_: self.type_,
            amount,
            date: self.date,
            note: note.to_owned(),
            category,
        })
    }
}

/// Parse a strictly positive, finite amount. Commas are read as decimal points.
fn parse_amount(raw: &str) -> Option<f64> {
    let amount: f64 = raw.trim().replace(',', ".").parse().ok()?;

    (amount.is_finite() && amount > 0.0).then_some(amount)
}

impl TransactionFields {
    /// Turn the fields into a builder, creating the new category if one was named.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the category could not be created.
    pub fn into_builder(self, connection: &Connection) -> Result<TransactionBuilder, Error> {
        let category_id = match self.category {
            CategoryChoice::None => None,
            CategoryChoice::Existing(id) => Some(id),
            CategoryChoice::New(name) => Some(resolve_or_create_category(name, connection)?.id),
        };

        Ok(
            Transaction::build(self.amount, self.type_, self.date, &self.note)
                .category_id(category_id),
        )
    }
}

/// Where a transaction form is submitted to.
#[derive(Debug, Clone, Copy)]
pub enum FormAction<'a> {
    /// POST to the create endpoint.
    Create,
    /// PUT to the given update endpoint, which may include a query string.
    Edit(&'a str),
}

/// Render the whole transaction form.
///
/// Validation failures come back with status 422 and replace the form with a
/// copy that shows `error_message`. Other errors go to the alert container.
pub fn transaction_form_view(
    action: FormAction<'_>,
    form: &TransactionForm,
    categories: &[Category],
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create => (Some(endpoints::TRANSACTIONS_API), None, "Add Transaction"),
        FormAction::Edit(endpoint) => (None, Some(endpoint), "Save Changes"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            hx-target-422="this"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            (transaction_form_fields(form, categories))

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

fn type_radio(form: &TransactionForm, type_: TransactionType) -> Markup {
    let id = format!("transaction-type-{}", type_.as_form_value());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type_"
                id=(id)
                type="radio"
                value=(type_.as_form_value())
                checked[form.type_ == type_]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (type_) }
        }
    }
}

fn transaction_form_fields(form: &TransactionForm, categories: &[Category]) -> Markup {
    let selected_category = form.category.trim();

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (type_radio(form, TransactionType::Expense))
                (type_radio(form, TransactionType::Income))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                name="amount"
                id="amount"
                type="text"
                inputmode="decimal"
                placeholder="0.00"
                value=(form.amount)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(form.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="note" class=(FORM_LABEL_STYLE) { "Note" }

            input
                name="note"
                id="note"
                type="text"
                placeholder="What was it for?"
                value=(form.note)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected_category.is_empty()] { "None" }

                @for category in categories {
                    @let id = category.id.to_string();
                    option value=(id) selected[selected_category == id] {
                        @if let Some(ref icon) = category.icon {
                            (icon) " "
                        }
                        (category.name)
                    }
                }

                option
                    value=(NEW_CATEGORY_OPTION)
                    selected[selected_category == NEW_CATEGORY_OPTION]
                {
                    "New category…"
                }
            }
        }

        div
        {
            label for="new_category_name" class=(FORM_LABEL_STYLE) { "New category name" }

            input
                name="new_category_name"
                id="new_category_name"
                type="text"
                placeholder="Only used for a new category"
                value=(form.new_category_name)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod validation_tests {
    use time::macros::date;

    use crate::{
        category::{Category, CategoryName},
        transaction::TransactionType,
    };

    use super::{CategoryChoice, TransactionFields, TransactionForm, ValidationError};

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Food"),
                icon: None,
            },
            Category {
                id: 2,
                name: CategoryName::new_unchecked("Salary"),
                icon: Some("💰".to_owned()),
            },
        ]
    }

    fn form(amount: &str, note: &str, category: &str, new_category_name: &str) -> TransactionForm {
        TransactionForm {
            type_: TransactionType::Expense,
            amount: amount.to_owned(),
            date: date!(2024 - 01 - 15),
            note: note.to_owned(),
            category: category.to_owned(),
            new_category_name: new_category_name.to_owned(),
        }
    }

    #[test]
    fn accepts_valid_form() {
        let got = form("20", " Groceries ", "1", "").validate(&categories());

        assert_eq!(
            got,
            Ok(TransactionFields {
                type_: TransactionType::Expense,
                amount: 20.0,
                date: date!(2024 - 01 - 15),
                note: "Groceries".to_owned(),
                category: CategoryChoice::Existing(1),
            })
        );
    }

    #[test]
    fn reads_comma_as_decimal_point() {
        let got = form("12,5", "Lunch", "", "").validate(&categories()).unwrap();

        assert_eq!(got.amount, 12.5);
        assert_eq!(got.category, CategoryChoice::None);
    }

    #[test]
    fn rejects_bad_amounts() {
        for amount in ["", "abc", "0", "0.00", "-5", "NaN", "inf", "1.2.3"] {
            assert_eq!(
                form(amount, "Lunch", "", "").validate(&categories()),
                Err(ValidationError::InvalidAmount),
                "for amount {amount:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_note() {
        assert_eq!(
            form("1", "   ", "", "").validate(&categories()),
            Err(ValidationError::EmptyNote)
        );
    }

    #[test]
    fn amount_is_checked_before_note() {
        assert_eq!(
            form("", "", "", "").validate(&categories()),
            Err(ValidationError::InvalidAmount)
        );
    }

    #[test]
    fn new_category_needs_a_name() {
        assert_eq!(
            form("1", "Lunch", "new", "  ").validate(&categories()),
            Err(ValidationError::EmptyCategoryName)
        );
    }

    #[test]
    fn new_category_must_not_exist_ignoring_case() {
        assert_eq!(
            form("1", "Lunch", "new", "fOOD").validate(&categories()),
            Err(ValidationError::DuplicateCategory)
        );
    }

    #[test]
    fn accepts_new_category() {
        let got = form("1", "Lunch", "new", " Eating Out ")
            .validate(&categories())
            .unwrap();

        assert_eq!(
            got.category,
            CategoryChoice::New(CategoryName::new_unchecked("Eating Out"))
        );
    }

    #[test]
    fn rejects_unknown_category() {
        for category in ["99", "food"] {
            assert_eq!(
                form("1", "Lunch", category, "").validate(&categories()),
                Err(ValidationError::UnknownCategory),
                "for category {category:?}"
            );
        }
    }

    #[test]
    fn error_messages() {
        let cases = [
            (ValidationError::InvalidAmount, "Please enter a valid amount."),
            (ValidationError::EmptyNote, "Note cannot be empty."),
            (ValidationError::EmptyCategoryName, "Category name cannot be empty."),
            (ValidationError::DuplicateCategory, "This category already exists."),
            (ValidationError::UnknownCategory, "Please choose a valid category."),
        ];

        for (error, want) in cases {
            assert_eq!(error.to_string(), want);
        }
    }
}

use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use easy_budget::{
    CategoryName, Transaction, TransactionType, create_category, create_transaction,
    ensure_default_user, initialize_db, update_user_name,
};

/// A utility for creating a test database for the easy_budget server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// The recurring transactions added for each month, as
/// (day offset into the month, amount, type, note, category index).
const MONTHLY_TRANSACTIONS: [(i64, f64, TransactionType, &str, Option<usize>); 6] = [
    (0, 3200.0, TransactionType::Income, "Salary", Some(0)),
    (1, 1450.0, TransactionType::Expense, "Rent", Some(1)),
    (3, 87.35, TransactionType::Expense, "Weekly shop", Some(2)),
    (10, 92.10, TransactionType::Expense, "Weekly shop", Some(2)),
    (14, 42.0, TransactionType::Expense, "Bus pass", Some(3)),
    (20, 25.5, TransactionType::Expense, "Birthday card", None),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    ensure_default_user(&conn)?;
    update_user_name("Test User", &conn)?;

    println!("Creating categories...");
    let categories = [
        ("Salary", "💰"),
        ("Housing", "🏠"),
        ("Groceries", "🛒"),
        ("Transport", "🚌"),
    ]
    .into_iter()
    .map(|(name, icon)| create_category(CategoryName::new(name)?, Some(icon), &conn))
    .collect::<Result<Vec<_>, _>>()?;

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for months_ago in (0..3).rev() {
        let month_start = today - Duration::days(30 * months_ago);
        let month_start = month_start.replace_day(1)?;

        for (day_offset, amount, type_, note, category) in MONTHLY_TRANSACTIONS {
            let date = month_start + Duration::days(day_offset);
            if date > today {
                continue;
            }

            let category_id = category.map(|index| categories[index].id);
            create_transaction(
                Transaction::build(amount, type_, date, note).category_id(category_id),
                &conn,
            )?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

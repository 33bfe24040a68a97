use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finance_tracker::{
    PasswordHash, Transaction, TransactionKind, ValidatedPassword, create_transaction, create_user,
    initialize_db, set_monthly_goal,
};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of sample transactions to create.
    #[arg(long, short, default_value_t = 3)]
    months: i64,
}

/// The recurring transactions created for each month, as (amount, kind, description, category).
const MONTHLY_TRANSACTIONS: [(f64, TransactionKind, &str, Option<&str>); 6] = [
    (3200.0, TransactionKind::Income, "Salary", Some("Salary")),
    (1400.0, TransactionKind::Expense, "Rent", Some("Housing")),
    (180.5, TransactionKind::Expense, "Supermarket", Some("Groceries")),
    (95.2, TransactionKind::Expense, "Power bill", Some("Utilities")),
    (42.0, TransactionKind::Expense, "Bus pass", Some("Transport")),
    (23.9, TransactionKind::Expense, "Coffee", None),
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

    println!("Creating test user test@example.com with the password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("Test User", "test@example.com", password_hash, &conn)?;
    set_monthly_goal(user.id, Some(2000.0), &conn)?;

    println!("Creating {} months of transactions...", args.months);

    let today = OffsetDateTime::now_utc().date();

    for month in 0..args.months {
        for (offset, (amount, kind, description, category)) in
            MONTHLY_TRANSACTIONS.into_iter().enumerate()
        {
            let date = today - Duration::days(month * 30 + offset as i64 * 4);
            let builder = Transaction::build(amount, kind, date, description).category(category);

            create_transaction(builder, user.id, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}

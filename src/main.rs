//! A small command line front end for the ledgerly core.
//!
//! The UI proper is out of scope for this crate; this binary stands in for
//! it by calling the state manager the same way a UI layer would: construct,
//! load, mutate, read the snapshot and derived aggregates.

use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use ledgerly::{Category, CategoryName, EntryKind, FinanceState, Store, Transaction};

/// A local personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Created and seeded on first use.
    #[arg(long, default_value = "ledgerly.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the balance and this month's income and expense totals.
    Summary,

    /// List all categories.
    Categories,

    /// List all transactions, most recent first.
    Transactions,

    /// Record income.
    AddIncome {
        /// The amount earned.
        amount: f64,

        /// The ID of the category to file the transaction under.
        #[arg(long, default_value = "cat-other-income")]
        category: String,

        /// The economic date as an RFC 3339 timestamp. Defaults to now.
        #[arg(long)]
        date: Option<String>,
    },

    /// Record an expense.
    AddExpense {
        /// The amount spent.
        amount: f64,

        /// The ID of the category to file the transaction under.
        #[arg(long, default_value = "cat-misc")]
        category: String,

        /// The economic date as an RFC 3339 timestamp. Defaults to now.
        #[arg(long)]
        date: Option<String>,
    },

    /// Create a new category.
    AddCategory {
        /// The display name of the category.
        name: String,

        /// Whether the category is for income or expenses.
        #[arg(long, default_value = "expense", value_parser = str::parse::<EntryKind>)]
        kind: EntryKind,
    },

    /// Delete a transaction by its ID.
    RemoveTransaction {
        /// The ID of the transaction to delete.
        id: String,
    },

    /// Write all data as JSON to stdout.
    Export,

    /// Replace all data with the contents of a JSON export file.
    ///
    /// This is not atomic: a failure partway through can leave a partially
    /// imported database.
    Import {
        /// Path to a file produced by the export command.
        path: PathBuf,
    },
}

/// The JSON document produced by export and consumed by import.
#[derive(Serialize, Deserialize)]
struct ExportFile {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let store = Store::open(&args.db_path).expect("could not open the database");
    let mut state = FinanceState::new(store);
    state.load();

    match args.command {
        Command::Summary => {
            let summary = state.month_summary();
            println!("balance:            {:>12.2}", state.balance());
            println!("income this month:  {:>12.2}", summary.income);
            println!("expense this month: {:>12.2}", summary.expense);
        }
        Command::Categories => {
            for category in state.categories() {
                let marker = if category.is_default { "*" } else { " " };
                println!("{marker} {:<20} {:<8} {}", category.name, category.kind, category.id);
            }
        }
        Command::Transactions => {
            for transaction in state.transactions() {
                let date = transaction
                    .date
                    .format(&Rfc3339)
                    .expect("could not format transaction date");
                println!(
                    "{date}  {:<8} {:>10.2}  {:<20} {}",
                    transaction.kind, transaction.amount, transaction.category_id, transaction.id
                );
            }
        }
        Command::AddIncome {
            amount,
            category,
            date,
        } => add_transaction(&mut state, amount, EntryKind::Income, &category, date),
        Command::AddExpense {
            amount,
            category,
            date,
        } => add_transaction(&mut state, amount, EntryKind::Expense, &category, date),
        Command::AddCategory { name, kind } => {
            let name = CategoryName::new(&name).expect("invalid category name");
            let id = format!("cat-{}", Uuid::new_v4());
            state
                .add_category(Category::new(&id, name, kind))
                .expect("could not add the category");
            println!("added category {id}");
        }
        Command::RemoveTransaction { id } => {
            state
                .remove_transaction(&id)
                .expect("could not remove the transaction");
        }
        Command::Export => {
            let export = ExportFile {
                categories: state.categories().to_vec(),
                transactions: state.transactions().to_vec(),
            };
            let json =
                serde_json::to_string_pretty(&export).expect("could not serialize the export");
            println!("{json}");
        }
        Command::Import { path } => {
            let json = fs::read_to_string(&path).expect("could not read the import file");
            let export: ExportFile =
                serde_json::from_str(&json).expect("could not parse the import file");
            state
                .import_data(export.categories, export.transactions)
                .expect("import failed, the database may be partially imported");
            println!(
                "imported {} categories and {} transactions",
                state.categories().len(),
                state.transactions().len()
            );
        }
    }
}

fn add_transaction(
    state: &mut FinanceState,
    amount: f64,
    kind: EntryKind,
    category: &str,
    date: Option<String>,
) {
    let date = match date {
        Some(date) => OffsetDateTime::parse(&date, &Rfc3339)
            .expect("could not parse the date, expected an RFC 3339 timestamp"),
        None => OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
    };

    let id = format!("tx-{}", Uuid::new_v4());
    let transaction =
        Transaction::new(&id, amount, kind, category, date).expect("invalid transaction");

    state
        .add_transaction(transaction)
        .expect("could not add the transaction");

    println!("added transaction {id}");
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().pretty().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .init();
}

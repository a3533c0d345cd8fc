/*! This module defines the schema for the application's database: the trait
that maps a model onto its record collection, the one-time initialization that
creates both collections and their indices, and the default-category seeding
that runs on the very first open. */

use rusqlite::{Connection, Params, Row, Transaction as SqlTransaction, TransactionBehavior};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{Category, CategoryName, EntryKind, Transaction},
};

/// The version of the database schema.
///
/// Stored in the `user_version` pragma. Bumping this value is the only
/// supported migration trigger; migration logic beyond creating the tables
/// and indices is left to future versions.
pub const SCHEMA_VERSION: u32 = 1;

/// The ten categories seeded when the category collection is first created.
///
/// Six expense categories and four income categories. Their IDs are
/// well-known and stable across installations.
const DEFAULT_CATEGORIES: [(&str, &str, EntryKind); 10] = [
    ("cat-food", "Food", EntryKind::Expense),
    ("cat-transport", "Transport", EntryKind::Expense),
    ("cat-bills", "Bills", EntryKind::Expense),
    ("cat-rent", "Rent", EntryKind::Expense),
    ("cat-subs", "Subscriptions", EntryKind::Expense),
    ("cat-misc", "Miscellaneous", EntryKind::Expense),
    ("cat-salary", "Salary", EntryKind::Income),
    ("cat-business", "Business", EntryKind::Income),
    ("cat-gift", "Gift", EntryKind::Income),
    ("cat-other-income", "Other", EntryKind::Income),
];

/// A model that is persisted in a named record collection.
///
/// Implementers describe their collection (table) and how a record maps to
/// and from a row, which lets the [Store](crate::Store) provide its CRUD
/// primitives generically over any record type.
pub trait Record: Sized {
    /// The name of the collection the records are stored in.
    const COLLECTION: &'static str;

    /// Comma-separated column list used by SELECT statements.
    const COLUMNS: &'static str;

    /// The column list and placeholders used by INSERT statements,
    /// e.g. `"(id, name) VALUES (?1, ?2)"`.
    const INSERT_SQL: &'static str;

    /// Create the collection's table and secondary indices if absent.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;

    /// The record's unique ID within its collection.
    fn id(&self) -> &str;

    /// Map a row selected with [Record::COLUMNS] to a record.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;

    /// The parameters bound to the placeholders in [Record::INSERT_SQL].
    fn insert_params(&self) -> impl Params;
}

/// Set up the database schema and seed the default categories.
///
/// Runs inside a single exclusive transaction. Creates both collections and
/// their indices if they are absent, and seeds the ten default categories
/// only when the category collection did not previously exist, so re-opening
/// an already-initialized database never duplicates them.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let seed_categories = !collection_exists(&transaction, Category::COLLECTION)?;

    Category::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;

    if seed_categories {
        seed_default_categories(&transaction)?;
    }

    transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    transaction.commit()?;

    Ok(())
}

fn collection_exists(connection: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let now = OffsetDateTime::now_utc();

    let mut statement = connection.prepare(&format!(
        "INSERT INTO {} {}",
        Category::COLLECTION,
        Category::INSERT_SQL
    ))?;

    for (id, name, kind) in DEFAULT_CATEGORIES {
        let category = Category {
            id: id.to_string(),
            name: CategoryName::new_unchecked(name),
            kind,
            is_default: true,
            created_at: now,
        };

        statement.execute(category.insert_params())?;
    }

    tracing::info!("seeded {} default categories", DEFAULT_CATEGORIES.len());

    Ok(())
}

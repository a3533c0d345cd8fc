//! Implements the embedded store adapter: six CRUD primitives over the
//! record collections, each one an independent atomic transaction against
//! the underlying SQLite engine.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension};

use crate::{
    Error,
    db::{Record, initialize},
};

/// Durable CRUD primitives over the record collections.
///
/// Every primitive runs as its own engine transaction scoped to a single
/// collection; there is no cross-collection atomicity. A caller that must
/// clear two collections together performs two independent operations and
/// accepts the small window where one has run and the other has not.
///
/// A store may be **detached** (no underlying engine, see [Store::detached]),
/// in which case every read returns an empty result and every write is an
/// accepted no-op; a detached store never fails because of the missing
/// engine.
#[derive(Debug, Clone)]
pub struct Store {
    connection: Option<Arc<Mutex<Connection>>>,
}

impl Store {
    /// Open (or create) the database at `path` and initialize its schema.
    ///
    /// Initialization is idempotent: the default categories are seeded only
    /// on the very first open.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection = Connection::open(path)?;
        initialize(&connection)?;

        Ok(Self {
            connection: Some(Arc::new(Mutex::new(connection))),
        })
    }

    /// Open an in-memory database, useful for tests.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        let connection = Connection::open_in_memory()?;
        initialize(&connection)?;

        Ok(Self {
            connection: Some(Arc::new(Mutex::new(connection))),
        })
    }

    /// Create a store with no underlying storage engine.
    ///
    /// Used in execution contexts where no engine is available: reads return
    /// empty results and writes are no-ops.
    pub fn detached() -> Self {
        Self { connection: None }
    }

    /// Whether the store is backed by a storage engine.
    pub fn is_persistent(&self) -> bool {
        self.connection.is_some()
    }

    /// Acquire the connection lock, or `None` for a detached store.
    fn lock(&self) -> Result<Option<MutexGuard<'_, Connection>>, Error> {
        match &self.connection {
            Some(connection) => connection.lock().map(Some).map_err(|_| Error::DatabaseLock),
            None => Ok(None),
        }
    }

    /// Retrieve every record in the collection, in engine-native order.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn get_all<R: Record>(&self) -> Result<Vec<R>, Error> {
        let Some(connection) = self.lock()? else {
            return Ok(Vec::new());
        };

        connection
            .prepare(&format!("SELECT {} FROM {}", R::COLUMNS, R::COLLECTION))?
            .query_map([], R::map_row)?
            .map(|record| record.map_err(Error::from))
            .collect()
    }

    /// Retrieve the record with `id`, or `None` if it is absent.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn get_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, Error> {
        let Some(connection) = self.lock()? else {
            return Ok(None);
        };

        connection
            .prepare(&format!(
                "SELECT {} FROM {} WHERE id = :id",
                R::COLUMNS,
                R::COLLECTION
            ))?
            .query_row(&[(":id", &id)], R::map_row)
            .optional()
            .map_err(Error::from)
    }

    /// Insert a record whose ID must not already exist in the collection.
    ///
    /// # Errors
    /// Returns [Error::DuplicateId] if a record with the same ID is already
    /// present, or another error if there is an SQL error.
    pub fn add<R: Record>(&self, record: &R) -> Result<(), Error> {
        let Some(connection) = self.lock()? else {
            return Ok(());
        };

        connection
            .execute(
                &format!("INSERT INTO {} {}", R::COLLECTION, R::INSERT_SQL),
                record.insert_params(),
            )
            .map_err(|error| match error {
                // Codes 1555 and 2067 occur when a PRIMARY KEY or UNIQUE
                // constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, _)
                    if sql_error.extended_code == 1555 || sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateId(record.id().to_owned())
                }
                error => error.into(),
            })?;

        Ok(())
    }

    /// Store a record, replacing any existing record with the same ID
    /// (upsert semantics).
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn update<R: Record>(&self, record: &R) -> Result<(), Error> {
        let Some(connection) = self.lock()? else {
            return Ok(());
        };

        connection.execute(
            &format!("INSERT OR REPLACE INTO {} {}", R::COLLECTION, R::INSERT_SQL),
            record.insert_params(),
        )?;

        Ok(())
    }

    /// Delete the record with `id` if it exists.
    ///
    /// Succeeds even when no such record is present.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn remove<R: Record>(&self, id: &str) -> Result<(), Error> {
        let Some(connection) = self.lock()? else {
            return Ok(());
        };

        connection.execute(&format!("DELETE FROM {} WHERE id = ?1", R::COLLECTION), [id])?;

        Ok(())
    }

    /// Delete every record in the collection.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    pub fn clear_all<R: Record>(&self) -> Result<(), Error> {
        let Some(connection) = self.lock()? else {
            return Ok(());
        };

        connection.execute(&format!("DELETE FROM {}", R::COLLECTION), [])?;

        Ok(())
    }
}

#[cfg(test)]
mod store_tests {
    use time::macros::datetime;

    use crate::{
        Error,
        models::{Category, CategoryName, EntryKind, Transaction},
    };

    use super::Store;

    fn get_test_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn sample_transaction(id: &str) -> Transaction {
        Transaction::new(
            id,
            42.5,
            EntryKind::Expense,
            "cat-food",
            datetime!(2026-08-15 12:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn add_then_get_by_id_returns_record() {
        let store = get_test_store();
        let transaction = sample_transaction("tx-1");

        store.add(&transaction).unwrap();

        let selected = store.get_by_id::<Transaction>("tx-1").unwrap();
        assert_eq!(selected, Some(transaction));
    }

    #[test]
    fn add_with_duplicate_id_fails() {
        let store = get_test_store();
        let transaction = sample_transaction("tx-1");

        store.add(&transaction).unwrap();
        let result = store.add(&transaction);

        assert_eq!(result, Err(Error::DuplicateId("tx-1".to_string())));
    }

    #[test]
    fn update_replaces_existing_record() {
        let store = get_test_store();
        let mut transaction = sample_transaction("tx-1");
        store.add(&transaction).unwrap();

        transaction.amount = 100.0;
        store.update(&transaction).unwrap();

        let selected = store.get_by_id::<Transaction>("tx-1").unwrap().unwrap();
        assert_eq!(selected.amount, 100.0);
    }

    #[test]
    fn update_creates_missing_record() {
        let store = get_test_store();
        let transaction = sample_transaction("tx-1");

        store.update(&transaction).unwrap();

        let selected = store.get_by_id::<Transaction>("tx-1").unwrap();
        assert_eq!(selected, Some(transaction));
    }

    #[test]
    fn remove_deletes_record() {
        let store = get_test_store();
        let transaction = sample_transaction("tx-1");
        store.add(&transaction).unwrap();

        store.remove::<Transaction>("tx-1").unwrap();

        assert_eq!(store.get_by_id::<Transaction>("tx-1").unwrap(), None);
    }

    #[test]
    fn remove_missing_record_succeeds() {
        let store = get_test_store();

        assert_eq!(store.remove::<Transaction>("tx-nope"), Ok(()));
    }

    #[test]
    fn clear_all_empties_collection() {
        let store = get_test_store();
        store.add(&sample_transaction("tx-1")).unwrap();
        store.add(&sample_transaction("tx-2")).unwrap();

        store.clear_all::<Transaction>().unwrap();

        assert!(store.get_all::<Transaction>().unwrap().is_empty());
    }

    #[test]
    fn clearing_one_collection_leaves_the_other() {
        let store = get_test_store();
        store.add(&sample_transaction("tx-1")).unwrap();

        store.clear_all::<Category>().unwrap();

        assert!(store.get_all::<Category>().unwrap().is_empty());
        assert_eq!(store.get_all::<Transaction>().unwrap().len(), 1);
    }

    #[test]
    fn open_store_contains_seeded_categories() {
        let store = get_test_store();

        let categories = store.get_all::<Category>().unwrap();

        assert_eq!(categories.len(), 10);
        assert!(categories.iter().all(|category| category.is_default));
    }

    #[test]
    fn detached_store_reads_empty_and_accepts_writes() {
        let store = Store::detached();
        let transaction = sample_transaction("tx-1");
        let category = Category::new("cat-test", CategoryName::new_unchecked("Test"), EntryKind::Income);

        assert!(!store.is_persistent());
        assert_eq!(store.get_all::<Transaction>(), Ok(Vec::new()));
        assert_eq!(store.get_by_id::<Transaction>("tx-1"), Ok(None));
        assert_eq!(store.add(&transaction), Ok(()));
        assert_eq!(store.add(&category), Ok(()));
        assert_eq!(store.update(&transaction), Ok(()));
        assert_eq!(store.remove::<Transaction>("tx-1"), Ok(()));
        assert_eq!(store.clear_all::<Category>(), Ok(()));

        // Writes are no-ops, nothing is retained.
        assert_eq!(store.get_all::<Transaction>(), Ok(Vec::new()));
    }
}

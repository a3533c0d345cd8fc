//! Implements the finance state manager: an in-memory mirror of both record
//! collections that is kept consistent with every successful mutation, plus
//! the derived aggregates (balance and month-to-date totals) computed from
//! the mirror on each access.

use time::OffsetDateTime;

use crate::{
    Error,
    models::{Category, EntryKind, Transaction},
    store::Store,
};

/// The income and expense totals for one calendar month.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MonthSummary {
    /// The sum of income transaction amounts in the month.
    pub income: f64,
    /// The sum of expense transaction amounts in the month.
    pub expense: f64,
}

/// The authoritative in-memory snapshot of both record collections.
///
/// The manager starts unloaded with empty mirrors; call [FinanceState::load]
/// after construction to populate them. Every mutation first runs the
/// corresponding store primitive and only updates the mirror on success, so
/// the mirror never drifts ahead of the persisted state.
///
/// The transaction mirror is kept sorted descending by date after every load
/// and mutation. The category mirror has no ordering guarantee.
#[derive(Debug)]
pub struct FinanceState {
    store: Store,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    is_loaded: bool,
}

impl FinanceState {
    /// Create an unloaded manager on top of `store`.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            categories: Vec::new(),
            transactions: Vec::new(),
            is_loaded: false,
        }
    }

    /// Load both collections into the in-memory mirrors.
    ///
    /// May be called again at any time as an idempotent refresh. A failure is
    /// logged and leaves the previous mirrors untouched (empty on the first
    /// call) with the manager unloaded; there is no retry. Calling this on a
    /// detached store is a no-op.
    pub fn load(&mut self) {
        if !self.store.is_persistent() {
            return;
        }

        if let Err(error) = self.try_load() {
            tracing::error!("failed to load data from the store: {error}");
        }
    }

    fn try_load(&mut self) -> Result<(), Error> {
        let categories = self.store.get_all::<Category>()?;
        let mut transactions = self.store.get_all::<Transaction>()?;
        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        self.categories = categories;
        self.transactions = transactions;
        self.is_loaded = true;

        Ok(())
    }

    /// Whether a load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// The current category mirror.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The current transaction mirror, sorted descending by date.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Persist a new transaction and insert it into the mirror.
    ///
    /// The mirror is re-sorted rather than prepended because the new
    /// transaction may carry a date older than existing entries.
    ///
    /// # Errors
    /// Returns [Error::DuplicateId] if the ID is already taken, or another
    /// error if the store fails.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), Error> {
        self.store.add(&transaction)?;

        self.transactions.push(transaction);
        self.transactions.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(())
    }

    /// Persist a full-record replacement and update the matching mirror
    /// entry.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), Error> {
        self.store.update(&transaction)?;

        if let Some(entry) = self
            .transactions
            .iter_mut()
            .find(|entry| entry.id == transaction.id)
        {
            *entry = transaction;
            self.transactions.sort_by(|a, b| b.date.cmp(&a.date));
        }

        Ok(())
    }

    /// Delete the transaction with `id` and filter it out of the mirror.
    ///
    /// Succeeds even when no such transaction exists.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn remove_transaction(&mut self, id: &str) -> Result<(), Error> {
        self.store.remove::<Transaction>(id)?;
        self.transactions.retain(|entry| entry.id != id);

        Ok(())
    }

    /// Persist a new category and append it to the mirror.
    ///
    /// # Errors
    /// Returns [Error::DuplicateId] if the ID is already taken, or another
    /// error if the store fails.
    pub fn add_category(&mut self, category: Category) -> Result<(), Error> {
        self.store.add(&category)?;
        self.categories.push(category);

        Ok(())
    }

    /// Persist a full-record replacement and update the matching mirror
    /// entry.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn update_category(&mut self, category: Category) -> Result<(), Error> {
        self.store.update(&category)?;

        if let Some(entry) = self
            .categories
            .iter_mut()
            .find(|entry| entry.id == category.id)
        {
            *entry = category;
        }

        Ok(())
    }

    /// Delete the category with `id` and filter it out of the mirror.
    ///
    /// Transactions referencing the category are left dangling on purpose;
    /// referential integrity is not enforced.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub fn remove_category(&mut self, id: &str) -> Result<(), Error> {
        self.store.remove::<Category>(id)?;
        self.categories.retain(|entry| entry.id != id);

        Ok(())
    }

    /// Replace the entire contents of the store with the given records.
    ///
    /// Clears both collections, then inserts every record one at a time, and
    /// finally reloads the mirrors from whatever the persisted state ends up
    /// being. This operation is **not atomic**: a failure partway through
    /// leaves the collections in a mixed state, and the trailing reload
    /// reflects exactly that state.
    ///
    /// # Errors
    /// Returns the first error raised by a clear or insert; later records
    /// are not attempted.
    pub fn import_data(
        &mut self,
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
    ) -> Result<(), Error> {
        self.store.clear_all::<Category>()?;
        self.store.clear_all::<Transaction>()?;

        for category in &categories {
            self.store.add(category)?;
        }

        for transaction in &transactions {
            self.store.add(transaction)?;
        }

        self.load();

        Ok(())
    }

    /// The net balance over all transactions: income amounts count positive,
    /// expense amounts negative.
    pub fn balance(&self) -> f64 {
        self.transactions
            .iter()
            .map(|transaction| match transaction.kind {
                EntryKind::Income => transaction.amount,
                EntryKind::Expense => -transaction.amount,
            })
            .sum()
    }

    /// The income and expense totals for the current local calendar month.
    ///
    /// Falls back to UTC when the local offset cannot be determined.
    pub fn month_summary(&self) -> MonthSummary {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());

        self.month_summary_at(now)
    }

    /// The income and expense totals for the calendar month and year of
    /// `instant`.
    ///
    /// Transaction dates are converted to `instant`'s UTC offset before the
    /// month comparison, so a transaction dated the last instant of a month
    /// never leaks into the next month's totals.
    pub fn month_summary_at(&self, instant: OffsetDateTime) -> MonthSummary {
        let mut summary = MonthSummary::default();

        for transaction in &self.transactions {
            let date = transaction.date.to_offset(instant.offset());

            if date.month() != instant.month() || date.year() != instant.year() {
                continue;
            }

            match transaction.kind {
                EntryKind::Income => summary.income += transaction.amount,
                EntryKind::Expense => summary.expense += transaction.amount,
            }
        }

        summary
    }
}

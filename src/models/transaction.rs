//! Defines the `Transaction` model, an event where money was earned or spent.

use rusqlite::{Connection, Params, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    db::Record,
    models::{EntryKind, validate_amount},
};

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The opaque ID of the transaction, unique within the collection.
    pub id: String,

    /// The amount of money spent or earned, as a non-negative magnitude.
    ///
    /// The direction of the money flow is given by `kind`, not by the sign.
    pub amount: f64,

    /// Whether the transaction is income or an expense.
    pub kind: EntryKind,

    /// The ID of the category the transaction belongs to.
    ///
    /// Referential integrity is not enforced: a deleted category leaves
    /// transactions with dangling references, which callers must tolerate.
    pub category_id: String,

    /// When the transaction happened economically, which is not necessarily
    /// when it was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::NegativeAmount] if `amount` is negative or NaN.
    pub fn new(
        id: &str,
        amount: f64,
        kind: EntryKind,
        category_id: &str,
        date: OffsetDateTime,
    ) -> Result<Self, Error> {
        Ok(Self {
            id: id.to_string(),
            amount: validate_amount(amount)?,
            kind,
            category_id: category_id.to_string(),
            date,
        })
    }
}

impl Record for Transaction {
    const COLLECTION: &'static str = "transactions";
    const COLUMNS: &'static str = "id, amount, kind, category_id, date";
    const INSERT_SQL: &'static str =
        "(id, amount, kind, category_id, date) VALUES (?1, ?2, ?3, ?4, ?5)";

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                category_id TEXT NOT NULL,
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS transactions_date ON transactions (date);
            CREATE INDEX IF NOT EXISTS transactions_kind ON transactions (kind);
            CREATE INDEX IF NOT EXISTS transactions_category_id
                ON transactions (category_id);",
        )
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            amount: row.get(1)?,
            kind: row.get(2)?,
            category_id: row.get(3)?,
            date: row.get(4)?,
        })
    }

    fn insert_params(&self) -> impl Params {
        (
            &self.id,
            &self.amount,
            &self.kind,
            &self.category_id,
            &self.date,
        )
    }
}

#[cfg(test)]
mod transaction_tests {
    use time::macros::datetime;

    use crate::{Error, models::EntryKind};

    use super::Transaction;

    #[test]
    fn new_accepts_non_negative_amount() {
        let transaction = Transaction::new(
            "tx-1",
            500.0,
            EntryKind::Income,
            "cat-salary",
            datetime!(2026-08-15 12:00 UTC),
        )
        .unwrap();

        assert_eq!(transaction.amount, 500.0);
    }

    #[test]
    fn new_rejects_negative_amount() {
        let result = Transaction::new(
            "tx-1",
            -500.0,
            EntryKind::Expense,
            "cat-rent",
            datetime!(2026-08-15 12:00 UTC),
        );

        assert_eq!(result, Err(Error::NegativeAmount(-500.0)));
    }
}

//! Defines the `Category` model, a label that groups transactions.
//! A transaction refers to exactly one category, but the reference is not
//! enforced: deleting a category leaves its transactions dangling.

use std::fmt::Display;

use rusqlite::{Connection, Params, Row, ToSql, types::ToSqlOutput};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, db::Record, models::EntryKind};

/// The name of a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if the non-empty invariant is violated it will cause incorrect
    /// behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for CategoryName {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.0.as_str().into())
    }
}

/// A category for expenses and income, e.g. 'Groceries', 'Rent', 'Wages'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The opaque ID of the category, unique within the collection and stable
    /// for the record's lifetime.
    pub id: String,

    /// The display name of the category.
    pub name: CategoryName,

    /// Whether the category labels income or expenses.
    pub kind: EntryKind,

    /// True only for the ten categories seeded when the store is first
    /// created.
    pub is_default: bool,

    /// When the category was created. Set once, never updated.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Category {
    /// Create a user-defined category stamped with the current time.
    pub fn new(id: &str, name: CategoryName, kind: EntryKind) -> Self {
        Self {
            id: id.to_string(),
            name,
            kind,
            is_default: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";
    const COLUMNS: &'static str = "id, name, kind, is_default, created_at";
    const INSERT_SQL: &'static str =
        "(id, name, kind, is_default, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                is_default INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS categories_kind ON categories (kind);",
        )
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let raw_name: String = row.get(1)?;

        Ok(Self {
            id: row.get(0)?,
            name: CategoryName::new_unchecked(&raw_name),
            kind: row.get(2)?,
            is_default: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn insert_params(&self) -> impl Params {
        (
            &self.id,
            &self.name,
            &self.kind,
            &self.is_default,
            &self.created_at,
        )
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_accepts_non_empty_name() {
        let name = CategoryName::new("Groceries").unwrap();

        assert_eq!(name.as_ref(), "Groceries");
    }

    #[test]
    fn new_rejects_empty_name() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
    }
}

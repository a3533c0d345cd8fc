//! The domain models stored in the two record collections.

mod category;
mod transaction;

pub use category::{Category, CategoryName};
pub use transaction::Transaction;

use std::fmt::Display;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether a category or transaction represents money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money flowing in, e.g. a salary payment.
    Income,
    /// Money flowing out, e.g. a rent payment.
    Expense,
}

impl EntryKind {
    /// The lowercase string form used in the database and in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(format!(
                "unknown entry kind \"{other}\", expected \"income\" or \"expense\""
            )),
        }
    }
}

impl ToSql for EntryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for EntryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// Validate an amount as a non-negative magnitude.
///
/// Rejects negative values and NaN.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::NegativeAmount(amount))
    }
}

#[cfg(test)]
mod entry_kind_tests {
    use super::EntryKind;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!("income".parse(), Ok(EntryKind::Income));
        assert_eq!("expense".parse(), Ok(EntryKind::Expense));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("transfer".parse::<EntryKind>().is_err());
        assert!("Income".parse::<EntryKind>().is_err());
    }
}

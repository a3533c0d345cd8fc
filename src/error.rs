//! Defines the crate-wide error type.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A negative amount was used to create a transaction.
    ///
    /// Amounts are stored as non-negative magnitudes; the direction of the
    /// money flow is carried by the entry kind, not by the sign.
    #[error("{0} is negative, transaction amounts must be non-negative")]
    NegativeAmount(f64),

    /// Tried to add a record whose ID is already present in the collection.
    ///
    /// IDs are unique within a collection for the lifetime of the store, so
    /// the caller should retry with a fresh ID or use an upsert instead.
    #[error("a record with the ID \"{0}\" already exists in the collection")]
    DuplicateId(String),

    /// The requested record could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

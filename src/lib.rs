//! Ledgerly is a local-first personal finance tracker.
//!
//! This library provides the persistence and derived-state core: an embedded
//! store adapter over SQLite ([Store]) and an in-memory state manager
//! ([FinanceState]) that mirrors both record collections and computes the
//! derived aggregates (balance and month-to-date totals) the UI renders.
//!
//! The intended lifecycle is construct, load, then mutate:
//!
//! ```
//! use ledgerly::{FinanceState, Store};
//!
//! let store = Store::open_in_memory().expect("could not open the store");
//! let mut state = FinanceState::new(store);
//! state.load();
//!
//! assert!(state.is_loaded());
//! assert_eq!(state.balance(), 0.0);
//! ```

#![warn(missing_docs)]

pub mod db;
mod error;
mod finance;
pub mod models;
mod store;

pub use db::initialize;
pub use error::Error;
pub use finance::{FinanceState, MonthSummary};
pub use models::{Category, CategoryName, EntryKind, Transaction};
pub use store::Store;

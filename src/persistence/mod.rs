//! Transaction persistence
//!
//! One row per completed bridge order in `bridge_transactions_tb`, unique on
//! `ff_order_id`. Two backends share the [`TransactionStore`] contract:
//! - [`PgTransactionStore`] for production
//! - [`InMemoryTransactionStore`] for local runs and tests

pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

pub use memory::InMemoryTransactionStore;
pub use models::{ClientMetadata, NewTransaction, PersistedTransaction};
pub use postgres::PgTransactionStore;
pub use store::{StoreError, TransactionStore};

//! swapbridge - Cross-Asset Bridge Order Tracking
//!
//! Quotes, submits and tracks bridge orders against an exchange backend, and
//! records every completed order exactly once.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier newtypes and aliases
//! - [`config`] - YAML configuration per environment
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool wrapper
//! - [`exchange`] - Backend API client, wire types and a scripted double
//! - [`currency`] - Currency catalog with TTL cache and offline fallback
//! - [`pricing`] - Price quotes with deterministic fallback
//! - [`order`] - Order creation, status checks and the status poller
//! - [`persistence`] - Transaction store (Postgres and in-memory)
//! - [`reconcile`] - Exactly-once save and expired-order recovery
//! - [`notify`] - User-facing notifications
//! - [`client_env`] - Client environment snapshot

// Core types - must be first!
pub mod core_types;

// Ambient
pub mod config;
pub mod db;
pub mod logging;

// Boundary services
pub mod currency;
pub mod exchange;
pub mod order;
pub mod pricing;

// Reconciliation
pub mod client_env;
pub mod notify;
pub mod persistence;
pub mod reconcile;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use core_types::{CurrencyCode, OrderId, TransactionRowId};
pub use currency::{Currency, CurrencyCatalog};
pub use exchange::{BridgeError, ExchangeApi, HttpExchangeApi, OrderType};
pub use order::{CreateOrderRequest, Order, OrderService, OrderStatus, StatusPoller};
pub use persistence::{InMemoryTransactionStore, PgTransactionStore, TransactionStore};
pub use pricing::{PriceService, Quote};
pub use reconcile::{OrderTracker, Reconciler, RecoveryOutcome, SaveOutcome};

//! Currency catalog

pub mod catalog;
pub mod models;

pub use catalog::CurrencyCatalog;
pub use models::{Currency, fallback_currencies};

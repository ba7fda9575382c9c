//! Price quotation

pub mod quote;
pub mod rates;
pub mod service;

pub use quote::{Quote, QuoteSource};
pub use service::PriceService;

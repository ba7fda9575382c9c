//! Bridge orders
//!
//! Creation, status polling and the order lifecycle. Terminal states are
//! handed to [`crate::reconcile::Reconciler`] by [`StatusPoller`].

pub mod poller;
pub mod service;
pub mod state;
pub mod types;

pub use poller::StatusPoller;
pub use service::OrderService;
pub use state::OrderStatus;
pub use types::{CreateOrderRequest, Order, StatusSnapshot};

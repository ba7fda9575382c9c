//! Per-order reconciliation latches
//!
//! ```text
//! Unchecked → Checking → { Recovered, NotFound, Error }
//! ```
//!
//! `Checking` is entered at most once per order id; all three outcomes are
//! terminal for that id. Latches are process-local and reset with the
//! tracker; cross-process duplicates are caught by the store's unique key.

use crate::core_types::OrderId;
use crate::order::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Unchecked,
    Checking,
    Recovered,
    NotFound,
    Error,
}

impl RecoveryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecoveryState::Recovered | RecoveryState::NotFound | RecoveryState::Error
        )
    }
}

/// An order plus the session state the reconciler keeps about it
#[derive(Debug, Clone)]
pub struct OrderTracker {
    pub order: Order,
    saved: bool,
    last_checked_order_id: Option<OrderId>,
    checking: bool,
    recovery: RecoveryState,
}

impl OrderTracker {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            saved: false,
            last_checked_order_id: None,
            checking: false,
            recovery: RecoveryState::Unchecked,
        }
    }

    /// Transaction durably recorded during this session
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// A recovery lookup is in flight
    pub fn is_checking(&self) -> bool {
        self.checking
    }

    pub fn recovery_state(&self) -> RecoveryState {
        self.recovery
    }

    pub fn last_checked_order_id(&self) -> Option<&OrderId> {
        self.last_checked_order_id.as_ref()
    }

    /// Order looks expired (locally or per the exchange payload) and this
    /// id has not been checked yet.
    pub fn needs_recovery_check(&self) -> bool {
        let expired = self.order.current_status == OrderStatus::Expired
            || self
                .order
                .upstream_status()
                .is_some_and(|s| s.eq_ignore_ascii_case("EXPIRED"));

        expired && self.last_checked_order_id.as_ref() != Some(&self.order.order_id)
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved = true;
    }

    pub(crate) fn begin_check(&mut self) {
        self.last_checked_order_id = Some(self.order.order_id.clone());
        self.checking = true;
        self.recovery = RecoveryState::Checking;
    }

    pub(crate) fn finish_check(&mut self, state: RecoveryState) {
        self.checking = false;
        self.recovery = state;
    }
}

//! Order Status Poller
//!
//! Drives an [`OrderTracker`] from creation to a terminal state:
//!
//! ```text
//! poll → apply snapshot → completed? → save
//!                       → expired?   → recover → recovered? → save
//! ```
//!
//! A completed order whose save failed keeps being polled so the next
//! cycle retries the save. Once the store has proved an expired order
//! completed, the exchange is no longer asked: its snapshots would still
//! say EXPIRED.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::service::OrderService;
use super::state::OrderStatus;
use crate::config::PollerConfig;
use crate::reconcile::{OrderTracker, Reconciler, RecoveryState};

pub struct StatusPoller {
    orders: Arc<OrderService>,
    reconciler: Arc<Reconciler>,
    config: PollerConfig,
}

impl StatusPoller {
    pub fn new(orders: Arc<OrderService>, reconciler: Arc<Reconciler>, config: PollerConfig) -> Self {
        Self {
            orders,
            reconciler,
            config,
        }
    }

    /// One poll cycle. Returns the order status after reconciliation.
    pub async fn poll_once(
        &self,
        tracker: &mut OrderTracker,
        session_token: Option<&str>,
    ) -> OrderStatus {
        if tracker.recovery_state() == RecoveryState::Recovered {
            debug!(order_id = %tracker.order.order_id, "Order recovered, skipping status check");
        } else if let Some(snapshot) = self.orders.check_status(&tracker.order).await {
            let previous = tracker.order.current_status;
            tracker.order.apply_snapshot(snapshot);
            if previous != tracker.order.current_status {
                debug!(
                    order_id = %tracker.order.order_id,
                    from = %previous,
                    to = %tracker.order.current_status,
                    "Order status changed"
                );
            }
        }

        self.reconcile(tracker, session_token).await;
        tracker.order.current_status
    }

    /// Expired (locally or per the exchange payload) → recovery check, then
    /// completed → save
    async fn reconcile(&self, tracker: &mut OrderTracker, session_token: Option<&str>) {
        if tracker.needs_recovery_check() {
            self.reconciler.recover_expired(tracker, session_token).await;
        }
        if tracker.order.current_status == OrderStatus::Completed {
            self.reconciler.save_on_completion(tracker).await;
        }
    }

    fn is_settled(tracker: &OrderTracker) -> bool {
        match tracker.order.current_status {
            OrderStatus::Completed => tracker.is_saved(),
            status => status.is_terminal(),
        }
    }

    /// Poll until the order settles or `max_polls` is exhausted
    pub async fn track(
        &self,
        tracker: &mut OrderTracker,
        session_token: Option<&str>,
    ) -> OrderStatus {
        info!(
            order_id = %tracker.order.order_id,
            interval_ms = self.config.interval_ms,
            max_polls = self.config.max_polls,
            "Tracking order"
        );

        // The order may already be terminal when tracking starts
        self.reconcile(tracker, session_token).await;

        let mut polls = 0;
        while !Self::is_settled(tracker) {
            if polls >= self.config.max_polls {
                warn!(
                    order_id = %tracker.order.order_id,
                    status = %tracker.order.current_status,
                    polls,
                    "Giving up on order before it settled"
                );
                break;
            }
            if polls > 0 {
                tokio::time::sleep(self.config.interval()).await;
            }
            self.poll_once(tracker, session_token).await;
            polls += 1;
        }

        info!(
            order_id = %tracker.order.order_id,
            status = %tracker.order.current_status,
            saved = tracker.is_saved(),
            polls,
            "Tracking finished"
        );
        tracker.order.current_status
    }
}

//! Transaction Persistence Reconciler
//!
//! Two operations, both driven by an order reaching a terminal state:
//!
//! - **save_on_completion**: write a COMPLETED order to the store at most once.
//!   An existing row is refreshed in place (last write wins); a unique-key
//!   violation on insert means a concurrent save already won.
//! - **recover_expired**: when the client sees EXPIRED, look the order up in
//!   the store. A row there proves the exchange finished it, so the order is
//!   flipped back to COMPLETED.
//!
//! # Safety Invariants
//!
//! 1. **No payload, no write**: an order without `raw_api_response` is never persisted
//! 2. **Store is the source of truth**: the unique key on `ff_order_id` is the
//!    only concurrency control; the reconciler holds no lock
//! 3. **Failures never propagate**: every error becomes a notification, leaves
//!    `saved` unset and always clears the checking flag

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::error::ReconcileError;
use super::tracker::{OrderTracker, RecoveryState};
use crate::client_env::ClientEnvironment;
use crate::config::ReconcilerConfig;
use crate::core_types::TransactionRowId;
use crate::notify::{NotificationKind, Notifier};
use crate::order::OrderStatus;
use crate::persistence::{ClientMetadata, NewTransaction, StoreError, TransactionStore};

/// The client cannot observe its public address
const IP_PLACEHOLDER: &str = "client-side";

/// Why a save was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SimulatedSuccess,
    AlreadySaved,
    MissingOrderId,
    NotCompleted,
    MissingApiResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Precondition not met; nothing written, nothing reported
    Skipped(SkipReason),
    /// New row written
    Inserted(TransactionRowId),
    /// Existing row refreshed with the latest payload
    Updated,
    /// Insert lost a race against a concurrent save
    AlreadySaved,
    /// Reported to the user; eligible for retry
    Failed(ReconcileError),
}

impl SaveOutcome {
    /// The order is durably recorded
    pub fn is_saved(&self) -> bool {
        matches!(
            self,
            SaveOutcome::Inserted(_) | SaveOutcome::Updated | SaveOutcome::AlreadySaved
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryOutcome {
    /// Order is not expired, or this id was already checked
    NotApplicable,
    /// Missing order id or session token
    Skipped,
    /// Store had the order; now COMPLETED
    Recovered,
    /// Store has no row; order stays EXPIRED
    NotFound,
    TimedOut,
    Failed(ReconcileError),
}

impl RecoveryOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryOutcome::Recovered)
    }
}

pub struct Reconciler {
    store: Arc<dyn TransactionStore>,
    notifier: Arc<dyn Notifier>,
    env: Arc<dyn ClientEnvironment>,
    recovery_timeout: Duration,
    recovery_timeout_ms: u64,
    settle_delay: Duration,
    simulate_success: bool,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        notifier: Arc<dyn Notifier>,
        env: Arc<dyn ClientEnvironment>,
        config: &ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            env,
            recovery_timeout: config.recovery_timeout(),
            recovery_timeout_ms: config.recovery_timeout_ms,
            settle_delay: config.settle_delay(),
            simulate_success: config.simulate_success,
        }
    }

    /// Persist a COMPLETED order exactly once per session.
    ///
    /// Safe to call on every state change: preconditions that are not met
    /// yet turn the call into a silent no-op.
    pub async fn save_on_completion(&self, tracker: &mut OrderTracker) -> SaveOutcome {
        if let Some(reason) = self.skip_reason(tracker) {
            debug!(order_id = %tracker.order.order_id, ?reason, "Save skipped");
            return SaveOutcome::Skipped(reason);
        }

        let outcome = self.save(tracker).await;
        match &outcome {
            SaveOutcome::Inserted(_) | SaveOutcome::Updated | SaveOutcome::AlreadySaved => {
                tracker.mark_saved();
            }
            SaveOutcome::Failed(e) => {
                error!(
                    order_id = %tracker.order.order_id,
                    code = e.code(),
                    error = %e,
                    "Failed to save transaction"
                );
                self.notifier
                    .notify(NotificationKind::Error, e.title(), &e.to_string());
            }
            SaveOutcome::Skipped(_) => {}
        }
        outcome
    }

    fn skip_reason(&self, tracker: &OrderTracker) -> Option<SkipReason> {
        if self.simulate_success {
            return Some(SkipReason::SimulatedSuccess);
        }
        if tracker.is_saved() {
            return Some(SkipReason::AlreadySaved);
        }
        if tracker.order.order_id.is_empty() {
            return Some(SkipReason::MissingOrderId);
        }
        if tracker.order.current_status != OrderStatus::Completed {
            return Some(SkipReason::NotCompleted);
        }
        if tracker.order.raw_api_response.is_none() {
            return Some(SkipReason::MissingApiResponse);
        }
        None
    }

    async fn save(&self, tracker: &OrderTracker) -> SaveOutcome {
        let order = &tracker.order;
        let Some(raw) = order.raw_api_response.as_ref() else {
            return SaveOutcome::Skipped(SkipReason::MissingApiResponse);
        };

        let existing = match self.store.find_by_order_id(&order.order_id).await {
            Ok(existing) => existing,
            Err(e) => return SaveOutcome::Failed(ReconcileError::from_query(e)),
        };

        if existing.is_some() {
            return match self
                .store
                .update_status(&order.order_id, OrderStatus::Completed, raw)
                .await
            {
                Ok(true) => {
                    info!(order_id = %order.order_id, "Existing transaction refreshed");
                    SaveOutcome::Updated
                }
                Ok(false) => SaveOutcome::Failed(ReconcileError::StoreWrite(format!(
                    "transaction {} vanished before update",
                    order.order_id
                ))),
                Err(e) => SaveOutcome::Failed(ReconcileError::from_write(e)),
            };
        }

        let metadata = match serde_json::to_value(self.client_metadata()) {
            Ok(v) => v,
            Err(e) => return SaveOutcome::Failed(ReconcileError::Unexpected(e.to_string())),
        };
        let record = NewTransaction::from_order(order, OrderStatus::Completed, raw.clone(), metadata);

        match self.store.insert(&record).await {
            Ok(id) => {
                info!(order_id = %order.order_id, row_id = id, "Transaction saved");
                self.notifier.notify(
                    NotificationKind::Info,
                    "Transaction saved",
                    &format!("Order {} has been recorded", order.order_id),
                );
                SaveOutcome::Inserted(id)
            }
            Err(StoreError::UniqueViolation(_)) => {
                debug!(order_id = %order.order_id, "Concurrent save already recorded this order");
                SaveOutcome::AlreadySaved
            }
            Err(e) => SaveOutcome::Failed(ReconcileError::from_write(e)),
        }
    }

    fn client_metadata(&self) -> ClientMetadata {
        let (width, height) = self.env.viewport();
        ClientMetadata {
            ip: IP_PLACEHOLDER.to_string(),
            user_agent: self.env.user_agent(),
            languages: self.env.languages(),
            viewport: format!("{}x{}", width, height),
            platform: self.env.platform(),
            vendor: self.env.vendor(),
            simulated: self.simulate_success,
            captured_at: chrono::Utc::now(),
        }
    }

    /// Check whether an EXPIRED order was in fact completed.
    ///
    /// Runs at most once per order id. The store lookup races a fixed
    /// deadline; a lookup that loses is left running in the background and
    /// its result is discarded.
    pub async fn recover_expired(
        &self,
        tracker: &mut OrderTracker,
        session_token: Option<&str>,
    ) -> RecoveryOutcome {
        if !tracker.needs_recovery_check() {
            return RecoveryOutcome::NotApplicable;
        }
        tracker.begin_check();

        let order_id = tracker.order.order_id.clone();
        let has_session = session_token.is_some_and(|t| !t.trim().is_empty());
        if order_id.is_empty() || !has_session {
            warn!(order_id = %order_id, has_session, "Recovery check skipped");
            tracker.finish_check(RecoveryState::Error);
            return RecoveryOutcome::Skipped;
        }

        debug!(order_id = %order_id, "Checking store for expired order");

        let store = Arc::clone(&self.store);
        let lookup_id = order_id.clone();
        let lookup = tokio::spawn(async move { store.find_by_order_id(&lookup_id).await });

        let result = match tokio::time::timeout(self.recovery_timeout, lookup).await {
            Ok(Ok(result)) => result.map_err(ReconcileError::from_query),
            Ok(Err(join_err)) => Err(ReconcileError::Unexpected(join_err.to_string())),
            Err(_) => {
                let e = ReconcileError::Timeout(self.recovery_timeout_ms);
                warn!(order_id = %order_id, error = %e, "Recovery lookup abandoned");
                self.notifier
                    .notify(NotificationKind::Error, e.title(), &e.to_string());
                tracker.finish_check(RecoveryState::Error);
                return RecoveryOutcome::TimedOut;
            }
        };

        match result {
            Ok(Some(record)) => {
                tokio::time::sleep(self.settle_delay).await;
                if let Some(raw) = record.raw_api_response {
                    tracker.order.raw_api_response = Some(raw);
                }
                tracker.order.current_status = OrderStatus::Completed;
                tracker.finish_check(RecoveryState::Recovered);

                info!(order_id = %order_id, "Expired order recovered as completed");
                self.notifier.notify(
                    NotificationKind::Info,
                    "Order completed",
                    &format!("Order {} was completed by the exchange", order_id),
                );
                RecoveryOutcome::Recovered
            }
            Ok(None) => {
                tokio::time::sleep(self.settle_delay).await;
                tracker.finish_check(RecoveryState::NotFound);
                debug!(order_id = %order_id, "No stored transaction, order stays expired");
                RecoveryOutcome::NotFound
            }
            Err(e) => {
                error!(order_id = %order_id, code = e.code(), error = %e, "Recovery check failed");
                self.notifier
                    .notify(NotificationKind::Error, e.title(), &e.to_string());
                tracker.finish_check(RecoveryState::Error);
                RecoveryOutcome::Failed(e)
            }
        }
    }
}

//! Transactions table DDL
//!
//! `ff_order_id` is unique: the store rejects a second save of the same
//! order with SQLSTATE 23505.

use sqlx::PgPool;

pub const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bridge_transactions_tb (
    id                  BIGSERIAL PRIMARY KEY,
    ff_order_id         VARCHAR(64) NOT NULL,
    status              VARCHAR(16) NOT NULL,
    raw_api_response    JSONB,
    client_metadata     JSONB,
    amount              NUMERIC(36, 18) NOT NULL,
    from_currency       VARCHAR(32) NOT NULL,
    to_currency         VARCHAR(32) NOT NULL,
    destination_address TEXT NOT NULL,
    deposit_address     TEXT NOT NULL,
    expiration_time     TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT bridge_transactions_ff_order_id_key UNIQUE (ff_order_id)
)
"#;

pub const CREATE_STATUS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_bridge_transactions_status
    ON bridge_transactions_tb (status, created_at)
"#;

/// Create the transactions table if it does not exist. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing bridge transaction schema...");

    sqlx::query(CREATE_TRANSACTIONS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_STATUS_INDEX).execute(pool).await?;

    tracing::info!("Bridge transaction schema ready");
    Ok(())
}

//! swapbridge - operator binary
//!
//! ```text
//! swapbridge [--env ENV] currencies
//! swapbridge [--env ENV] quote FROM TO AMOUNT [fixed|float]
//! swapbridge [--env ENV] track ORDER_ID TOKEN SESSION
//! ```
//!
//! `track` polls an existing order until it settles, saving it on
//! completion and checking the store when it expires.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, bail};
use rust_decimal::Decimal;

use swapbridge::client_env::StaticEnvironment;
use swapbridge::config::AppConfig;
use swapbridge::db::Database;
use swapbridge::notify::TracingNotifier;
use swapbridge::{
    CurrencyCatalog, ExchangeApi, HttpExchangeApi, InMemoryTransactionStore, OrderService,
    OrderTracker, OrderType, PgTransactionStore, PriceService, Reconciler, StatusPoller,
    TransactionStore,
};

const USAGE: &str = "usage: swapbridge [--env ENV] <currencies | quote FROM TO AMOUNT [fixed|float] | track ORDER_ID TOKEN SESSION>";

fn get_env(args: &[String]) -> String {
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Positional arguments with `--env VALUE` removed
fn positional(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args.iter().skip(1) {
        if skip {
            skip = false;
            continue;
        }
        if arg == "--env" || arg == "-e" {
            skip = true;
            continue;
        }
        out.push(arg.clone());
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let env = get_env(&args);
    let command = positional(&args);

    let config = AppConfig::load(&env).with_context(|| format!("loading config for '{}'", env))?;
    let _log_guard = swapbridge::logging::init_logging(&config);

    tracing::info!(env = %env, "Starting swapbridge");

    let api: Arc<dyn ExchangeApi> = Arc::new(HttpExchangeApi::new(&config.exchange)?);

    match command.first().map(String::as_str) {
        Some("currencies") => list_currencies(&config, api).await,
        Some("quote") => quote(&config, api, &command[1..]).await,
        Some("track") => track(&config, api, &command[1..]).await,
        _ => bail!(USAGE),
    }
}

async fn list_currencies(config: &AppConfig, api: Arc<dyn ExchangeApi>) -> anyhow::Result<()> {
    let catalog = CurrencyCatalog::new(api, config.catalog.ttl_secs);
    for c in catalog.available().await {
        println!(
            "{:<10} {:<24} {:<10} send={} recv={}",
            c.code,
            c.name,
            c.network,
            c.can_send(),
            c.can_receive()
        );
    }
    Ok(())
}

async fn quote(config: &AppConfig, api: Arc<dyn ExchangeApi>, args: &[String]) -> anyhow::Result<()> {
    let [from, to, amount, rest @ ..] = args else {
        bail!(USAGE);
    };
    let amount = Decimal::from_str(amount).with_context(|| format!("invalid amount '{}'", amount))?;
    let order_type = match rest.first() {
        Some(t) => OrderType::from_str(t)?,
        None => OrderType::Float,
    };

    let pricing = PriceService::new(api, config.pricing.quote_ttl_secs);
    let Some(q) = pricing.quote(from, to, amount, order_type).await else {
        bail!("no quote available for {} {} -> {}", amount, from, to);
    };

    println!(
        "{} {} -> {} {} (rate {}, {:?}, expires {})",
        q.from_amount, q.from_currency, q.to_amount, q.to_currency, q.rate, q.source, q.expires_at
    );
    if !q.within_limits() {
        println!("amount outside limits [{}, {}]", q.min_amount, q.max_amount);
    }
    for w in &q.warnings {
        println!("warning: {}", w);
    }
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn TransactionStore>> {
    match &config.postgres_url {
        Some(url) => {
            let db = Database::connect(url, &config.database)
                .await
                .context("connecting to PostgreSQL")?;
            db.health_check().await?;
            db.ensure_schema().await?;
            tracing::info!("Using PostgreSQL transaction store");
            Ok(Arc::new(PgTransactionStore::new(db.pool().clone())))
        }
        None => {
            tracing::warn!("postgres_url not set, transactions are kept in memory only");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
    }
}

async fn track(config: &AppConfig, api: Arc<dyn ExchangeApi>, args: &[String]) -> anyhow::Result<()> {
    let [order_id, token, session, ..] = args else {
        bail!(USAGE);
    };

    let store = open_store(config).await?;
    let reconciler = Arc::new(Reconciler::new(
        store,
        Arc::new(TracingNotifier),
        Arc::new(StaticEnvironment::new(config.client.clone())),
        &config.reconciler,
    ));
    let orders = Arc::new(OrderService::new(api));

    let order = orders.load_order(order_id, token).await?;
    let mut tracker = OrderTracker::new(order);

    let poller = StatusPoller::new(orders, reconciler, config.poller.clone());
    let status = poller.track(&mut tracker, Some(session)).await;

    println!(
        "order {} is {} (saved: {})",
        tracker.order.order_id,
        status,
        tracker.is_saved()
    );
    Ok(())
}

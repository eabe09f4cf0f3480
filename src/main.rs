//! Server entrypoint: config, pool, adapters, router, serve.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loop_ledger::adapters::auth::{SupabaseConfig, SupabaseSessionValidator};
use loop_ledger::adapters::http::{router, AppState};
use loop_ledger::adapters::postgres::PostgresLedgerStore;
use loop_ledger::adapters::stripe::{StripeCheckoutAdapter, StripeConfig};
use loop_ledger::application::{AdminPolicy, CheckoutHandler, LedgerService, PaymentWebhookHandler};
use loop_ledger::config::AppConfig;
use loop_ledger::domain::payment::WebhookVerifier;
use loop_ledger::ports::{LedgerStore, PaymentProvider, SessionValidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loop_ledger=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store: Arc<dyn LedgerStore> = Arc::new(PostgresLedgerStore::new(pool));

    let validator: Arc<dyn SessionValidator> =
        Arc::new(SupabaseSessionValidator::new(SupabaseConfig::new(
            config.auth.supabase_url.clone(),
            config.auth.supabase_anon_key.clone(),
        ))?);

    let provider: Arc<dyn PaymentProvider> = Arc::new(StripeCheckoutAdapter::new(
        StripeConfig::new(config.payment.stripe_api_key.clone()),
    ));

    let verifier = WebhookVerifier::new(config.payment.stripe_webhook_secret.expose_secret());

    let state = AppState {
        ledger: Arc::new(LedgerService::new(Arc::clone(&store), config.quota)),
        admin_policy: AdminPolicy::new(config.auth.admin_allow_list()),
        webhook: Arc::new(PaymentWebhookHandler::new(
            verifier,
            Arc::clone(&store),
            config.quota,
        )),
        checkout: Arc::new(CheckoutHandler::new(
            provider,
            &config.payment,
            &config.server,
        )),
        validator,
    };

    let app = router(state);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // Best effort: if the handler cannot be installed, run until killed.
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received, stopping server");
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfare_api::{app, state::{AppState, AuthConfig}};
use wayfare_catalog::PricingEngine;
use wayfare_order::{BookingManager, BookingMaterializer, CheckoutService, OrderIssuer, VerificationGate};
use wayfare_store::{
    app_config::Config, DbClient, RazorpayGateway, RedisClient, StoreBookingRepository,
    StoreCatalogRepository, StorePaymentRecordRepository, StoreUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wayfare_api=debug,wayfare_order=debug,wayfare_catalog=debug,wayfare_store=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(environment = %config.server.environment, "Starting Wayfare API on port {}", config.server.port);

    let db = match DbClient::connect_with_retry(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Could not reach the database, exiting: {}", e);
            std::process::exit(1);
        }
    };
    db.migrate().await.context("Failed to run migrations")?;

    let rate_limiter = match config.redis.url.as_deref() {
        Some(url) => match RedisClient::new(url).await {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("Redis unavailable, rate limiting disabled: {}", e);
                None
            }
        },
        None => {
            tracing::info!("No Redis configured, rate limiting disabled");
            None
        }
    };

    let catalog = Arc::new(StoreCatalogRepository::new(db.pool.clone()));
    let payments = Arc::new(StorePaymentRecordRepository::new(db.pool.clone()));
    let bookings = Arc::new(StoreBookingRepository::new(db.pool.clone()));
    let users = Arc::new(StoreUserRepository::new(db.pool.clone()));
    let gateway = Arc::new(
        RazorpayGateway::from_config(&config.gateway).context("Failed to build gateway client")?,
    );

    let checkout = CheckoutService::new(
        PricingEngine::new(catalog.clone(), catalog.clone(), catalog),
        OrderIssuer::new(gateway, config.gateway.currency.clone()),
        payments.clone(),
        VerificationGate::new(
            config.gateway.key_secret.clone(),
            payments.clone(),
            BookingMaterializer::new(bookings.clone(), users),
        ),
    );

    let app_state = AppState {
        checkout: Arc::new(checkout),
        bookings: Arc::new(BookingManager::new(bookings, payments)),
        rate_limiter,
        rate_limit: config.rate_limit.clone(),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
        hide_error_details: config.server.is_production(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

//! # Complaint Desk Binary
//!
//! The entry point that assembles the application based on compile-time
//! features and runtime settings.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::web::{build_app, AppState};
use api_adapters::Metrics;
use auth_adapters::{Argon2Hasher, JwtSessionIssuer};
use configs::{DatabaseSettings, LogFormat, LogSettings, Settings};
use domains::{AccountRepo, Clock, ComplaintRepo, SystemClock};
use secrecy::ExposeSecret;
use services::{seed, AccountService, ComplaintService, ReplyService};
use storage_adapters::{InMemoryAccountRepo, InMemoryComplaintRepo};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings.log);

    if settings.uses_dev_secret() {
        tracing::warn!("auth.jwt_secret is the built-in development secret; set APP__AUTH__JWT_SECRET");
    }

    // 1. Initialize storage
    let (complaint_repo, account_repo) = build_repos(&settings.database).await?;

    // 2. Initialize identity provider adapters
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let hasher = Arc::new(Argon2Hasher::new());
    let sessions = Arc::new(JwtSessionIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::minutes(settings.auth.session_ttl_minutes),
    ));

    // 3. Services
    let complaints = ComplaintService::new(complaint_repo.clone(), clock.clone());
    let replies = ReplyService::new(complaint_repo, clock.clone());
    let accounts = AccountService::new(account_repo, hasher, clock);

    if settings.seed.demo_data {
        seed::seed_demo_data(
            &accounts,
            &complaints,
            &replies,
            settings.seed.demo_password.expose_secret(),
        )
        .await
        .context("failed to seed demo data")?;
    }

    // 4. HTTP
    let state = AppState {
        complaints,
        replies,
        accounts,
        sessions,
        metrics: Arc::new(Metrics::new()),
    };
    let app = build_app(state, &settings.server.cors_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Complaint Desk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_repos(
    database: &DatabaseSettings,
) -> anyhow::Result<(Arc<dyn ComplaintRepo>, Arc<dyn AccountRepo>)> {
    #[cfg(feature = "db-postgres")]
    if let Some(url) = &database.url {
        use storage_adapters::postgres;

        let pool = postgres::connect(url.expose_secret(), database.max_connections)
            .await
            .context("failed to connect to PostgreSQL")?;
        postgres::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("using PostgreSQL store");

        return Ok((
            Arc::new(postgres::PgComplaintRepo::new(pool.clone())),
            Arc::new(postgres::PgAccountRepo::new(pool)),
        ));
    }

    #[cfg(not(feature = "db-postgres"))]
    if database.url.is_some() {
        tracing::warn!("database.url is set but this build lacks `db-postgres`; ignoring it");
    }

    tracing::info!("using in-memory store; data is lost on restart");
    Ok((
        Arc::new(InMemoryComplaintRepo::new()),
        Arc::new(InMemoryAccountRepo::new()),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

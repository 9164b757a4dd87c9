use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sb_api::{create_app, AppState, Collaborators};
use sb_core::services::auth::Mailer;
use sb_core::services::oauth::OAuthProvider;
use sb_core::services::HealthCheck;
use sb_infra::cache::{RedisClient, RedisOtpStore, RedisSessionStore};
use sb_infra::database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use sb_infra::mail::{LogMailer, SmtpMailer};
use sb_infra::memory::{
    InMemoryOtpStore, InMemorySessionStore, InMemoryTokenRepository, InMemoryUserRepository,
};
use sb_infra::oauth::GoogleOAuthClient;
use sb_shared::config::{AppConfig, LogFormat, LoggingConfig, MailBackend, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage,
        "Starting SaaSBoard auth API"
    );

    let (collaborators, pool) = build_collaborators(&config).await?;
    let state = web::Data::new(
        AppState::build(&config, collaborators).context("Failed to build application state")?,
    );

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    tracing::info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.colored);

    match logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Also returns the MySQL pool, when there is one, so it can be closed on shutdown
async fn build_collaborators(
    config: &AppConfig,
) -> anyhow::Result<(Collaborators, Option<DatabasePool>)> {
    if !config.google.is_configured() {
        tracing::warn!("GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET not set; Google login will fail");
    }
    let oauth_provider: Arc<dyn OAuthProvider> = Arc::new(
        GoogleOAuthClient::new(config.google.clone()).context("Failed to build Google client")?,
    );
    let mailer = build_mailer(config)?;

    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all sessions are lost on restart");
            let collaborators = Collaborators {
                users: Arc::new(InMemoryUserRepository::new()),
                tokens: Arc::new(InMemoryTokenRepository::new()),
                otps: Arc::new(InMemoryOtpStore::new()),
                sessions: Arc::new(InMemorySessionStore::new()),
                mailer,
                oauth_provider,
                health_checks: Vec::new(),
            };
            Ok((collaborators, None))
        }
        StorageBackend::External => {
            let pool = DatabasePool::new(&config.database)
                .await
                .context("Failed to connect to MySQL")?;
            pool.run_migrations()
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database pool ready: {}", pool.get_statistics());

            let redis = RedisClient::new(config.cache.clone())
                .await
                .context("Failed to connect to Redis")?;

            let collaborators = Collaborators {
                users: Arc::new(MySqlUserRepository::new(pool.get_pool().clone())),
                tokens: Arc::new(MySqlTokenRepository::new(pool.get_pool().clone())),
                otps: Arc::new(RedisOtpStore::new(redis.clone(), config.auth.otp.ttl_seconds)),
                sessions: Arc::new(RedisSessionStore::new(redis.clone())),
                mailer,
                oauth_provider,
                health_checks: vec![
                    Arc::new(pool.clone()) as Arc<dyn HealthCheck>,
                    Arc::new(redis) as Arc<dyn HealthCheck>,
                ],
            };
            Ok((collaborators, Some(pool)))
        }
    }
}

fn build_mailer(config: &AppConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match config.mail.backend {
        MailBackend::Smtp => {
            let mailer =
                SmtpMailer::new(&config.mail.smtp, config.google.post_login_redirect.clone())
                    .context("Failed to build SMTP mailer")?;
            Ok(Arc::new(mailer))
        }
        MailBackend::Log => {
            tracing::warn!("MAIL_BACKEND=log: OTP codes are written to the log, not emailed");
            Ok(Arc::new(LogMailer::new()))
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use api::auth::{TokenConfig, TokenService};
use api::db::{self, PgPool, PgStore};
use tracing_subscriber::EnvFilter;

use server::{router, AppState, Settings};

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;
    let token_config = TokenConfig::new(&settings.auth.secret)
        .map_err(anyhow::Error::msg)
        .context("auth.secret (AUTH_SECRET) must be set")?;

    let pool = connect(&settings.database.url()).await?;
    db::migrate(&pool).await.context("Failed to run migrations")?;

    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        TokenService::new(&token_config),
    );
    let app = router(state);

    let addr = settings.http.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// The database may still be starting when the server comes up.
async fn connect(url: &str) -> anyhow::Result<PgPool> {
    let mut attempt = 1;
    loop {
        match db::connect(url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                tracing::warn!(attempt, error = %e, "database not ready, retrying");
                tokio::time::sleep(CONNECT_BACKOFF).await;
                attempt += 1;
            }
            Err(e) => return Err(e).context("Failed to connect to database"),
        }
    }
}

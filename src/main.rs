use chrono::Duration;
use internship_server::core::{AppState, Config, CredentialCodec};
use internship_server::create_router;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Inizializza il logging, livello da RUST_LOG (default info)
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    // Carica la configurazione
    let config = Config::from_env()?;
    config.print_info();

    let codec = CredentialCodec::new(
        &config.jwt_secret,
        Duration::minutes(config.access_token_expire_minutes),
        config.bcrypt_cost,
    );

    // Crea lo stato: MySQL se configurato, altrimenti store in memoria
    let state = match &config.database_url {
        Some(url) => {
            let pool = MySqlPoolOptions::new()
                .max_connections(config.max_connections)
                .max_lifetime(std::time::Duration::from_secs(config.connection_lifetime_secs))
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database connected and migrations applied");
            AppState::new(pool, codec, config.allow_admin_registration)
        }
        None => {
            warn!("Running with the in-memory store, data is lost on shutdown");
            AppState::in_memory(codec, config.allow_admin_registration)
        }
    };

    // Crea il router
    let app = create_router(Arc::new(state));

    // Crea il listener TCP
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    // Avvia il server
    axum::serve(listener, app).await?;

    Ok(())
}

use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

#[derive(Debug, Clone)]
pub struct Config {
    /// Assente: il server usa lo store in memoria
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub connection_lifetime_secs: u64,
    pub app_env: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub allow_admin_registration: bool,
}

/// Legge una variabile numerica, usando `default` se non impostata
fn parse_var<T: FromStr>(name: &str, default: T, hint: &str) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {name}: {hint}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = parse_var(
            "SERVER_PORT",
            3000u16,
            "must be a number between 0-65535",
        )?;

        let max_connections = parse_var("MAX_DB_CONNECTIONS", 10u32, "must be a positive number")?;

        let connection_lifetime_secs = parse_var(
            "DB_CONNECTION_LIFETIME_SECS",
            1800u64,
            "must be a positive number",
        )?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        // 7 giorni
        let access_token_expire_minutes = parse_var(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            60 * 24 * 7i64,
            "must be a number of minutes",
        )?;
        if access_token_expire_minutes <= 0 {
            return Err("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: must be greater than 0".to_string());
        }

        let bcrypt_cost = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST, "must be between 4 and 31")?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err("Invalid BCRYPT_COST: must be between 4 and 31".to_string());
        }

        let allow_admin_registration = parse_var(
            "ALLOW_ADMIN_REGISTRATION",
            false,
            "must be true or false",
        )?;

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            connection_lifetime_secs,
            app_env,
            access_token_expire_minutes,
            bcrypt_cost,
            allow_admin_registration,
        })
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        match &self.database_url {
            Some(url) => info!("   Database: {}", Self::mask_url(url)),
            None => warn!("   Database: DATABASE_URL not set, using the in-memory store"),
        }
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Connection Lifetime: {}s", self.connection_lifetime_secs);
        info!("   Token Lifetime: {} minutes", self.access_token_expire_minutes);
        info!("   Bcrypt Cost: {}", self.bcrypt_cost);
        info!("   Admin Registration: {}", self.allow_admin_registration);
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera l'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let (Some(at_pos), Some(scheme_end)) = (url.rfind('@'), url.find("://")) {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
        "***".to_string()
    }
}

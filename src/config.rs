use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub db_max_connections: u32,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("REGISTRY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid REGISTRY_HOST: {e}"))?;

        let port: u16 = env_or("REGISTRY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid REGISTRY_PORT: {e}"))?;

        let max_body_size: usize = env_or("REGISTRY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid REGISTRY_MAX_BODY_SIZE: {e}"))?;

        let db_max_connections: u32 = env_or("REGISTRY_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid REGISTRY_DB_MAX_CONNECTIONS: {e}"))?;

        let trusted_proxies = parse_trusted_proxies(&env_or("REGISTRY_TRUSTED_PROXIES", ""))?;

        let log_level = env_or("REGISTRY_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            max_body_size,
            db_max_connections,
            trusted_proxies,
            log_level,
        })
    }
}

/// Parse a comma-separated CIDR list, ignoring blank entries.
pub fn parse_trusted_proxies(raw: &str) -> Result<Vec<IpNet>, String> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .map_err(|e| format!("Invalid REGISTRY_TRUSTED_PROXIES entry '{s}': {e}"))
        })
        .collect()
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

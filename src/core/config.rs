use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

/// Segreto di fallback per sviluppo locale. Mai accettato con APP_ENV=production.
pub const DEFAULT_JWT_SECRET: &str = "dev-insecure-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Costruisce la configurazione a partire da una funzione di lookup delle variabili
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| "DATABASE_URL must be set in .env file".to_string())?;

        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if app_env == "production" => {
                return Err("JWT_SECRET must be set when APP_ENV=production".to_string());
            }
            None => {
                warn!("JWT_SECRET not set, using default (not secure for production!)");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        if app_env == "production" && jwt_secret == DEFAULT_JWT_SECRET {
            return Err("JWT_SECRET must not be the default when APP_ENV=production".to_string());
        }

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = lookup("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            app_env,
        })
    }

    /// Legge solo DATABASE_URL (usato dai tool amministrativi che non firmano token)
    pub fn database_url_from_env() -> Result<String, String> {
        dotenv().ok();
        env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set in .env file".to_string())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Server Configuration:");
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}:{}", self.server_host, self.server_port);
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        if self.uses_default_secret() {
            warn!("   JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("   JWT Secret: custom secret configured");
        }
    }

    /// Maschera l'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_database_url() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://localhost/db")]))
            .unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.app_env, "development");
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_missing_database_url_fails() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_production_refuses_default_secret() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("APP_ENV", "production"),
        ]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("APP_ENV", "production"),
            ("JWT_SECRET", ""),
        ]));
        assert!(result.is_err());

        // anche se impostato esplicitamente
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("APP_ENV", "production"),
            ("JWT_SECRET", DEFAULT_JWT_SECRET),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_default_secret_allowed_outside_production() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("JWT_SECRET", DEFAULT_JWT_SECRET),
        ]))
        .unwrap();
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_production_with_secret() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("APP_ENV", "production"),
            ("JWT_SECRET", "a-real-secret"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "a-real-secret");
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_invalid_port_fails() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("SERVER_PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_url_hides_credentials() {
        assert_eq!(
            Config::mask_url("mysql://root:hunter2@db:3306/app"),
            "mysql://***@db:3306/app"
        );
        assert_eq!(Config::mask_url("no-credentials"), "***");
    }
}

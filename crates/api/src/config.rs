use crate::auth::jwt::JwtConfig;
use crate::enrichment::geo::GeoConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Dashboard operator credentials.
    pub admin: AdminConfig,
    /// IP geolocation provider.
    pub geo: GeoConfig,
}

/// The single dashboard operator account.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl AdminConfig {
    /// Load operator credentials from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `ADMIN_USERNAME`      | no       | `admin` |
    /// | `ADMIN_PASSWORD_HASH` | **yes**  | --      |
    ///
    /// # Panics
    ///
    /// Panics if `ADMIN_PASSWORD_HASH` is not set or is empty. Generate one
    /// with the `agency-hash-password` binary.
    pub fn from_env() -> Self {
        let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set in the environment");
        assert!(
            !password_hash.is_empty(),
            "ADMIN_PASSWORD_HASH must not be empty"
        );
        Self {
            username,
            password_hash,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    ///
    /// JWT, admin and geolocation settings are documented on their own
    /// config types.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            geo: GeoConfig::from_env(),
        }
    }
}

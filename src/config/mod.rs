use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
    pub images: ImageHostConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHostConfig {
    pub upload_url: Option<String>,
    pub folder: String,
}

/// Rate limiting is enforced by the fronting proxy; these knobs are
/// configuration surface only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5000 },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret: "quill-dev-secret-do-not-use-in-prod".to_string(),
                token_ttl_secs: 3600,
                // Low cost keeps local iteration fast; production uses the bcrypt default
                bcrypt_cost: 4,
            },
            images: ImageHostConfig { upload_url: None, folder: "avatars".to_string() },
            api: ApiConfig {
                enable_rate_limiting: false,
                rate_limit_requests: 100,
                rate_limit_window_secs: 1200,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5000 },
            store: StoreConfig {
                backend: StoreBackend::Postgres,
                database_url: None,
                max_connections: 20,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: 3600,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            images: ImageHostConfig { upload_url: None, folder: "avatars".to_string() },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 1200,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("QUILL_PORT").or_else(|_| env::var("PORT")) {
            if let Ok(port) = v.parse() {
                self.server.port = port;
            }
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            match v.as_str() {
                "memory" => self.store.backend = StoreBackend::Memory,
                "postgres" => self.store.backend = StoreBackend::Postgres,
                other => tracing::warn!("unknown STORE_BACKEND '{}', keeping default", other),
            }
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.store.database_url = Some(v);
        }
        if let Ok(v) = env::var("STORE_MAX_CONNECTIONS") {
            self.store.max_connections = v.parse().unwrap_or(self.store.max_connections);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_TTL_SECS") {
            self.security.token_ttl_secs = v.parse().unwrap_or(self.security.token_ttl_secs);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Image host overrides
        if let Ok(v) = env::var("IMAGE_HOST_UPLOAD_URL") {
            self.images.upload_url = Some(v);
        }
        if let Ok(v) = env::var("IMAGE_HOST_FOLDER") {
            self.images.folder = v;
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs =
                v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }

        self
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration singleton, loaded once from the environment
pub fn config() -> &'static AppConfig {
    &CONFIG
}

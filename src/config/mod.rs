use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub filter: FilterConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Seconds allowed for the initial connection attempt
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<i64>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub jwt_cookie_expiry_days: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            self.storage.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "postgres" | "postgresql" => StorageBackend::Postgres,
                _ => self.storage.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.storage.database_url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.storage.max_connections = v.parse().unwrap_or(self.storage.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.storage.connection_timeout = v.parse().unwrap_or(self.storage.connection_timeout);
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = match v.trim().to_ascii_lowercase().as_str() {
                "none" | "off" => None,
                other => other.parse().ok().or(self.filter.max_limit),
            };
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_IN_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("JWT_COOKIE_EXPIRES_IN_DAYS") {
            self.security.jwt_cookie_expiry_days = v.parse().unwrap_or(self.security.jwt_cookie_expiry_days);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Upload overrides
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_BYTES") {
            self.uploads.max_bytes = v.parse().unwrap_or(self.uploads.max_bytes);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                database_url: None,
                max_connections: 10,
                connection_timeout: 5,
            },
            filter: FilterConfig {
                max_limit: Some(1000),
                debug_logging: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                cors_origins: vec![],
                secure_cookies: false,
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                jwt_cookie_expiry_days: 7,
                bcrypt_cost: 10,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: 5 * 1024 * 1024, // 5MB
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                database_url: None,
                max_connections: 20,
                connection_timeout: 5,
            },
            filter: FilterConfig {
                max_limit: Some(500),
                debug_logging: false,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                secure_cookies: true,
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                jwt_cookie_expiry_days: 1,
                bcrypt_cost: 12,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: 5 * 1024 * 1024,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                backend: StorageBackend::Postgres,
                database_url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            filter: FilterConfig {
                max_limit: Some(100),
                debug_logging: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                secure_cookies: true,
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                jwt_cookie_expiry_days: 1,
                bcrypt_cost: 12,
            },
            uploads: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_bytes: 5 * 1024 * 1024,
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

// Global singleton config - read once at startup, then handed to AppState by value
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::scoring::ScoringConfig;

pub const DEFAULT_STORE_PATH: &str = "data/ranking_sac.csv";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let backend = match env::var("STORE_BACKEND") {
            Ok(value) => StorageBackend::parse(&value)?,
            Err(_) => StorageBackend::Csv,
        };
        let path = env::var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));
        let timeout_ms = match env::var("STORE_TIMEOUT_MS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidStoreTimeout { value })?,
            Err(_) => DEFAULT_STORE_TIMEOUT_MS,
        };

        let secret = env::var("ADMIN_SECRET")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let mut scoring = ScoringConfig::default();
        if let Ok(directive) = env::var("SCORING_OOS_SCALE") {
            scoring
                .apply_oos_directive(&directive)
                .map_err(|reason| ConfigError::InvalidOosScale { reason })?;
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                backend,
                path,
                timeout: Duration::from_millis(timeout_ms),
            },
            admin: AdminConfig { secret },
            scoring,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Csv,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "csv" | "file" => Ok(Self::Csv),
            _ => Err(ConfigError::InvalidStoreBackend {
                value: value.to_string(),
            }),
        }
    }
}

/// Where evaluation records live and how long a store call may take.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub timeout: Duration,
}

/// Administrative access. No secret means the admin surface is disabled.
#[derive(Clone, Default)]
pub struct AdminConfig {
    pub secret: Option<String>,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("enabled", &self.secret.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStoreBackend { value: String },
    InvalidStoreTimeout { value: String },
    InvalidOosScale { reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStoreBackend { value } => {
                write!(f, "STORE_BACKEND must be 'memory' or 'csv', got '{value}'")
            }
            ConfigError::InvalidStoreTimeout { value } => write!(
                f,
                "STORE_TIMEOUT_MS must be a positive number of milliseconds, got '{value}'"
            ),
            ConfigError::InvalidOosScale { reason } => {
                write!(f, "SCORING_OOS_SCALE is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStoreBackend { .. }
            | ConfigError::InvalidStoreTimeout { .. }
            | ConfigError::InvalidOosScale { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{OosScale, Profile};
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "STORE_BACKEND",
            "STORE_PATH",
            "STORE_TIMEOUT_MS",
            "ADMIN_SECRET",
            "SCORING_OOS_SCALE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Csv);
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.storage.timeout, Duration::from_millis(5_000));
        assert!(config.admin.secret.is_none());
        assert_eq!(
            config.scoring.oos_scale(Profile::AptSupervisor),
            OosScale::PercentagePoints
        );
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_storage_admin_and_scoring_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORE_BACKEND", "memory");
        env::set_var("STORE_TIMEOUT_MS", "250");
        env::set_var("ADMIN_SECRET", " hunter2 ");
        env::set_var("SCORING_OOS_SCALE", "apt_supervisor=fraction");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.timeout, Duration::from_millis(250));
        assert_eq!(config.admin.secret.as_deref(), Some("hunter2"));
        assert!(!format!("{:?}", config.admin).contains("hunter2"));
        assert_eq!(
            config.scoring.oos_scale(Profile::AptSupervisor),
            OosScale::Fraction
        );
        assert_eq!(
            config.scoring.oos_scale(Profile::AptEmbottledSupervisor),
            OosScale::PercentagePoints
        );
    }

    #[test]
    fn rejects_invalid_store_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("STORE_BACKEND", "postgres");
        let backend = AppConfig::load();
        reset_env();
        env::set_var("STORE_TIMEOUT_MS", "0");
        let timeout = AppConfig::load();
        reset_env();

        assert!(matches!(
            backend,
            Err(ConfigError::InvalidStoreBackend { .. })
        ));
        assert!(matches!(
            timeout,
            Err(ConfigError::InvalidStoreTimeout { .. })
        ));
    }
}

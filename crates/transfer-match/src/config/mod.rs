use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the recommendation service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub completion: CompletionConfig,
    pub catalog: CatalogConfig,
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

        let completion_base_url = env::var("COMPLETION_BASE_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty());
        let completion_api_key = env::var("COMPLETION_API_KEY").unwrap_or_default();
        let completion_model =
            env::var("COMPLETION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let completion_timeout_secs = env::var("COMPLETION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "12".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;
        if completion_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let catalog_csv = env::var("CATALOG_CSV")
            .ok()
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            completion: CompletionConfig {
                base_url: completion_base_url,
                api_key: completion_api_key,
                model: completion_model,
                timeout: Duration::from_secs(completion_timeout_secs),
            },
            catalog: CatalogConfig { csv_path: catalog_csv },
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Settings for the generative-completion collaborator. When `base_url` is
/// unset the engine runs without AI augmentation and scores every top
/// candidate with a neutral factor.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: Option<String>,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn enabled(&self) -> bool {
        self.base_url.is_some()
    }
}

/// Where the college catalog comes from when the service boots offline.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "COMPLETION_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidTimeout => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("COMPLETION_BASE_URL");
        env::remove_var("COMPLETION_API_KEY");
        env::remove_var("COMPLETION_MODEL");
        env::remove_var("COMPLETION_TIMEOUT_SECS");
        env::remove_var("CATALOG_CSV");
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
        assert!(!config.completion.enabled());
        assert_eq!(config.completion.timeout, Duration::from_secs(12));
        assert!(config.catalog.csv_path.is_none());
    }

    #[test]
    fn completion_base_url_is_trimmed_and_enables_augmentation() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPLETION_BASE_URL", "https://ai.example.com/ ");
        let config = AppConfig::load().expect("config loads");
        assert!(config.completion.enabled());
        assert_eq!(
            config.completion.base_url.as_deref(),
            Some("https://ai.example.com")
        );
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COMPLETION_TIMEOUT_SECS", "0");
        let error = AppConfig::load().expect_err("zero timeout rejected");
        assert!(matches!(error, ConfigError::InvalidTimeout));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }
}

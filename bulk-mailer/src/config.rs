//! Service configuration
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. a TOML file (`bulk-mailer.toml` in the working directory, or `--config`)
//! 3. `BULKMAIL_<SECTION>__<KEY>` environment variables
//! 4. `PORT`, which replaces the port of `server.listen_addr`

use crate::batch::DispatchOptions;
use crate::error::{BulkMailError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file looked up when no path is given (extension inferred)
pub const DEFAULT_CONFIG_FILE: &str = "bulk-mailer";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "BULKMAIL";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dispatch: DispatchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    /// Per-message timeout; unset waits as long as the SMTP server does
    pub send_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let options = DispatchOptions::default();
        Self {
            batch_size: options.batch_size,
            batch_delay_ms: options.batch_delay.as_millis() as u64,
            send_timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl From<&DispatchConfig> for DispatchOptions {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
            send_timeout: config.send_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl AppConfig {
    /// Load configuration from every source
    ///
    /// A missing default file is fine; a missing explicit `path` is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut config: AppConfig = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            config.server.set_port(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a single TOML file, without environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BulkMailError::Config(e.to_string()))?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|e| BulkMailError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dispatch.batch_size == 0 {
            return Err(BulkMailError::Config(
                "dispatch.batch_size must be at least 1".to_string(),
            ));
        }

        if self.server.listen_addr.trim().is_empty() {
            return Err(BulkMailError::Config("server.listen_addr is empty".to_string()));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(BulkMailError::Config(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions::from(&self.dispatch)
    }
}

impl ServerConfig {
    /// Replace the port of `listen_addr`, keeping its host
    pub fn set_port(&mut self, port: &str) -> Result<()> {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|e| BulkMailError::Config(format!("invalid PORT '{}': {}", port, e)))?;

        let host = match self.listen_addr.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.listen_addr.as_str(),
        };
        self.listen_addr = format!("{}:{}", host, port);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};

    // `load` reads process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");

        let options = config.dispatch_options();
        assert_eq!(options.batch_size, 5);
        assert_eq!(options.batch_delay, Duration::from_secs(1));
        assert_eq!(options.send_timeout, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[server]
listen_addr = "127.0.0.1:9000"
allowed_origins = ["http://localhost:3000"]

[dispatch]
batch_size = 10
send_timeout_secs = 30
"#
        )
        .unwrap();

        let _guard = env_lock();
        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.dispatch.batch_size, 10);
        assert_eq!(config.dispatch.batch_delay_ms, 1000);
        assert_eq!(
            config.dispatch_options().send_timeout,
            Some(Duration::from_secs(30))
        );
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let _guard = env_lock();
        let result = AppConfig::load(Some(Path::new("/nonexistent/bulk-mailer.toml")));
        assert!(matches!(result, Err(BulkMailError::Config(_))));
    }

    #[test]
    fn test_load_env_overrides() {
        let _guard = env_lock();
        std::env::set_var("BULKMAIL_DISPATCH__BATCH_SIZE", "7");
        std::env::set_var(
            "BULKMAIL_SERVER__ALLOWED_ORIGINS",
            "http://a.com,http://b.com",
        );
        std::env::set_var("PORT", "9999");

        let result = AppConfig::load(None);

        std::env::remove_var("BULKMAIL_DISPATCH__BATCH_SIZE");
        std::env::remove_var("BULKMAIL_SERVER__ALLOWED_ORIGINS");
        std::env::remove_var("PORT");

        let config = result.unwrap();
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://a.com", "http://b.com"]
        );
        assert_eq!(config.dispatch.batch_size, 7);
        assert_eq!(config.dispatch.batch_delay_ms, 1000);
        assert_eq!(config.server.listen_addr, "0.0.0.0:9999");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[dispatch]
batch_size = 3
batch_delay_ms = 200

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(config.dispatch.batch_size, 3);
        assert_eq!(
            config.dispatch_options().batch_delay,
            Duration::from_millis(200)
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[dispatch]\nbatch_size = 0\n").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(BulkMailError::Config(_))
        ));

        assert!(AppConfig::from_file("/nonexistent/bulk-mailer.toml").is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = AppConfig::default();
        config.dispatch.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_port() {
        let mut server = ServerConfig::default();
        server.set_port("10000").unwrap();
        assert_eq!(server.listen_addr, "0.0.0.0:10000");

        assert!(server.set_port("http").is_err());
    }
}

//! Configuration management.

mod upstream;

pub use upstream::{DEFAULT_EQURAN_BASE_URL, KEMENAG_AYAH_URL, UpstreamConfig};

use secrecy::SecretString;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default database location, relative to the working directory.
const DEFAULT_DATABASE_PATH: &str = "data/alquran.db";

/// Default `SQLite` page cache per read connection, in KiB.
const DEFAULT_CACHE_SIZE_KIB: u32 = 8000;

/// Default number of idle read connections kept for reuse.
const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 8;

/// Default HTTP port.
const DEFAULT_PORT: u16 = 3000;

/// Deployment environment.
///
/// The admin mutation surface is disabled entirely in [`Environment::Production`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development (admin endpoints enabled).
    #[default]
    Development,
    /// Production deployment (admin endpoints disabled).
    Production,
}

impl Environment {
    /// Parses an environment name. Anything other than `production`/`prod`
    /// is treated as development.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Returns true for production deployments.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Database settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the `SQLite` file.
    pub path: PathBuf,
    /// Page cache per read connection in KiB (applied as a negative `cache_size`).
    pub cache_size_kib: u32,
    /// Maximum idle read connections kept for reuse.
    pub max_idle_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            cache_size_kib: DEFAULT_CACHE_SIZE_KIB,
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Observability settings as read from the config file.
///
/// Environment overrides are applied by the observability module.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilitySettings {
    /// Log format: `pretty` or `json`.
    pub log_format: Option<String>,
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// Whether the Prometheus recorder is installed.
    pub metrics_enabled: Option<bool>,
}

/// Main configuration for muslim-api.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Deployment environment.
    pub environment: Environment,
    /// Shared secret for the admin surface. `None` rejects every admin call.
    pub admin_api_key: Option<SecretString>,
    /// Third-party API locations and timeouts.
    pub upstream: UpstreamConfig,
    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Environment name.
    pub environment: Option<String>,
    /// Database section.
    pub database: Option<ConfigFileDatabase>,
    /// Server section.
    pub server: Option<ConfigFileServer>,
    /// Upstream section.
    pub upstream: Option<ConfigFileUpstream>,
    /// Observability section.
    pub observability: Option<ObservabilitySettings>,
}

/// Database section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDatabase {
    /// Database path.
    pub path: Option<String>,
    /// Cache size in KiB.
    pub cache_size_kib: Option<u32>,
    /// Idle connection cap.
    pub max_idle_connections: Option<usize>,
}

/// Server section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileServer {
    /// Bind host.
    pub host: Option<IpAddr>,
    /// Bind port.
    pub port: Option<u16>,
}

/// Upstream section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileUpstream {
    /// Hadith books API base URL.
    pub hadith_base_url: Option<String>,
    /// Holiday API base URL.
    pub holiday_base_url: Option<String>,
    /// Pesantren dataset base URL.
    pub pesantren_base_url: Option<String>,
    /// EQuran API base URL.
    pub equran_base_url: Option<String>,
    /// General request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Verification comparison timeout in milliseconds.
    pub verify_timeout_ms: Option<u64>,
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::operation("read_config_file", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`].
    pub fn from_toml_str(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::operation("parse_config_file", e))?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<platform config dir>/muslim-api/config.toml`, then
    /// `~/.config/muslim-api/config.toml`. Returns defaults when neither exists.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("muslim-api").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("muslim-api")
                .join("config.toml"),
        ];

        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `ApiConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(environment) = file.environment {
            config.environment = Environment::parse(&environment);
        }
        if let Some(database) = file.database {
            if let Some(path) = database.path {
                config.database.path = PathBuf::from(path);
            }
            if let Some(v) = database.cache_size_kib {
                config.database.cache_size_kib = v;
            }
            if let Some(v) = database.max_idle_connections {
                config.database.max_idle_connections = v;
            }
        }
        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
        }
        if let Some(upstream) = file.upstream {
            config.upstream.apply_file(upstream);
        }
        if let Some(observability) = file.observability {
            config.observability = observability;
        }

        config
    }

    /// Applies overrides from process environment variables.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using an arbitrary variable lookup.
    ///
    /// Recognized keys: `MUSLIM_API_DB_PATH`, `MUSLIM_API_HOST`,
    /// `MUSLIM_API_PORT`, `MUSLIM_API_ENV`, `ADMIN_API_KEY`,
    /// `MUSLIM_API_UPSTREAM_TIMEOUT_MS`. Blank values are ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var("MUSLIM_API_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(host) = var("MUSLIM_API_HOST").and_then(|v| v.parse().ok()) {
            self.server.host = host;
        }
        if let Some(port) = var("MUSLIM_API_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(env) = var("MUSLIM_API_ENV") {
            self.environment = Environment::parse(&env);
        }
        if let Some(key) = var("ADMIN_API_KEY") {
            self.admin_api_key = Some(SecretString::from(key));
        }
        if let Some(ms) = var("MUSLIM_API_UPSTREAM_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.upstream.timeout_ms = ms;
        }

        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = path.into();
        self
    }

    /// Sets the deployment environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the admin API key.
    #[must_use]
    pub fn with_admin_api_key(mut self, key: impl Into<String>) -> Self {
        self.admin_api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Replaces the upstream configuration.
    #[must_use]
    pub fn with_upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.upstream = upstream;
        self
    }
}

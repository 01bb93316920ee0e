//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: CRUD_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/crud-service/{service_name}/config.toml
//! 4. System directory: /etc/crud-service/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "entities"
//! port = 8080
//!
//! [crud]
//! base_path = "/e"
//! empty_list_as_ok = false
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::handlers::CrudOptions;

const APP_DIR: &str = "crud-service";
const ENV_PREFIX: &str = "CRUD_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// CRUD handler behaviour
    #[serde(default)]
    pub crud: CrudConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request tracking configuration (request IDs, header masking)
    #[serde(default)]
    pub request_tracking: RequestTrackingConfig,

    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl MiddlewareConfig {
    /// Body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb * 1024 * 1024
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_tracking: RequestTrackingConfig::default(),
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
        }
    }
}

/// Request tracking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTrackingConfig {
    /// Generate and echo `x-request-id`
    #[serde(default = "default_true")]
    pub request_id_enabled: bool,

    /// Mask credential headers in trace output
    #[serde(default = "default_true")]
    pub mask_sensitive_headers: bool,
}

impl Default for RequestTrackingConfig {
    fn default() -> Self {
        Self {
            request_id_enabled: true,
            mask_sensitive_headers: true,
        }
    }
}

/// CRUD handler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrudConfig {
    /// Path the entity routes are mounted under
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Render a `NotFound` from the list operation as `200 []`
    #[serde(default = "default_false")]
    pub empty_list_as_ok: bool,

    /// Map create failures through the manager instead of always answering 500
    #[serde(default = "default_false")]
    pub map_create_errors: bool,
}

impl CrudConfig {
    /// Handler options derived from this section
    pub fn options(&self) -> CrudOptions {
        CrudOptions {
            empty_list_as_ok: self.empty_list_as_ok,
            map_create_errors: self.map_create_errors,
        }
    }
}

impl Default for CrudConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            empty_list_as_ok: false,
            map_create_errors: false,
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_body_limit_mb() -> usize {
    10
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_base_path() -> String {
    "/e".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| APP_DIR.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let defaults = Config {
            service: ServiceConfig {
                name: service_name.to_string(),
                ..Config::default().service
            },
            ..Config::default()
        };

        let mut figment = Figment::new().merge(Serialized::defaults(defaults));

        // Lowest priority first so that higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories. Environment variables still
    /// take precedence over the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Config file paths for a service, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(APP_DIR)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_DIR.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            crud: CrudConfig::default(),
        }
    }
}

use std::collections::HashMap;
use std::time::Duration;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

/// PEM certificate chain and private key used to serve HTTPS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Reported by the health endpoint and sent as the fetch user agent
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Unset keeps the HTTP client's default behaviour
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub max_body_bytes: usize,
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

const DEFAULT_SERVICE_NAME: &str = "revocation-check";
const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("server.host", "localhost")?
            .set_default("server.port", 3000)?
            .set_default("service.name", DEFAULT_SERVICE_NAME)?
            .set_default("fetch.max_body_bytes", DEFAULT_MAX_BODY_BYTES as i64)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Should be in the format APP_SERVER__PORT or APP_FETCH__TIMEOUT_SECS
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}

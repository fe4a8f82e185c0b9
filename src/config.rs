// Configuration from environment variables (after `dotenvy::dotenv()`).
//
// | Env Var                   | Default                 |
// |---------------------------|-------------------------|
// | `BUDGET_API_HOST`         | `0.0.0.0`               |
// | `BUDGET_API_PORT`         | `3001`                  |
// | `BUDGET_API_URL`          | `http://localhost:3001` |
// | `BUDGET_API_TIMEOUT_SECS` | `10`                    |

use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;

/// Mock API server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("BUDGET_API_HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match lookup("BUDGET_API_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("BUDGET_API_PORT must be a valid port, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        Ok(ServerConfig { host, port })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
        }
    }
}

/// Where the UI finds the mock API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("BUDGET_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", DEFAULT_PORT));

        let timeout_secs: u64 = match lookup("BUDGET_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("BUDGET_API_TIMEOUT_SECS must be a whole number, got {:?}", raw)
            })?,
            None => 10,
        };

        Ok(ClientConfig {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_url(api_url: impl Into<String>) -> Self {
        ClientConfig {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: format!("http://localhost:{}", DEFAULT_PORT),
            timeout: Duration::from_secs(10),
        }
    }
}

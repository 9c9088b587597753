//! Connection settings for the NetBox API
//!
//! Settings are usually built in code with the `with_*` setters, or loaded
//! from `NETBOX_*` environment variables.

use crate::error::NetBoxError;
use std::env;
use std::time::Duration;

/// Default page size sent as `limit` on every GET
pub const DEFAULT_LIMIT: u32 = 1000;

/// Default HTTP port when TLS is disabled
pub const DEFAULT_PORT: u16 = 80;

/// Port forced when TLS is enabled
pub const TLS_PORT: u16 = 443;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings needed to open a [`Connection`](crate::Connection)
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// NetBox host name or address
    pub host: Option<String>,
    /// Port used when TLS is disabled
    pub port: u16,
    /// Use `https` (and port 443)
    pub use_tls: bool,
    /// Verify the server certificate
    pub verify_tls: bool,
    /// Page size passed as the `limit` query parameter
    pub limit: u32,
    /// API token, sent as `Authorization: Token <token>`
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            use_tls: true,
            verify_tls: true,
            limit: DEFAULT_LIMIT,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("verify_tls", &self.verify_tls)
            .field("limit", &self.limit)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create settings for `host` authenticated with `auth_token`
    pub fn new(host: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            auth_token: Some(auth_token.into()),
            ..Self::default()
        }
    }

    /// Set the plain-HTTP port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable TLS
    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Enable or disable certificate verification
    #[must_use]
    pub fn with_tls_verify(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load settings from `NETBOX_*` environment variables
    ///
    /// Recognized variables: `NETBOX_HOST`, `NETBOX_PORT`, `NETBOX_TOKEN`,
    /// `NETBOX_USE_TLS`, `NETBOX_VERIFY_TLS`, `NETBOX_LIMIT` and
    /// `NETBOX_TIMEOUT_SECS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, NetBoxError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NetBoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            host: lookup("NETBOX_HOST").filter(|h| !h.is_empty()),
            auth_token: lookup("NETBOX_TOKEN").filter(|t| !t.is_empty()),
            ..Self::default()
        };

        if let Some(port) = lookup("NETBOX_PORT") {
            config.port = parse_var("NETBOX_PORT", &port)?;
        }
        if let Some(use_tls) = lookup("NETBOX_USE_TLS") {
            config.use_tls = parse_bool("NETBOX_USE_TLS", &use_tls)?;
        }
        if let Some(verify) = lookup("NETBOX_VERIFY_TLS") {
            config.verify_tls = parse_bool("NETBOX_VERIFY_TLS", &verify)?;
        }
        if let Some(limit) = lookup("NETBOX_LIMIT") {
            config.limit = parse_var("NETBOX_LIMIT", &limit)?;
        }
        if let Some(secs) = lookup("NETBOX_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_var("NETBOX_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Port actually dialed: 443 with TLS, the configured port otherwise
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        if self.use_tls { TLS_PORT } else { self.port }
    }

    /// API root, `{scheme}://{host}:{port}/api`
    pub fn base_url(&self) -> Result<String, NetBoxError> {
        let host = self.host()?;
        let scheme = if self.use_tls { "https" } else { "http" };
        Ok(format!("{}://{}:{}/api", scheme, host, self.effective_port()))
    }

    /// Configured host, or a configuration error when it is missing
    pub fn host(&self) -> Result<&str, NetBoxError> {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| NetBoxError::Configuration("NetBox host is required".to_string()))
    }

    /// Configured token, or a configuration error when it is missing
    pub fn auth_token(&self) -> Result<&str, NetBoxError> {
        self.auth_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                NetBoxError::Configuration(
                    "Please provide an authorization token for the NetBox API".to_string(),
                )
            })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, NetBoxError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        NetBoxError::Configuration(format!("{} has an invalid value {:?}: {}", key, value, e))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, NetBoxError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NetBoxError::Configuration(format!(
            "{} must be a boolean, got: {}",
            key, value
        ))),
    }
}

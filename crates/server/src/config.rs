//! Server configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;
use pagecut_core::{ExtractConfig, FetchConfig};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Domain accepted when `ALLOWED_DOMAINS` is unset.
pub const DEFAULT_ALLOWED_DOMAIN: &str = "safeguardglobal.com";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Host substrings a requested URL must contain
    pub allowed_domains: Vec<String>,
    /// Upstream fetch timeout in seconds
    pub fetch_timeout: u64,
    pub embed_title: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            allowed_domains: vec![DEFAULT_ALLOWED_DOMAIN.to_string()],
            fetch_timeout: FetchConfig::default().timeout,
            embed_title: false,
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `BIND_ADDR`, `ALLOWED_DOMAINS`, `FETCH_TIMEOUT_SECS` and `EMBED_TITLE`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            config.port = port.parse().with_context(|| format!("Invalid PORT: {}", port))?;
        }
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.parse().with_context(|| format!("Invalid BIND_ADDR: {}", addr))?;
        }
        if let Some(domains) = get("ALLOWED_DOMAINS") {
            config.allowed_domains = domains
                .split(',')
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect();
        }
        if let Some(timeout) = get("FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = timeout
                .parse()
                .with_context(|| format!("Invalid FETCH_TIMEOUT_SECS: {}", timeout))?;
        }
        if let Some(embed) = get("EMBED_TITLE") {
            config.embed_title = parse_bool(&embed).with_context(|| format!("Invalid EMBED_TITLE: {}", embed))?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.fetch_timeout, allowed_domains: self.allowed_domains.clone(), ..Default::default() }
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig::builder().embed_title(self.embed_title).build()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

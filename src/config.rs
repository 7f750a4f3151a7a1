//! Server configuration from the environment (`.env` is loaded first)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 5000;

/// Startup settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub admin_username: String,
    pub admin_password: String,
    /// HMAC key for password digests; `None` means generate one per process
    pub auth_secret: Option<String>,
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            auth_secret: None,
            seed_sample_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values fall back to defaults
    /// with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid PORT '{}', using {}", raw, defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid BIND_ADDR '{}', using {}", raw, defaults.bind_addr);
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    warn!("Invalid SEED_SAMPLE_DATA '{}', using {}", raw, defaults.seed_sample_data);
                    defaults.seed_sample_data
                }
            },
            None => defaults.seed_sample_data,
        };

        let config = Self {
            bind_addr,
            port,
            admin_username: lookup("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            auth_secret: lookup("AUTH_SECRET").filter(|s| !s.is_empty()),
            seed_sample_data,
        };

        info!(
            "Config: addr={}, admin='{}', auth_secret={}, seed={}",
            config.socket_addr(),
            config.admin_username,
            if config.auth_secret.is_some() { "set" } else { "generated" },
            config.seed_sample_data
        );
        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

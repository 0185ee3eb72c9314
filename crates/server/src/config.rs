use invoker::config::{ConfigError, InvokerConfig, parse_var};
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

/// Default listen address
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);
/// Default upper bound on the length of the encoded `image` field
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_image_bytes: usize,
    pub invoker: InvokerConfig,
}

impl ServerConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr =
            parse_var::<SocketAddr>(&lookup, "BIND_ADDR")?.unwrap_or(DEFAULT_BIND_ADDR);

        let max_image_bytes =
            parse_var::<usize>(&lookup, "MAX_IMAGE_BYTES")?.unwrap_or(DEFAULT_MAX_IMAGE_BYTES);

        Ok(Self {
            bind_addr,
            max_image_bytes,
            invoker: InvokerConfig::from_lookup(&lookup)?,
        })
    }
}

use anyhow::{Error, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

const fn _default_port() -> u16 { 8000 }
const fn _default_bind_address() -> IpAddr { IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
fn _default_proxy_prefix() -> String { "/proxy".to_string() }
fn _default_static_root() -> PathBuf { PathBuf::from(".") }
const fn _default_upstream_timeout_secs() -> u64 { 30 }

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct ProxyConfig {
    #[serde(default = "_default_port")]
    pub(crate) port: u16,
    #[serde(default = "_default_bind_address")]
    pub(crate) bind_address: IpAddr,
    #[serde(default = "_default_proxy_prefix")]
    pub(crate) proxy_prefix: String,
    #[serde(default = "_default_static_root")]
    pub(crate) static_root: PathBuf,
    #[serde(default = "_default_upstream_timeout_secs")]
    pub(crate) upstream_timeout_secs: u64,
    /// Prometheus exporter port on loopback. Unset disables the exporter.
    #[serde(default)]
    pub(crate) metrics_port: Option<u16>,
}

impl ProxyConfig {
    /// Reads the TOML file at `path`, or falls back to the defaults.
    pub(crate) fn load(path: Option<&str>) -> Result<Self> {
        let contents = match path {
            Some(path) => std::fs::read_to_string(path)?,
            None => String::new(),
        };
        Ok(toml::from_str(&contents)?)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.proxy_prefix.starts_with('/') {
            return Err(Error::msg(format!(
                "Proxy prefix \"{}\" must start with '/'.",
                self.proxy_prefix
            )));
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("Upstream timeout must be at least one second.");
        }
        if !self.static_root.is_dir() {
            return Err(Error::msg(format!(
                "Static root \"{}\" is not a directory.",
                self.static_root.display()
            )));
        }
        if self.metrics_port == Some(self.port) {
            anyhow::bail!("Metrics port must differ from the proxy port.");
        }
        Ok(())
    }

    pub(crate) fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: _default_port(),
            bind_address: _default_bind_address(),
            proxy_prefix: _default_proxy_prefix(),
            static_root: _default_static_root(),
            upstream_timeout_secs: _default_upstream_timeout_secs(),
            metrics_port: None,
        }
    }
}

use anyhow::Result;
use tower_http::services::ServeDir;

use crate::config::ProxyConfig;

#[derive(Clone)]
pub(crate) struct ProxyState {
    pub(crate) config: ProxyConfig,
    pub(crate) http_client: reqwest::Client,
    pub(crate) static_files: ServeDir,
}

impl ProxyState {
    pub(crate) fn new(config: ProxyConfig) -> Result<Self> {
        let http_client = http_client(&config)?;
        let static_files = ServeDir::new(&config.static_root);
        Ok(Self {
            config,
            http_client,
            static_files,
        })
    }
}

fn http_client(config: &ProxyConfig) -> Result<reqwest::Client> {
    let http_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()?;
    Ok(http_client)
}

use std::time::Duration;

use serde::Deserialize;

use super::error::AcquisitionError;

pub const DEFAULT_WORLD_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

/// Where the raw world-boundaries document comes from.
pub trait WorldSource {
    /// Retrieve the document body. Exactly one attempt, no retries.
    fn fetch_world(&self) -> Result<String, AcquisitionError>;
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WORLD_URL.to_string(),
            timeout_secs: 10,
            user_agent: "india-geo3d".to_string(),
        }
    }
}

/// Fetches the world document with a blocking GET. The request is bounded by the
/// configured timeout, expiry is reported as a network failure.
pub struct HttpWorldSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpWorldSource {
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }
}

impl WorldSource for HttpWorldSource {
    fn fetch_world(&self) -> Result<String, AcquisitionError> {
        log::debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::NetworkFailure(format!(
                "{} answered with status {}",
                self.url, status
            )));
        }
        Ok(response.text()?)
    }
}

/// Never touches the network, every attempt fails immediately.
pub struct OfflineWorldSource;

impl WorldSource for OfflineWorldSource {
    fn fetch_world(&self) -> Result<String, AcquisitionError> {
        Err(AcquisitionError::NetworkFailure(
            "offline mode, remote source disabled".to_string(),
        ))
    }
}

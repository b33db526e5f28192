/// Reasons a remote acquisition attempt can fail. None of these reach the caller of
/// `GeoDataProvider::resolve_india_geo_data`, they all select the embedded fallback.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    /// Transport error, timeout or non-success HTTP status.
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// The body is not a GeoJSON FeatureCollection, or a matched feature is unusable.
    #[error("invalid payload: {0}")]
    PayloadInvalid(String),
    #[error("no feature named {target:?} under any of the keys {keys:?}")]
    NoMatchFound { target: String, keys: Vec<String> },
}

impl From<reqwest::Error> for AcquisitionError {
    fn from(err: reqwest::Error) -> Self {
        AcquisitionError::NetworkFailure(err.to_string())
    }
}

impl From<geojson::Error> for AcquisitionError {
    fn from(err: geojson::Error) -> Self {
        AcquisitionError::PayloadInvalid(err.to_string())
    }
}

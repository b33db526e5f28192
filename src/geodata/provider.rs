use geojson::FeatureCollection;

use super::{
    error::AcquisitionError,
    fallback::fallback_collection,
    filter::{filter_by_name, parse_feature_collection, validate_boundary, MatchConfig},
    source::WorldSource,
    status::StatusSink,
};
use crate::geofile::region::Region;

pub const STATUS_LOADING: &str = "Loading India map data...";
pub const STATUS_LOADING_REMOTE: &str = "Loading real India map data...";
pub const STATUS_REMOTE_LOADED: &str = "Loaded real India map data";
pub const STATUS_FALLBACK: &str = "Using fallback map data";

/// Which branch produced the resolved collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Remote,
    Fallback,
}

/// Resolves the India GeoJSON, preferring the remote world dataset and falling back to
/// the embedded states on any failure.
pub struct GeoDataProvider<W: WorldSource, S: StatusSink> {
    source: W,
    status: S,
    match_config: MatchConfig,
    fallback: FeatureCollection,
}

impl<W: WorldSource, S: StatusSink> GeoDataProvider<W, S> {
    /// The embedded fallback is parsed here so that resolving can never fail later on.
    pub fn new(source: W, status: S, match_config: MatchConfig) -> anyhow::Result<Self> {
        Ok(Self {
            source,
            status,
            match_config,
            fallback: fallback_collection()?,
        })
    }

    /// Single remote attempt: fetch, parse, filter by name and validate the matches.
    pub fn fetch_remote(&self) -> Result<FeatureCollection, AcquisitionError> {
        let body = self.source.fetch_world()?;
        let world = parse_feature_collection(&body)?;
        log::debug!("World document holds {} features", world.features.len());

        let matched = filter_by_name(world, &self.match_config);
        if matched.features.is_empty() {
            return Err(AcquisitionError::NoMatchFound {
                target: self.match_config.target_name.clone(),
                keys: self.match_config.name_keys.clone(),
            });
        }
        for feature in &matched.features {
            validate_boundary(feature)?;
            // Scene consumers also need a name and a non-negative population,
            // e.g. Natural Earth marks unknown values with `POP_EST: -99`.
            Region::from_feature(feature, &self.match_config.name_keys)
                .map_err(|err| AcquisitionError::PayloadInvalid(format!("{:#}", err)))?;
        }
        Ok(matched)
    }

    /// Like `resolve_india_geo_data`, also reporting which branch was taken.
    pub fn resolve_with_source(&self) -> (DataSource, FeatureCollection) {
        self.status.notify(STATUS_LOADING);
        self.status.notify(STATUS_LOADING_REMOTE);
        match self.fetch_remote() {
            Ok(collection) => {
                log::info!(
                    "Using {} remote feature(s) named {:?}",
                    collection.features.len(),
                    self.match_config.target_name
                );
                self.status.notify(STATUS_REMOTE_LOADED);
                (DataSource::Remote, collection)
            }
            Err(err) => {
                log::warn!("Remote India data not available, using fallback: {}", err);
                self.status.notify(STATUS_FALLBACK);
                (DataSource::Fallback, self.fallback.clone())
            }
        }
    }

    /// Always returns a non-empty collection, acquisition failures select the fallback.
    pub fn resolve_india_geo_data(&self) -> FeatureCollection {
        self.resolve_with_source().1
    }
}

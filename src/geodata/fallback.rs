//! Embedded approximate boundaries of ten Indian states, used whenever live data is unavailable.

use anyhow::anyhow;
use geojson::FeatureCollection;

static INDIA_STATES_FALLBACK: &str = include_str!("../../data/india_states_fallback.geojson");

pub fn fallback_collection() -> anyhow::Result<FeatureCollection> {
    match INDIA_STATES_FALLBACK.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(anyhow!("Embedded fallback data is not a FeatureCollection")),
    }
}

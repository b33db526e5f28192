use std::collections::HashSet;

use geojson::{Feature, FeatureCollection};
use serde::Deserialize;

use super::error::AcquisitionError;

/// Which features of the world document count as the target country.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    pub target_name: String,
    /// Property keys that may hold the feature name. Datasets differ in schema,
    /// e.g. Natural Earth uses `NAME`/`NAME_EN` while others use `name`.
    pub name_keys: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            target_name: "India".to_string(),
            name_keys: vec!["NAME".to_string(), "name".to_string(), "NAME_EN".to_string()],
        }
    }
}

/// True if any of `keys` holds a string property exactly equal to `target` (case-sensitive).
pub fn feature_has_name(feature: &Feature, target: &str, keys: &[String]) -> bool {
    keys.iter().any(|key| {
        feature
            .property(key)
            .and_then(|value| value.as_str())
            .map_or(false, |name| name == target)
    })
}

/// Keep the features of `collection` named `config.target_name`, in their original order.
pub fn filter_by_name(collection: FeatureCollection, config: &MatchConfig) -> FeatureCollection {
    let features = collection
        .features
        .into_iter()
        .filter(|feature| feature_has_name(feature, &config.target_name, &config.name_keys))
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Parse a raw document body into a FeatureCollection.
pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection, AcquisitionError> {
    match body.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::FeatureCollection(collection) => Ok(collection),
        geojson::GeoJson::Feature(_) => Err(AcquisitionError::PayloadInvalid(
            "expected a FeatureCollection, got a Feature".to_string(),
        )),
        geojson::GeoJson::Geometry(_) => Err(AcquisitionError::PayloadInvalid(
            "expected a FeatureCollection, got a Geometry".to_string(),
        )),
    }
}

fn count_distinct_positions(ring: &[geojson::Position]) -> usize {
    // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
    ring.iter()
        .map(|position| {
            position
                .iter()
                .map(|value| (value + 0.0).to_bits())
                .collect::<Vec<u64>>()
        })
        .collect::<HashSet<Vec<u64>>>()
        .len()
}

/// Check that a feature has a polygonal geometry whose exterior rings are not degenerate.
pub fn validate_boundary(feature: &Feature) -> Result<(), AcquisitionError> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| AcquisitionError::PayloadInvalid("feature has no geometry".to_string()))?;
    let exterior_rings: Vec<&Vec<geojson::Position>> = match &geometry.value {
        geojson::Value::Polygon(rings) => rings.iter().take(1).collect(),
        geojson::Value::MultiPolygon(polygons) => {
            polygons.iter().filter_map(|rings| rings.first()).collect()
        }
        other => {
            return Err(AcquisitionError::PayloadInvalid(format!(
                "expected a Polygon or MultiPolygon, got {}",
                other.type_name()
            )))
        }
    };
    if exterior_rings.is_empty() {
        return Err(AcquisitionError::PayloadInvalid(
            "polygon without an exterior ring".to_string(),
        ));
    }
    for ring in exterior_rings {
        let distinct = count_distinct_positions(ring);
        if distinct < 3 {
            return Err(AcquisitionError::PayloadInvalid(format!(
                "boundary has only {} distinct points",
                distinct
            )));
        }
    }
    Ok(())
}

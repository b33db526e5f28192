use anyhow::{anyhow, Context};
use geo::Area;

/// Property keys probed, in order, for the region name.
pub const NAME_KEYS: [&str; 3] = ["name", "NAME", "NAME_EN"];
/// Property keys probed, in order, for the population count.
pub const POPULATION_KEYS: [&str; 3] = ["population", "POP_EST", "pop_est"];

/// One administrative region as consumed by the scene layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub population: u64,
    pub capital: String,
    pub boundary: geo::Polygon,
}

fn first_property<'a, 'k, K: AsRef<str>>(
    feature: &'a geojson::Feature,
    keys: &'k [K],
) -> Option<(&'k str, &'a serde_json::Value)> {
    keys.iter().find_map(|key| {
        feature
            .property(key.as_ref())
            .map(|value| (key.as_ref(), value))
    })
}

fn parse_population(key: &str, value: &serde_json::Value) -> anyhow::Result<u64> {
    if let Some(population) = value.as_u64() {
        return Ok(population);
    }
    match value.as_f64() {
        Some(population) if population >= 0.0 && population.fract() == 0.0 => {
            Ok(population as u64)
        }
        _ => Err(anyhow!(
            "Property {} must be a non-negative integer, got {}",
            key,
            value
        )),
    }
}

/// Pick the polygon of a geometry, the largest one for a MultiPolygon.
fn boundary_polygon(geometry: &geojson::Geometry) -> anyhow::Result<geo::Polygon> {
    let geometry: geo::Geometry = geometry
        .value
        .clone()
        .try_into()
        .context("Converting GeoJSON geometry")?;
    match geometry {
        geo::Geometry::Polygon(polygon) => Ok(polygon),
        geo::Geometry::MultiPolygon(multi_polygon) => multi_polygon
            .into_iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
            .ok_or_else(|| anyhow!("Empty MultiPolygon")),
        other => Err(anyhow!("Cannot use geometry {:?} as a region boundary", other)),
    }
}

impl Region {
    /// Convert a feature, reading its name from the first of `name_keys` that is present.
    pub fn from_feature<K: AsRef<str> + std::fmt::Debug>(
        feature: &geojson::Feature,
        name_keys: &[K],
    ) -> anyhow::Result<Self> {
        let name = first_property(feature, name_keys)
            .and_then(|(_, value)| value.as_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("Feature has no name under any of {:?}", name_keys))?
            .to_string();

        let population = match first_property(feature, &POPULATION_KEYS) {
            Some((key, value)) => parse_population(key, value)
                .with_context(|| format!("Reading population of {}", name))?,
            None => {
                log::warn!("{} has no population, using 0", name);
                0
            }
        };

        let capital = feature
            .property("capital")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| anyhow!("{} has no geometry", name))?;
        let boundary = boundary_polygon(geometry).with_context(|| format!("Boundary of {}", name))?;
        if boundary.exterior().0.len() < 4 {
            return Err(anyhow!("Boundary of {} is degenerate", name));
        }

        Ok(Self {
            name,
            population,
            capital,
            boundary,
        })
    }
}

impl TryFrom<&geojson::Feature> for Region {
    type Error = anyhow::Error;

    fn try_from(feature: &geojson::Feature) -> anyhow::Result<Self> {
        Region::from_feature(feature, &NAME_KEYS)
    }
}

/// Convert every feature of a collection, failing on the first unusable one.
pub fn regions_from_collection<K: AsRef<str> + std::fmt::Debug>(
    collection: &geojson::FeatureCollection,
    name_keys: &[K],
) -> anyhow::Result<Vec<Region>> {
    collection
        .features
        .iter()
        .map(|feature| Region::from_feature(feature, name_keys))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{regions_from_collection, Region, NAME_KEYS};
    use crate::geodata::fallback::fallback_collection;

    fn feature(properties: serde_json::Value, geometry: serde_json::Value) -> geojson::Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "properties": properties,
            "geometry": geometry
        }))
        .unwrap()
    }

    fn triangle() -> serde_json::Value {
        json!({"type": "Polygon", "coordinates": [[[70.0, 10.0], [80.0, 10.0], [80.0, 20.0], [70.0, 10.0]]]})
    }

    #[rstest]
    fn test_fallback_converts_to_regions() {
        let regions =
            regions_from_collection(&fallback_collection().unwrap(), &NAME_KEYS).unwrap();
        assert_eq!(regions.len(), 10);
        let kerala = regions.iter().find(|r| r.name == "Kerala").unwrap();
        assert_eq!(kerala.population, 33406061);
        assert_eq!(kerala.capital, "Thiruvananthapuram");
        assert_eq!(kerala.boundary.exterior().0.len(), 6);
    }

    #[rstest]
    #[case(json!({"NAME_EN": "India", "POP_EST": 1380004385.0}), "India", 1380004385)]
    #[case(json!({"NAME": "India"}), "India", 0)]
    #[case(json!({"name": "Goa", "population": 1458545, "capital": "Panaji"}), "Goa", 1458545)]
    fn test_region_property_variants(
        #[case] properties: serde_json::Value,
        #[case] expected_name: &str,
        #[case] expected_population: u64,
    ) {
        let region = Region::try_from(&feature(properties, triangle())).unwrap();
        assert_eq!(region.name, expected_name);
        assert_eq!(region.population, expected_population);
    }

    #[rstest]
    #[case(json!({"population": 10}), triangle())]
    #[case(json!({"name": ""}), triangle())]
    #[case(json!({"name": "X", "population": -5}), triangle())]
    #[case(json!({"name": "X", "population": "many"}), triangle())]
    #[case(json!({"name": "X"}), json!({"type": "Point", "coordinates": [1.0, 2.0]}))]
    fn test_invalid_regions(#[case] properties: serde_json::Value, #[case] geometry: serde_json::Value) {
        assert!(Region::try_from(&feature(properties, geometry)).is_err());
    }

    #[rstest]
    fn test_configured_name_key() {
        let feature = feature(json!({"ADMIN": "India", "name": "Bharat"}), triangle());
        let region = Region::from_feature(&feature, &["ADMIN".to_string()]).unwrap();
        assert_eq!(region.name, "India");
    }

    #[rstest]
    fn test_multipolygon_uses_largest_part() {
        let region = Region::try_from(&feature(
            json!({"name": "India"}),
            json!({
                "type": "MultiPolygon",
                "coordinates": [
                    [[[92.0, 11.0], [93.0, 11.0], [93.0, 12.0], [92.0, 11.0]]],
                    [[[70.0, 10.0], [80.0, 10.0], [80.0, 20.0], [70.0, 10.0]]]
                ]
            }),
        ))
        .unwrap();
        assert_eq!(region.boundary.exterior().0[0], geo::coord! { x: 70.0, y: 10.0 });
    }
}

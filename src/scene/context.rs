use anyhow::anyhow;
use geo::{Area, Centroid};
use rayon::prelude::*;
use serde::Deserialize;

use super::projection::PlaneProjection;
use crate::geofile::region::Region;

pub type Rgb = [u8; 3];

/// How population drives extrusion height and color.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneParams {
    /// Side length of the square plane the map is fitted into.
    pub plane_size: f64,
    pub base_height: f64,
    /// Extra height given to the most populous region.
    pub max_height: f64,
    pub low_color: Rgb,
    pub high_color: Rgb,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            plane_size: 40.0,
            base_height: 0.5,
            max_height: 8.0,
            low_color: [0x4e, 0xcd, 0xc4],
            high_color: [0xff, 0x6b, 0x6b],
        }
    }
}

/// A region placed on the scene plane, ready for extrusion by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRegion {
    pub name: String,
    pub population: u64,
    pub capital: String,
    /// Boundary in plane coordinates (x, z).
    pub footprint: geo::Polygon,
    pub height: f64,
    pub color: Rgb,
    /// Where a label or tooltip is attached, in plane coordinates.
    pub label_anchor: geo::Point,
}

impl PlacedRegion {
    pub fn footprint_area(&self) -> f64 {
        self.footprint.unsigned_area()
    }
}

/// Everything the renderer needs to build the map, owned by the top-level orchestrator.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub projection: PlaneProjection,
    pub params: SceneParams,
    regions: Vec<PlacedRegion>,
}

fn lerp_color(low: Rgb, high: Rgb, ratio: f64) -> Rgb {
    let mut color = [0; 3];
    for (channel, (l, h)) in color.iter_mut().zip(low.iter().zip(high.iter())) {
        let value = *l as f64 + (*h as f64 - *l as f64) * ratio;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    color
}

fn place_region(
    region: &Region,
    projection: &PlaneProjection,
    params: &SceneParams,
    max_population: u64,
) -> anyhow::Result<PlacedRegion> {
    let ratio = if max_population == 0 {
        0.0
    } else {
        region.population as f64 / max_population as f64
    };
    let footprint = projection.project_polygon(&region.boundary);
    let label_anchor = footprint
        .centroid()
        .ok_or_else(|| anyhow!("{} has an empty footprint", region.name))?;
    Ok(PlacedRegion {
        name: region.name.clone(),
        population: region.population,
        capital: region.capital.clone(),
        footprint,
        height: params.base_height + ratio * params.max_height,
        color: lerp_color(params.low_color, params.high_color, ratio),
        label_anchor,
    })
}

impl SceneContext {
    pub fn build(regions: &[Region], params: &SceneParams) -> anyhow::Result<Self> {
        if regions.is_empty() {
            return Err(anyhow!("Cannot build a scene without regions"));
        }
        let projection = PlaneProjection::fit(regions, params.plane_size)?;
        let max_population = regions
            .iter()
            .map(|region| region.population)
            .max()
            .unwrap_or(0);
        log::debug!(
            "Fitted {} regions at {:.3} units per degree, max population {}",
            regions.len(),
            projection.scale(),
            max_population
        );

        let placed: anyhow::Result<Vec<PlacedRegion>> = regions
            .par_iter()
            .map(|region| place_region(region, &projection, params, max_population))
            .collect();
        Ok(Self {
            projection,
            params: params.clone(),
            regions: placed?,
        })
    }

    /// Regions in the order of the source collection.
    pub fn regions(&self) -> &[PlacedRegion] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&PlacedRegion> {
        self.regions.iter().find(|region| region.name == name)
    }

    pub fn total_population(&self) -> u64 {
        self.regions.iter().map(|region| region.population).sum()
    }

    pub fn most_populous(&self) -> Option<&PlacedRegion> {
        self.regions.iter().max_by_key(|region| region.population)
    }
}

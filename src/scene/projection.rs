use anyhow::anyhow;
use geo::BoundingRect;

use crate::geofile::region::Region;

/// Maps lon/lat degrees onto a square scene plane centered at the origin. The longer
/// side of the data extent spans `plane_size` units, the aspect ratio is kept. North
/// points towards negative z, as in a right-handed y-up scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneProjection {
    center: geo::Coord,
    scale: f64,
}

impl PlaneProjection {
    pub fn fit(regions: &[Region], plane_size: f64) -> anyhow::Result<Self> {
        let rect = regions
            .iter()
            .filter_map(|region| region.boundary.bounding_rect())
            .reduce(|a, b| {
                geo::Rect::new(
                    geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
            .ok_or_else(|| anyhow!("Cannot fit a projection to zero regions"))?;

        let extent = rect.width().max(rect.height());
        if extent <= 0.0 {
            return Err(anyhow!("Regions have no spatial extent"));
        }
        Ok(Self {
            center: rect.center(),
            scale: plane_size / extent,
        })
    }

    /// Scene units per degree.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Project a lon/lat coordinate to plane (x, z).
    pub fn project(&self, coord: geo::Coord) -> geo::Coord {
        geo::coord! {
            x: (coord.x - self.center.x) * self.scale,
            y: -(coord.y - self.center.y) * self.scale,
        }
    }

    pub fn project_polygon(&self, polygon: &geo::Polygon) -> geo::Polygon {
        let project_ring = |ring: &geo::LineString| -> geo::LineString {
            ring.coords().map(|coord| self.project(*coord)).collect()
        };
        geo::Polygon::new(
            project_ring(polygon.exterior()),
            polygon.interiors().iter().map(project_ring).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::PlaneProjection;
    use crate::geofile::region::Region;

    fn square_region(min: (f64, f64), max: (f64, f64)) -> Region {
        Region {
            name: "Square".to_string(),
            population: 1,
            capital: String::new(),
            boundary: geo::Polygon::new(
                vec![min, (max.0, min.1), max, (min.0, max.1), min].into(),
                vec![],
            ),
        }
    }

    #[rstest]
    fn test_projection_centers_and_scales() {
        let regions = vec![
            square_region((70.0, 10.0), (80.0, 20.0)),
            square_region((80.0, 20.0), (90.0, 25.0)),
        ];
        let projection = PlaneProjection::fit(&regions, 40.0).unwrap();

        // Extent is 20 x 15 degrees, so the 20 degree side spans the plane.
        assert_abs_diff_eq!(projection.scale(), 2.0);
        let west_south = projection.project(geo::coord! { x: 70.0, y: 10.0 });
        assert_abs_diff_eq!(west_south.x, -20.0);
        assert_abs_diff_eq!(west_south.y, 15.0);
        let east_north = projection.project(geo::coord! { x: 90.0, y: 25.0 });
        assert_abs_diff_eq!(east_north.x, 20.0);
        assert_abs_diff_eq!(east_north.y, -15.0);
    }

    #[rstest]
    fn test_projection_needs_regions() {
        assert!(PlaneProjection::fit(&[], 40.0).is_err());
    }
}

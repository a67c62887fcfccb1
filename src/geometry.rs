// Copyright Catenary Transit Initiatives
// Containment tests for user-drawn filter areas

use crate::models::{Ad, LatLng};
use geo::BoundingRect;
use geo_types::{LineString, Rect};

/// Ray-casting containment test. The ray runs from `point` towards increasing
/// longitude and every edge it crosses flips the result.
///
/// Polygons with fewer than 3 vertices are not a filter: every point is inside.
/// The last vertex connects back to the first, so callers must not close the ring
/// themselves (a repeated closing vertex is harmless, it forms a zero-length edge).
///
/// Edges parallel to the ray never count as a crossing. Points exactly on the
/// boundary follow the half-open rule below: a vertex counts as above the ray
/// only when its latitude is strictly greater, and a crossing counts only when it
/// lies strictly east of the point. Non-finite points are always outside.
pub fn point_in_polygon(point: LatLng, vertices: &[LatLng]) -> bool {
    if vertices.len() < 3 {
        return true;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = vertices.len() - 1;

    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].lng, vertices[i].lat);
        let (xj, yj) = (vertices[j].lng, vertices[j].lat);

        // straddle check also rules out horizontal edges, so yj - yi is never 0 below
        if (yi > y) != (yj > y) {
            let crossing_x = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < crossing_x {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

/// A committed user-drawn area, vertices in drawing order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterPolygon {
    vertices: Vec<LatLng>,
}

impl FilterPolygon {
    pub fn new(vertices: Vec<LatLng>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    /// Fewer than 3 vertices cannot enclose anything and is treated as no filter.
    pub fn is_active(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// Bounding rectangle in geo convention (x = lng, y = lat).
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let ring: LineString<f64> = self
            .vertices
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| v.to_coord())
            .collect();
        ring.bounding_rect()
    }
}

/// Keeps the ads inside `polygon`. A missing or degenerate polygon returns the
/// input unchanged.
pub fn filter_ads_by_polygon(ads: &[Ad], polygon: Option<&FilterPolygon>) -> Vec<Ad> {
    let polygon = match polygon {
        Some(p) if p.is_active() => p,
        _ => return ads.to_vec(),
    };

    ads.iter()
        .filter(|ad| {
            if !ad.has_finite_position() {
                tracing::warn!(
                    "Ad {} has non-finite position ({}, {}), excluding from area filter",
                    ad.id,
                    ad.lat,
                    ad.lng
                );
                return false;
            }
            polygon.contains(ad.position())
        })
        .cloned()
        .collect()
}

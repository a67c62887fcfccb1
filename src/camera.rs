// Copyright Catenary Transit Initiatives
// Camera moves requested from the map collaborator

use crate::models::LatLng;
use geo_types::Rect;

/// Fire-and-forget camera request. A newer request supersedes any pending one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraRequest {
    FlyTo {
        center: LatLng,
        zoom: f64,
    },
    /// Fit `bounds` (x = lng, y = lat) into view, never zooming past `max_zoom`.
    FitBounds {
        bounds: Rect<f64>,
        padding_px: u32,
        max_zoom: f64,
    },
}

impl CameraRequest {
    pub fn fly_to(center: LatLng, zoom: f64) -> Self {
        CameraRequest::FlyTo { center, zoom }
    }

    /// Centre of the target view.
    pub fn target(&self) -> LatLng {
        match self {
            CameraRequest::FlyTo { center, .. } => *center,
            CameraRequest::FitBounds { bounds, .. } => LatLng::from_coord(bounds.center()),
        }
    }
}

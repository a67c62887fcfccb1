// Copyright Catenary Transit Initiatives
// Ad list shown beside the map

use crate::camera::CameraRequest;
use crate::config::EngineConfig;
use crate::display_plan::{DisplayMode, Viewport};
use crate::models::{Ad, LatLng};
use geo::Intersects;
use geo_types::Rect;
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum PanelLabel {
    /// Zoom not reported yet.
    Loading,
    AllAds(usize),
    InSelectedArea(usize),
    InVisibleArea(usize),
}

impl fmt::Display for PanelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelLabel::Loading => write!(f, "Loading..."),
            PanelLabel::AllAds(n) => write!(f, "{} ads (all ads)", n),
            PanelLabel::InSelectedArea(n) => write!(f, "{} ads in selected area", n),
            PanelLabel::InVisibleArea(n) => write!(f, "{} ads in visible area", n),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PanelList {
    pub label: PanelLabel,
    pub ads: Vec<Ad>,
}

impl PanelList {
    pub fn loading() -> Self {
        Self {
            label: PanelLabel::Loading,
            ads: Vec::new(),
        }
    }
}

/// Inclusive on every edge.
pub fn bounds_contain(bounds: &Rect<f64>, point: LatLng) -> bool {
    bounds.intersects(&point.to_coord())
}

/// Side panel contents. Zoomed out, the whole filtered set is listed; zoomed in,
/// only the ads inside the visible rectangle, or everything while the rectangle
/// has not been reported.
pub fn select_panel_ads(
    filtered_ads: &[Ad],
    viewport: &Viewport,
    polygon_active: bool,
    config: &EngineConfig,
) -> PanelList {
    match viewport.mode(config.cluster_zoom) {
        None => PanelList::loading(),
        Some(DisplayMode::Clustered) => PanelList {
            label: PanelLabel::AllAds(filtered_ads.len()),
            ads: filtered_ads.to_vec(),
        },
        Some(DisplayMode::Detailed) => {
            let ads: Vec<Ad> = match &viewport.bounds {
                Some(bounds) => filtered_ads
                    .iter()
                    .filter(|ad| bounds_contain(bounds, ad.position()))
                    .cloned()
                    .collect(),
                None => filtered_ads.to_vec(),
            };
            let label = if polygon_active {
                PanelLabel::InSelectedArea(ads.len())
            } else {
                PanelLabel::InVisibleArea(ads.len())
            };
            PanelList { label, ads }
        }
    }
}

/// Camera move for an ad clicked in the side panel.
pub fn focus_panel_ad(ad: &Ad, config: &EngineConfig) -> CameraRequest {
    CameraRequest::fly_to(ad.position(), config.panel_focus_zoom)
}

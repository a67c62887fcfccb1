// Copyright Catenary Transit Initiatives
// Zoom-dependent choice between city clusters and proximity groups

use crate::aggregate::{AdGroup, GroupKey, MarkerContent, SelectionSummary};
use crate::camera::CameraRequest;
use crate::city_clusters::build_city_clusters;
use crate::config::EngineConfig;
use crate::geometry::{FilterPolygon, filter_ads_by_polygon};
use crate::models::{Ad, LatLng};
use crate::proximity_grouping::group_nearby_ads;
use geo_types::Rect;

/// What the map collaborator last reported. Both fields are unknown until the
/// first viewport event arrives.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub zoom: Option<f64>,
    /// Visible rectangle, x = lng, y = lat.
    pub bounds: Option<Rect<f64>>,
}

impl Viewport {
    pub fn new(zoom: Option<f64>, bounds: Option<Rect<f64>>) -> Self {
        Self { zoom, bounds }
    }

    /// `None` while the zoom is unknown. A non-finite zoom counts as unknown.
    pub fn mode(&self, cluster_zoom: f64) -> Option<DisplayMode> {
        self.zoom
            .filter(|z| z.is_finite())
            .map(|z| DisplayMode::for_zoom(z, cluster_zoom))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// One marker per city.
    Clustered,
    /// One marker per proximity group.
    Detailed,
}

impl DisplayMode {
    pub fn for_zoom(zoom: f64, cluster_zoom: f64) -> Self {
        if zoom < cluster_zoom {
            DisplayMode::Clustered
        } else {
            DisplayMode::Detailed
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    pub key: GroupKey,
    pub position: LatLng,
    pub content: MarkerContent,
}

/// Map contents for one combination of inputs. `mode` is `None` before the
/// first zoom report, in which case nothing is drawn.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayPlan {
    pub mode: Option<DisplayMode>,
    pub groups: Vec<AdGroup>,
}

/// Result of clicking a marker: the members as aggregated, plus the camera move.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSelection<'a> {
    pub key: &'a GroupKey,
    pub members: &'a [Ad],
    pub summary: Option<SelectionSummary>,
    pub camera: CameraRequest,
}

impl DisplayPlan {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.mode.is_none()
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.groups
            .iter()
            .map(|group| Marker {
                key: group.key.clone(),
                position: group.centroid,
                content: group.marker_content(),
            })
            .collect()
    }

    pub fn group(&self, key: &GroupKey) -> Option<&AdGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// City clusters fly to the mode switch zoom, proximity groups fly deeper.
    pub fn select<'a>(
        &'a self,
        key: &GroupKey,
        config: &EngineConfig,
    ) -> Option<GroupSelection<'a>> {
        let group = self.group(key)?;
        let zoom = match group.key {
            GroupKey::City(_) => config.cluster_zoom,
            GroupKey::Proximity(_) => config.group_focus_zoom,
        };

        Some(GroupSelection {
            key: &group.key,
            members: &group.members,
            summary: SelectionSummary::of(&group.members),
            camera: CameraRequest::fly_to(group.centroid, zoom),
        })
    }
}

/// Camera move for an ad clicked inside the detail panel of a selection.
pub fn focus_detail_ad(ad: &Ad, config: &EngineConfig) -> CameraRequest {
    CameraRequest::fly_to(ad.position(), config.detail_focus_zoom)
}

/// Aggregates an already polygon-filtered ad set for `mode`.
pub fn plan_for_mode(
    mode: DisplayMode,
    filtered_ads: &[Ad],
    config: &EngineConfig,
) -> DisplayPlan {
    let groups = match mode {
        DisplayMode::Clustered => build_city_clusters(filtered_ads, &config.unknown_city_label),
        DisplayMode::Detailed => group_nearby_ads(filtered_ads, config.proximity_threshold),
    };

    DisplayPlan {
        mode: Some(mode),
        groups,
    }
}

/// Pure planning entry point: filter by the optional polygon, then aggregate
/// according to the zoom.
pub fn compute_display_plan(
    ads: &[Ad],
    viewport: &Viewport,
    polygon: Option<&FilterPolygon>,
    config: &EngineConfig,
) -> DisplayPlan {
    let Some(mode) = viewport.mode(config.cluster_zoom) else {
        return DisplayPlan::idle();
    };

    if ads.is_empty() {
        return DisplayPlan {
            mode: Some(mode),
            groups: Vec::new(),
        };
    }

    let filtered = filter_ads_by_polygon(ads, polygon);
    plan_for_mode(mode, &filtered, config)
}

// Copyright Catenary Transit Initiatives
// Event-driven state for one map session

use crate::aggregate::GroupKey;
use crate::camera::CameraRequest;
use crate::config::EngineConfig;
use crate::display_plan::{DisplayPlan, GroupSelection, Viewport, focus_detail_ad, plan_for_mode};
use crate::geometry::{FilterPolygon, filter_ads_by_polygon};
use crate::models::{Ad, LatLng};
use crate::side_panel::{PanelList, focus_panel_ad, select_panel_ads};
use geo_types::Rect;

#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    AdsLoaded(Vec<Ad>),
    ZoomChanged(f64),
    /// Visible rectangle, x = lng, y = lat.
    BoundsChanged(Rect<f64>),
    PolygonCommitted(Vec<LatLng>),
    PolygonCleared,
}

/// Holds the latest inputs and the plan derived from them. Each event
/// recomputes at most once, and only when it can change the result: bounds
/// never affect the map plan, and zoom only matters when it crosses the mode
/// threshold.
pub struct MapSession {
    config: EngineConfig,
    ads: Vec<Ad>,
    viewport: Viewport,
    polygon: Option<FilterPolygon>,
    filtered: Vec<Ad>,
    plan: DisplayPlan,
    plan_computations: usize,
}

impl MapSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ads: Vec::new(),
            viewport: Viewport::default(),
            polygon: None,
            filtered: Vec::new(),
            plan: DisplayPlan::idle(),
            plan_computations: 0,
        }
    }

    pub fn with_ads(config: EngineConfig, ads: Vec<Ad>) -> Self {
        let mut session = Self::new(config);
        session.handle(MapEvent::AdsLoaded(ads));
        session
    }

    /// Applies `event` and returns the camera move it triggers, if any.
    pub fn handle(&mut self, event: MapEvent) -> Option<CameraRequest> {
        match event {
            MapEvent::AdsLoaded(ads) => {
                tracing::info!("Loaded {} ads", ads.len());
                self.ads = ads;
                self.refilter();
                self.replan();
                None
            }
            MapEvent::ZoomChanged(zoom) => {
                let before = self.viewport.mode(self.config.cluster_zoom);
                self.viewport.zoom = Some(zoom);
                let after = self.viewport.mode(self.config.cluster_zoom);
                if before != after {
                    tracing::debug!(
                        "Zoom {} switches display mode {:?} -> {:?}",
                        zoom,
                        before,
                        after
                    );
                    self.replan();
                }
                None
            }
            MapEvent::BoundsChanged(bounds) => {
                self.viewport.bounds = Some(bounds);
                None
            }
            MapEvent::PolygonCommitted(vertices) => {
                let polygon = FilterPolygon::new(vertices);
                let camera = if polygon.is_active() {
                    polygon.bounding_rect().map(|bounds| CameraRequest::FitBounds {
                        bounds,
                        padding_px: self.config.polygon_fit_padding_px,
                        max_zoom: self.config.polygon_fit_max_zoom,
                    })
                } else {
                    tracing::debug!(
                        "Polygon with {} vertices is too small to filter",
                        polygon.vertices().len()
                    );
                    None
                };
                self.polygon = Some(polygon);
                self.refilter();
                self.replan();
                camera
            }
            MapEvent::PolygonCleared => {
                self.polygon = None;
                self.refilter();
                self.replan();
                None
            }
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter_ads_by_polygon(&self.ads, self.polygon.as_ref());
    }

    fn replan(&mut self) {
        self.plan = match self.viewport.mode(self.config.cluster_zoom) {
            None => DisplayPlan::idle(),
            Some(mode) if self.ads.is_empty() => DisplayPlan {
                mode: Some(mode),
                groups: Vec::new(),
            },
            Some(mode) => {
                self.plan_computations += 1;
                plan_for_mode(mode, &self.filtered, &self.config)
            }
        };
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn polygon(&self) -> Option<&FilterPolygon> {
        self.polygon.as_ref()
    }

    /// Ads left after the polygon filter.
    pub fn filtered_ads(&self) -> &[Ad] {
        &self.filtered
    }

    pub fn plan(&self) -> &DisplayPlan {
        &self.plan
    }

    /// Number of aggregation passes run so far.
    pub fn plan_computations(&self) -> usize {
        self.plan_computations
    }

    pub fn panel(&self) -> PanelList {
        let polygon_active = self.polygon.as_ref().is_some_and(|p| p.is_active());
        select_panel_ads(&self.filtered, &self.viewport, polygon_active, &self.config)
    }

    pub fn select_group(&self, key: &GroupKey) -> Option<GroupSelection<'_>> {
        self.plan.select(key, &self.config)
    }

    pub fn select_panel_ad(&self, ad_id: u64) -> Option<CameraRequest> {
        self.find_ad(ad_id).map(|ad| focus_panel_ad(ad, &self.config))
    }

    pub fn select_detail_ad(&self, ad_id: u64) -> Option<CameraRequest> {
        self.find_ad(ad_id).map(|ad| focus_detail_ad(ad, &self.config))
    }

    fn find_ad(&self, ad_id: u64) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.id == ad_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_plan::{DisplayMode, compute_display_plan};
    use crate::models::AdCategory;
    use crate::side_panel::PanelLabel;
    use geo_types::coord;

    fn ad(id: u64, city: &str, lat: f64, lng: f64) -> Ad {
        Ad {
            id,
            title: format!("apartment {}", id),
            price: 1_000 * id,
            category: AdCategory::Apartment,
            lat,
            lng,
            city: city.to_string(),
            image: String::new(),
            created_at: None,
        }
    }

    fn ads() -> Vec<Ad> {
        vec![
            ad(1, "Tehran", 35.69, 51.39),
            ad(2, "Tehran", 35.692, 51.391),
            ad(3, "Tehran", 35.75, 51.45),
            ad(4, "Mashhad", 36.3, 59.6),
        ]
    }

    fn around_tehran() -> Vec<LatLng> {
        vec![
            LatLng::new(35.6, 51.3),
            LatLng::new(35.6, 51.42),
            LatLng::new(35.72, 51.42),
            LatLng::new(35.72, 51.3),
        ]
    }

    #[test]
    fn test_idle_until_zoom_reported() {
        let session = MapSession::with_ads(EngineConfig::default(), ads());
        assert!(session.plan().is_idle());
        assert_eq!(session.panel().label, PanelLabel::Loading);
        assert_eq!(session.plan_computations(), 0);
        assert_eq!(session.viewport(), &Viewport::default());
        assert_eq!(session.config(), &EngineConfig::default());
    }

    #[test]
    fn test_zoom_within_mode_does_not_recompute() {
        let mut session = MapSession::with_ads(EngineConfig::default(), ads());
        session.handle(MapEvent::ZoomChanged(6.0));
        assert_eq!(session.plan_computations(), 1);
        assert_eq!(session.plan().mode, Some(DisplayMode::Clustered));

        session.handle(MapEvent::ZoomChanged(9.0));
        session.handle(MapEvent::ZoomChanged(12.0));
        assert_eq!(session.plan_computations(), 1);

        session.handle(MapEvent::ZoomChanged(13.0));
        assert_eq!(session.plan_computations(), 2);
        assert_eq!(session.viewport().zoom, Some(13.0));
        assert_eq!(session.plan().mode, Some(DisplayMode::Detailed));
    }

    #[test]
    fn test_bounds_only_affect_panel() {
        let mut session = MapSession::with_ads(EngineConfig::default(), ads());
        session.handle(MapEvent::ZoomChanged(14.0));
        let computations = session.plan_computations();

        let bounds = Rect::new(coord! { x: 51.3, y: 35.6 }, coord! { x: 51.4, y: 35.7 });
        assert_eq!(session.handle(MapEvent::BoundsChanged(bounds)), None);
        assert_eq!(session.plan_computations(), computations);

        let panel = session.panel();
        let ids: Vec<u64> = panel.ads.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(panel.label, PanelLabel::InVisibleArea(2));
    }

    #[test]
    fn test_polygon_commit_filters_and_fits_bounds() {
        let mut session = MapSession::with_ads(EngineConfig::default(), ads());
        session.handle(MapEvent::ZoomChanged(10.0));

        let camera = session.handle(MapEvent::PolygonCommitted(around_tehran()));
        match camera {
            Some(CameraRequest::FitBounds {
                bounds,
                padding_px,
                max_zoom,
            }) => {
                assert_eq!(padding_px, 50);
                assert_eq!(max_zoom, 15.0);
                assert_eq!(bounds.min(), coord! { x: 51.3, y: 35.6 });
                assert_eq!(bounds.max(), coord! { x: 51.42, y: 35.72 });
            }
            other => panic!("expected fit bounds, got {:?}", other),
        }

        assert!(session.polygon().is_some_and(|p| p.is_active()));
        let ids: Vec<u64> = session.filtered_ads().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(session.plan().groups.len(), 1);
        assert_eq!(session.panel().label, PanelLabel::AllAds(2));

        session.handle(MapEvent::ZoomChanged(15.0));
        assert_eq!(session.panel().label, PanelLabel::InSelectedArea(2));

        assert_eq!(session.handle(MapEvent::PolygonCleared), None);
        assert!(session.polygon().is_none());
        assert_eq!(session.filtered_ads().len(), 4);
        assert_eq!(session.panel().label, PanelLabel::InVisibleArea(4));
    }

    #[test]
    fn test_degenerate_polygon_keeps_everything() {
        let mut session = MapSession::with_ads(EngineConfig::default(), ads());
        session.handle(MapEvent::ZoomChanged(10.0));
        let camera = session.handle(MapEvent::PolygonCommitted(vec![LatLng::new(0.0, 0.0)]));
        assert_eq!(camera, None);
        assert_eq!(session.filtered_ads().len(), 4);
    }

    #[test]
    fn test_session_matches_pure_planner() {
        let config = EngineConfig::default();
        let mut session = MapSession::with_ads(config.clone(), ads());
        session.handle(MapEvent::PolygonCommitted(around_tehran()));
        session.handle(MapEvent::ZoomChanged(16.0));

        let polygon = FilterPolygon::new(around_tehran());
        let expected = compute_display_plan(
            &ads(),
            &Viewport::new(Some(16.0), None),
            Some(&polygon),
            &config,
        );
        assert_eq!(session.plan(), &expected);
    }

    #[test]
    fn test_group_and_ad_selection() {
        let mut session = MapSession::with_ads(EngineConfig::default(), ads());
        session.handle(MapEvent::ZoomChanged(7.0));

        let selection = session
            .select_group(&GroupKey::City("Mashhad".to_string()))
            .unwrap();
        assert_eq!(selection.members.len(), 1);
        assert_eq!(selection.members[0].id, 4);
        assert_eq!(
            selection.camera,
            CameraRequest::fly_to(LatLng::new(36.3, 59.6), 13.0)
        );

        assert_eq!(
            session.select_panel_ad(1),
            Some(CameraRequest::fly_to(LatLng::new(35.69, 51.39), 14.0))
        );
        assert_eq!(
            session.select_detail_ad(1),
            Some(CameraRequest::fly_to(LatLng::new(35.69, 51.39), 15.0))
        );
        assert_eq!(session.select_panel_ad(404), None);
    }

    #[test]
    fn test_empty_ads_draw_nothing() {
        let mut session = MapSession::new(EngineConfig::default());
        session.handle(MapEvent::ZoomChanged(14.0));
        assert!(session.plan().groups.is_empty());
        assert_eq!(session.plan_computations(), 0);
        assert_eq!(session.panel().label, PanelLabel::InVisibleArea(0));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let original = ads();
        let mut session = MapSession::with_ads(EngineConfig::default(), original.clone());
        session.handle(MapEvent::ZoomChanged(14.0));
        session.handle(MapEvent::PolygonCommitted(around_tehran()));
        assert_eq!(session.ads(), original.as_slice());
    }
}

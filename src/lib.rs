// Copyright Catenary Transit Initiatives
// Spatial aggregation and filtering for geo-tagged classified ads

#![deny(
    clippy::mutable_key_type,
    clippy::map_entry,
    clippy::boxed_local,
    clippy::let_unit_value,
    clippy::redundant_allocation,
    clippy::bool_comparison,
    clippy::bind_instead_of_map,
    clippy::vec_box,
    clippy::while_let_loop,
    clippy::useless_asref,
    clippy::repeat_once,
    clippy::deref_addrof,
    clippy::suspicious_map,
    clippy::arc_with_non_send_sync,
    clippy::single_char_pattern,
    clippy::for_kv_map,
    clippy::let_unit_value,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::bytes_nth,
    clippy::deprecated_clippy_cfg_attr,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::cmp_null,
    clippy::op_ref
)]

#[macro_use]
extern crate serde;

pub mod ad_source;
pub mod aggregate;
pub mod camera;
pub mod city_clusters;
pub mod config;
pub mod display_plan;
pub mod geometry;
pub mod models;
pub mod proximity_grouping;
pub mod session;
pub mod side_panel;

pub use aggregate::{AdGroup, GroupKey};
pub use config::EngineConfig;
pub use display_plan::{DisplayMode, DisplayPlan, Viewport, compute_display_plan};
pub use models::{Ad, AdCategory, LatLng};
pub use session::{MapEvent, MapSession};

// Copyright Catenary Transit Initiatives
// Ad records as delivered by the listing source

use chrono::{DateTime, Utc};
use geo_types::Coord;
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdCategory {
    Apartment,
    Shop,
    Land,
    Office,
}

impl AdCategory {
    pub const ALL: [AdCategory; 4] = [
        AdCategory::Apartment,
        AdCategory::Shop,
        AdCategory::Office,
        AdCategory::Land,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdCategory::Apartment => "apartment",
            AdCategory::Shop => "shop",
            AdCategory::Land => "land",
            AdCategory::Office => "office",
        }
    }
}

impl fmt::Display for AdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Geo convention: x is longitude, y is latitude.
    pub fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    pub fn from_coord(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }

    /// Planar distance in raw degree units, not great-circle.
    pub fn degree_distance(&self, other: &LatLng) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lng - other.lng).powi(2)).sqrt()
    }
}

/// A classified ad. Immutable for the whole session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: u64,
    pub title: String,
    pub price: u64,
    pub category: AdCategory,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub city: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ad {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn has_finite_position(&self) -> bool {
        self.position().is_finite()
    }
}

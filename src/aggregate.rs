// Copyright Catenary Transit Initiatives
// Shared group types for city and proximity aggregation

use crate::models::{Ad, LatLng};
use std::fmt;

/// Running sums for one group. Centroid and average price are always derived
/// from the sums, never stored, so they cannot drift out of sync with membership.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupAccumulator {
    pub count: usize,
    pub lat_sum: f64,
    pub lng_sum: f64,
    pub price_sum: u128,
}

impl GroupAccumulator {
    pub fn of(ad: &Ad) -> Self {
        Self::default().with(ad)
    }

    /// Returns the accumulator with `ad` folded in.
    #[must_use]
    pub fn with(self, ad: &Ad) -> Self {
        Self {
            count: self.count + 1,
            lat_sum: self.lat_sum + ad.lat,
            lng_sum: self.lng_sum + ad.lng,
            price_sum: self.price_sum + ad.price as u128,
        }
    }

    pub fn centroid(&self) -> Option<LatLng> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(LatLng::new(self.lat_sum / n, self.lng_sum / n))
    }

    pub fn average_price(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.price_sum as f64 / self.count as f64)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GroupKey {
    City(String),
    /// Creation index within one proximity pass.
    Proximity(usize),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::City(name) => write!(f, "{}", name),
            GroupKey::Proximity(index) => write!(f, "group-{}", index),
        }
    }
}

/// One derived group of ads, rebuilt on every aggregation pass.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdGroup {
    pub key: GroupKey,
    pub count: usize,
    pub centroid: LatLng,
    pub average_price: f64,
    pub members: Vec<Ad>,
}

impl AdGroup {
    /// Returns `None` for an empty member list.
    pub(crate) fn from_members(key: GroupKey, members: Vec<Ad>) -> Option<Self> {
        let acc = members
            .iter()
            .fold(GroupAccumulator::default(), |acc, ad| acc.with(ad));

        Some(AdGroup {
            key,
            count: acc.count,
            centroid: acc.centroid()?,
            average_price: acc.average_price()?,
            members,
        })
    }

    /// First member, used as the marker's face for proximity groups.
    pub fn representative(&self) -> Option<&Ad> {
        self.members.first()
    }

    pub fn marker_content(&self) -> MarkerContent {
        match (&self.key, self.members.as_slice()) {
            (GroupKey::Proximity(_), [single]) => MarkerContent::Single {
                ad_id: single.id,
                title: single.title.clone(),
                image: single.image.clone(),
                price: single.price,
            },
            (GroupKey::Proximity(_), _) => MarkerContent::Aggregate {
                count: self.count,
                average_price: self.average_price,
            },
            (GroupKey::City(name), _) => MarkerContent::CityBadge {
                city: name.clone(),
                count: self.count,
            },
        }
    }
}

/// What a marker shows. Rendering is left to the map collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkerContent {
    Single {
        ad_id: u64,
        title: String,
        image: String,
        price: u64,
    },
    Aggregate {
        count: usize,
        average_price: f64,
    },
    CityBadge {
        city: String,
        count: usize,
    },
}

impl MarkerContent {
    pub fn label(&self) -> String {
        match self {
            MarkerContent::Single { title, .. } => title.clone(),
            MarkerContent::Aggregate { count, .. } => format!("{} ads", count),
            MarkerContent::CityBadge { count, .. } => count.to_string(),
        }
    }
}

/// Count and mean price of a selected member list, shown in the detail panel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SelectionSummary {
    pub count: usize,
    pub average_price: f64,
}

impl SelectionSummary {
    pub fn of(ads: &[Ad]) -> Option<Self> {
        let acc = ads
            .iter()
            .fold(GroupAccumulator::default(), |acc, ad| acc.with(ad));
        Some(SelectionSummary {
            count: acc.count,
            average_price: acc.average_price()?,
        })
    }
}

// Copyright Catenary Transit Initiatives
// Greedy proximity grouping of ads for the detailed map view

use crate::aggregate::{AdGroup, GroupAccumulator, GroupKey};
use crate::models::Ad;

/// Default merge distance in raw degrees (roughly 1 km at mid latitudes).
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 0.01;

struct OpenGroup {
    acc: GroupAccumulator,
    members: Vec<Ad>,
}

/// First-fit greedy grouper.
///
/// Each pushed ad joins the first group, in creation order, whose running
/// centroid is closer than the threshold, otherwise it seeds a new group.
/// Centroids move as members join, so later ads are compared against the
/// drifted centroid rather than the seed. The result depends on input order
/// and is not a nearest-centroid clustering.
pub struct ProximityGrouper {
    threshold: f64,
    groups: Vec<OpenGroup>,
}

impl ProximityGrouper {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            groups: Vec::new(),
        }
    }

    /// Adds `ad` and returns the index of the group it landed in, or `None`
    /// when the ad has a non-finite position and was skipped.
    pub fn push(&mut self, ad: &Ad) -> Option<usize> {
        if !ad.has_finite_position() {
            tracing::warn!(
                "Ad {} has non-finite position ({}, {}), skipping proximity grouping",
                ad.id,
                ad.lat,
                ad.lng
            );
            return None;
        }

        let position = ad.position();
        let hit = self.groups.iter().position(|group| {
            group
                .acc
                .centroid()
                .is_some_and(|c| position.degree_distance(&c) < self.threshold)
        });

        match hit {
            Some(index) => {
                let group = &mut self.groups[index];
                group.acc = group.acc.with(ad);
                group.members.push(ad.clone());
                Some(index)
            }
            None => {
                self.groups.push(OpenGroup {
                    acc: GroupAccumulator::of(ad),
                    members: vec![ad.clone()],
                });
                Some(self.groups.len() - 1)
            }
        }
    }

    pub fn finish(self) -> Vec<AdGroup> {
        self.groups
            .into_iter()
            .enumerate()
            .filter_map(|(index, group)| {
                AdGroup::from_members(GroupKey::Proximity(index), group.members)
            })
            .collect()
    }
}

/// Partitions `ads` into proximity groups. Members keep input order.
pub fn group_nearby_ads(ads: &[Ad], threshold: f64) -> Vec<AdGroup> {
    let mut grouper = ProximityGrouper::new(threshold);
    for ad in ads {
        grouper.push(ad);
    }
    let groups = grouper.finish();

    tracing::debug!(
        "Grouped {} ads into {} proximity groups (threshold {})",
        ads.len(),
        groups.len(),
        threshold
    );

    groups
}

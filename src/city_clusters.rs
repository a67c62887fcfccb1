// Copyright Catenary Transit Initiatives
// City-level clusters for the zoomed-out map view

use crate::aggregate::{AdGroup, GroupKey};
use crate::models::Ad;
use ahash::AHashMap;

pub const UNKNOWN_CITY_LABEL: &str = "unknown";

/// Groups `ads` by their exact city field, with empty fields collected under
/// `unknown_label`. Labels are not normalized. Groups come out in order of
/// first appearance and members keep input order, but membership itself does
/// not depend on order.
pub fn build_city_clusters(ads: &[Ad], unknown_label: &str) -> Vec<AdGroup> {
    let mut index_by_city: AHashMap<&str, usize> = AHashMap::new();
    let mut buckets: Vec<(String, Vec<Ad>)> = Vec::new();

    for ad in ads {
        if !ad.has_finite_position() {
            tracing::warn!(
                "Ad {} has non-finite position ({}, {}), skipping city clustering",
                ad.id,
                ad.lat,
                ad.lng
            );
            continue;
        }

        let city = if ad.city.is_empty() {
            unknown_label
        } else {
            ad.city.as_str()
        };

        let slot = *index_by_city.entry(city).or_insert_with(|| {
            buckets.push((city.to_string(), Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(ad.clone());
    }

    let clusters: Vec<AdGroup> = buckets
        .into_iter()
        .filter_map(|(city, members)| AdGroup::from_members(GroupKey::City(city), members))
        .collect();

    tracing::debug!(
        "Built {} city clusters from {} ads",
        clusters.len(),
        ads.len()
    );

    clusters
}

// Copyright Catenary Transit Initiatives
// Ad list boundary: JSON files and generated mock listings

use crate::models::{Ad, AdCategory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdSourceError {
    #[error("I/O error reading ads from '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed ad list in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Duplicate ad id {0}")]
    DuplicateId(u64),
}

/// Reads a JSON array of ads. Ids must be unique.
pub fn load_ads_from_json(path: &Path) -> Result<Vec<Ad>, AdSourceError> {
    let raw = std::fs::read_to_string(path).map_err(|source| AdSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ads: Vec<Ad> = serde_json::from_str(&raw).map_err(|source| AdSourceError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = ahash::AHashSet::with_capacity(ads.len());
    for ad in &ads {
        if !seen.insert(ad.id) {
            return Err(AdSourceError::DuplicateId(ad.id));
        }
    }

    let non_finite = ads.iter().filter(|ad| !ad.has_finite_position()).count();
    if non_finite > 0 {
        tracing::warn!(
            "{} of {} ads in {} have non-finite positions",
            non_finite,
            ads.len(),
            path.display()
        );
    }

    Ok(ads)
}

pub struct MockCity {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

pub const MOCK_CITIES: [MockCity; 10] = [
    MockCity {
        name: "Tehran",
        lat: 35.6892,
        lng: 51.389,
    },
    MockCity {
        name: "Shiraz",
        lat: 29.5918,
        lng: 52.5837,
    },
    MockCity {
        name: "Isfahan",
        lat: 32.6539,
        lng: 51.666,
    },
    MockCity {
        name: "Tabriz",
        lat: 38.0709,
        lng: 46.3005,
    },
    MockCity {
        name: "Rasht",
        lat: 37.2808,
        lng: 49.5832,
    },
    MockCity {
        name: "Mashhad",
        lat: 36.297,
        lng: 59.6062,
    },
    MockCity {
        name: "Ahvaz",
        lat: 31.3183,
        lng: 48.6706,
    },
    MockCity {
        name: "Hamedan",
        lat: 34.798,
        lng: 48.5146,
    },
    MockCity {
        name: "Kerman",
        lat: 30.2839,
        lng: 57.0834,
    },
    MockCity {
        name: "Kermanshah",
        lat: 34.3142,
        lng: 47.065,
    },
];

/// Mock ads scatter up to this many degrees either side of the city centre.
const MOCK_SPREAD: f64 = 0.02;

/// Deterministic placeholder image, ten per category.
pub fn mock_image_url(category: AdCategory, id: u64) -> String {
    let base = match category {
        AdCategory::Apartment => 1,
        AdCategory::Shop => 11,
        AdCategory::Office => 21,
        AdCategory::Land => 31,
    };
    let image_id = base + id % 10;
    format!(
        "https://picsum.photos/seed/{}-{}/400/300",
        category, image_id
    )
}

/// Generates `count` ads with ids starting at 1. The same seed always yields the
/// same list.
pub fn generate_mock_ads(count: usize, seed: u64) -> Vec<Ad> {
    let mut rng = StdRng::seed_from_u64(seed);

    (1..=count as u64)
        .map(|id| {
            let city = &MOCK_CITIES[rng.random_range(0..MOCK_CITIES.len())];
            let category = AdCategory::ALL[rng.random_range(0..AdCategory::ALL.len())];
            let price = match category {
                AdCategory::Land => rng.random_range(1_000_000_000..5_000_000_000u64),
                _ => rng.random_range(1_500_000_000..13_500_000_000u64),
            };

            Ad {
                id,
                title: format!("{} {} in {}", category, id, city.name),
                price,
                category,
                lat: city.lat + rng.random_range(-MOCK_SPREAD..MOCK_SPREAD),
                lng: city.lng + rng.random_range(-MOCK_SPREAD..MOCK_SPREAD),
                city: city.name.to_string(),
                image: mock_image_url(category, id),
                created_at: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mock_ads_are_reproducible() {
        let a = generate_mock_ads(50, 3);
        let b = generate_mock_ads(50, 3);
        assert_eq!(a, b);
        assert_ne!(a, generate_mock_ads(50, 4));
    }

    #[test]
    fn test_mock_ads_stay_near_their_city() {
        for ad in generate_mock_ads(200, 1) {
            let city = MOCK_CITIES.iter().find(|c| c.name == ad.city).unwrap();
            assert!((ad.lat - city.lat).abs() <= MOCK_SPREAD + 1e-9);
            assert!((ad.lng - city.lng).abs() <= MOCK_SPREAD + 1e-9);
            assert!(ad.title.contains(city.name));

            let (low, high) = match ad.category {
                AdCategory::Land => (1_000_000_000, 5_000_000_000),
                _ => (1_500_000_000, 13_500_000_000),
            };
            assert!(ad.price >= low && ad.price < high);
        }
    }

    #[test]
    fn test_mock_ids_are_sequential() {
        let ids: Vec<u64> = generate_mock_ads(5, 0).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(generate_mock_ads(0, 0).is_empty());
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            mock_image_url(AdCategory::Shop, 23),
            "https://picsum.photos/seed/shop-14/400/300"
        );
    }

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let file_name = format!("admap-{}-{}.json", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_reads_generated_ads() {
        let ads = generate_mock_ads(10, 9);
        let path = write_temp("roundtrip", &serde_json::to_string(&ads).unwrap());
        let loaded = load_ads_from_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), ads.len());
        for (read, written) in loaded.iter().zip(&ads) {
            assert_eq!(read.id, written.id);
            assert_eq!(read.city, written.city);
            assert_eq!(read.price, written.price);
            assert!((read.lat - written.lat).abs() < 1e-9);
            assert!((read.lng - written.lng).abs() < 1e-9);
        }
    }

    #[test]
    fn test_load_fixture() {
        let path = write_temp(
            "fixture",
            r#"[
                {"id": 1, "title": "a", "price": 5, "category": "office", "lat": 34.79, "lng": 48.51, "city": "Hamedan", "image": "i"},
                {"id": 2, "title": "b", "price": 6, "category": "land", "lat": 34.8, "lng": 48.52, "city": "", "image": "j", "createdAt": "2024-11-05T08:30:00Z"}
            ]"#,
        );
        let loaded = load_ads_from_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].category, AdCategory::Office);
        assert_eq!(loaded[1].city, "");
        assert!(loaded[1].created_at.is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_ads_from_json(Path::new("/no/such/ads.json"));
        assert!(matches!(result, Err(AdSourceError::Io { .. })));
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let mut ads = generate_mock_ads(2, 9);
        ads[1].id = ads[0].id;
        let path = write_temp("dupes", &serde_json::to_string(&ads).unwrap());
        let result = load_ads_from_json(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AdSourceError::DuplicateId(1))));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = write_temp("broken", "[{\"id\": 1");
        let result = load_ads_from_json(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(AdSourceError::Parse { .. })));
    }
}

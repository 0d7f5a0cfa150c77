//! Geo point provider
//!
//! Replaces a geo object with a random land location. The key is built from
//! the raw latitude and longitude so that the same point always maps to the
//! same replacement, whatever other sub-fields (city, region) it carries.

use super::MaskProvider;
use crate::masking::key::MaskKey;
use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use serde_json::{json, Value};

/// Known land location: latitude, longitude, ISO country code, time zone
struct LandLocation {
    lat: f64,
    lon: f64,
    country_iso_code: &'static str,
    timezone: &'static str,
}

const fn loc(lat: f64, lon: f64, country_iso_code: &'static str, timezone: &'static str) -> LandLocation {
    LandLocation {
        lat,
        lon,
        country_iso_code,
        timezone,
    }
}

static LAND_LOCATIONS: &[LandLocation] = &[
    loc(48.85341, 2.3488, "FR", "Europe/Paris"),
    loc(51.50853, -0.12574, "GB", "Europe/London"),
    loc(52.52437, 13.41053, "DE", "Europe/Berlin"),
    loc(40.4165, -3.70256, "ES", "Europe/Madrid"),
    loc(41.89193, 12.51133, "IT", "Europe/Rome"),
    loc(59.33258, 18.0649, "SE", "Europe/Stockholm"),
    loc(52.22977, 21.01178, "PL", "Europe/Warsaw"),
    loc(40.71427, -74.00597, "US", "America/New_York"),
    loc(41.85003, -87.65005, "US", "America/Chicago"),
    loc(34.05223, -118.24368, "US", "America/Los_Angeles"),
    loc(43.70011, -79.4163, "CA", "America/Toronto"),
    loc(19.42847, -99.12766, "MX", "America/Mexico_City"),
    loc(-23.5475, -46.63611, "BR", "America/Sao_Paulo"),
    loc(-34.61315, -58.37723, "AR", "America/Argentina/Buenos_Aires"),
    loc(4.60971, -74.08175, "CO", "America/Bogota"),
    loc(35.6895, 139.69171, "JP", "Asia/Tokyo"),
    loc(37.566, 126.9784, "KR", "Asia/Seoul"),
    loc(28.65195, 77.23149, "IN", "Asia/Kolkata"),
    loc(1.28967, 103.85007, "SG", "Asia/Singapore"),
    loc(25.07725, 55.30927, "AE", "Asia/Dubai"),
    loc(-33.86785, 151.20732, "AU", "Australia/Sydney"),
    loc(-36.84853, 174.76349, "NZ", "Pacific/Auckland"),
    loc(30.06263, 31.24967, "EG", "Africa/Cairo"),
    loc(6.45407, 3.39467, "NG", "Africa/Lagos"),
    loc(-1.28333, 36.81667, "KE", "Africa/Nairobi"),
    loc(-33.92584, 18.42322, "ZA", "Africa/Johannesburg"),
];

/// Replaces geo objects with `{country_iso_code, location{lat, lon}, continent_name}`
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoPointProvider;

impl GeoPointProvider {
    /// Extracts `(lat, lon)` from either `{location: {lat, lon}}` or `{lat, lon}`
    fn coordinates(raw: &Value) -> Option<(&Value, &Value)> {
        let point = raw.get("location").unwrap_or(raw);
        Some((point.get("lat")?, point.get("lon")?))
    }

    fn coordinate_text(value: &Value) -> Option<String> {
        match value {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl MaskProvider for GeoPointProvider {
    fn generate(&self, _raw: &Value) -> Result<Value> {
        let place = LAND_LOCATIONS
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| anyhow!("land location table is empty"))?;
        let continent = place.timezone.split('/').next().unwrap_or(place.timezone);

        Ok(json!({
            "country_iso_code": place.country_iso_code,
            "location": {
                "lat": place.lat,
                "lon": place.lon,
            },
            "continent_name": continent,
        }))
    }

    fn derive_key(&self, raw: &Value) -> Result<MaskKey> {
        let (lat, lon) = Self::coordinates(raw)
            .ok_or_else(|| anyhow!("geo value has no location.lat/location.lon"))?;
        let lat = Self::coordinate_text(lat).ok_or_else(|| anyhow!("latitude is not a number"))?;
        let lon = Self::coordinate_text(lon).ok_or_else(|| anyhow!("longitude is not a number"))?;
        Ok(MaskKey::composite([lat, lon]))
    }

    fn description(&self) -> &str {
        "Random land location, keyed by lat:lon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_nested_location() {
        let raw = json!({
            "city_name": "Boston",
            "location": {"lat": 42.3601, "lon": -71.0589}
        });
        assert_eq!(
            GeoPointProvider.derive_key(&raw).unwrap(),
            MaskKey::Text("42.3601:-71.0589".to_string())
        );
    }

    #[test]
    fn test_key_ignores_other_sub_fields() {
        let a = json!({"city_name": "Boston", "location": {"lat": 1.5, "lon": 2.5}});
        let b = json!({"region_name": "MA", "location": {"lat": 1.5, "lon": 2.5}});
        assert_eq!(
            GeoPointProvider.derive_key(&a).unwrap(),
            GeoPointProvider.derive_key(&b).unwrap()
        );
    }

    #[test]
    fn test_key_from_flat_point() {
        let raw = json!({"lat": "10.5", "lon": "20.25"});
        assert_eq!(
            GeoPointProvider.derive_key(&raw).unwrap(),
            MaskKey::Text("10.5:20.25".to_string())
        );
    }

    #[test]
    fn test_key_requires_coordinates() {
        assert!(GeoPointProvider.derive_key(&json!({"city_name": "Boston"})).is_err());
        assert!(GeoPointProvider.derive_key(&json!("42,-71")).is_err());
        assert!(GeoPointProvider
            .derive_key(&json!({"location": {"lat": true, "lon": 1}}))
            .is_err());
    }

    #[test]
    fn test_generated_shape() {
        let value = GeoPointProvider.generate(&json!({})).unwrap();
        assert!(value["country_iso_code"].is_string());
        assert!(value["continent_name"].is_string());
        assert!(value["location"]["lat"].is_f64());
        assert!(value["location"]["lon"].is_f64());
    }

    #[test]
    fn test_continent_is_time_zone_prefix() {
        for _ in 0..20 {
            let value = GeoPointProvider.generate(&json!({})).unwrap();
            let continent = value["continent_name"].as_str().unwrap();
            assert!(!continent.contains('/'));
        }
    }
}

use serde::{Deserialize, Serialize};

// ============================================================================
// Geographic Value Objects
// ============================================================================

/// A WGS84 coordinate pair. Precision beyond ~1e-6 degrees is noise for
/// courier tracking, so plain f64 fields are sufficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Meters per degree of latitude. Longitude is scaled by cos(lat).
const METERS_PER_DEGREE: f64 = 111_320.0;

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Approximate ground distance in meters using an equirectangular
    /// projection. Accurate to well under 1% at city scale, which is all
    /// courier tracking needs.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let mean_lat = ((self.lat + other.lat) / 2.0).to_radians();
        let dy = (other.lat - self.lat) * METERS_PER_DEGREE;
        let dx = (other.lon - self.lon) * METERS_PER_DEGREE * mean_lat.cos();
        (dx * dx + dy * dy).sqrt()
    }

    /// Move `step_m` meters from `self` toward `target`. If the target is
    /// closer than one step, lands exactly on it.
    pub fn step_toward(&self, target: &GeoPoint, step_m: f64) -> GeoPoint {
        let total = self.distance_m(target);
        if total <= step_m || total == 0.0 {
            return *target;
        }
        let frac = step_m / total;
        GeoPoint {
            lat: self.lat + (target.lat - self.lat) * frac,
            lon: self.lon + (target.lon - self.lon) * frac,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(p.distance_m(&p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = GeoPoint::new(48.0, 2.0);
        let b = GeoPoint::new(49.0, 2.0);
        let d = a.distance_m(&b);
        assert!((d - METERS_PER_DEGREE).abs() < 1.0);
    }

    #[test]
    fn test_step_toward_converges() {
        let start = GeoPoint::new(48.8566, 2.3522);
        let target = GeoPoint::new(48.8600, 2.3600);

        let mut current = start;
        let mut previous = current.distance_m(&target);
        for _ in 0..1000 {
            current = current.step_toward(&target, 50.0);
            let remaining = current.distance_m(&target);
            assert!(remaining <= previous);
            previous = remaining;
            if remaining == 0.0 {
                break;
            }
        }

        assert_eq!(current, target);
    }

    #[test]
    fn test_step_toward_lands_on_close_target() {
        let start = GeoPoint::new(48.8566, 2.3522);
        let target = GeoPoint::new(48.85661, 2.35221);
        assert!(start.distance_m(&target) < 50.0);

        let stepped = start.step_toward(&target, 50.0);
        assert_eq!(stepped, target);
    }
}

//! Linear scale mapping passenger volume to circle radius.

use bevy::prelude::*;

/// Largest circle radius, assigned to the busiest airport.
const RANGE_MAX: f32 = 10.0;

/// Linear scale with domain [0, domain_max] and range [0, RANGE_MAX].
/// The domain is set from the loaded dataset's maximum passenger volume.
#[derive(Resource, Clone, Copy)]
pub struct SizeScale {
    domain_max: f32,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self { domain_max: 1.0 }
    }
}

impl SizeScale {
    pub fn new(domain_max: f32) -> Self {
        Self {
            domain_max: domain_max.max(f32::EPSILON),
        }
    }

    /// Circle radius for a passenger volume. Monotonically non-decreasing.
    pub fn radius(&self, passengers: f32) -> f32 {
        (passengers.max(0.0) / self.domain_max) * RANGE_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_monotonic() {
        let scale = SizeScale::new(1000.0);
        assert!(scale.radius(100.0) < scale.radius(200.0));
        assert!(scale.radius(200.0) <= scale.radius(200.0));
        assert_eq!(scale.radius(0.0), 0.0);
    }

    #[test]
    fn domain_max_hits_range_max() {
        let scale = SizeScale::new(54_093_390.0);
        assert!((scale.radius(54_093_390.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn zero_domain_does_not_divide_by_zero() {
        let scale = SizeScale::new(0.0);
        let r = scale.radius(10.0);
        assert!(r.is_finite());
    }
}

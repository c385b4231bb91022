/// A closed or open range of ray parameters.
///
/// The intersection engine uses the exclusive form: a hit is accepted only
/// when `min < t < max`, where `min` is the camera clip distance and `max`
/// shrinks to the closest hit found so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Returns a copy with `max` replaced, used to narrow the search after a hit.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// The unit interval [0, 1], the valid range of a barycentric weight.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
        assert!(interval.surrounds(0.1));
    }

    #[test]
    fn test_interval_rejects_nan() {
        assert!(!Interval::UNIT.contains(f64::NAN));
        assert!(!Interval::new(f64::NEG_INFINITY, f64::INFINITY).surrounds(f64::NAN));
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::new(0.5, f64::INFINITY).with_max(3.0);
        assert_eq!(interval, Interval::new(0.5, 3.0));
        assert!(!interval.surrounds(3.0));
    }
}

/// A range of real numbers, used for hit distances and color clamping.
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

    /// Open interval (0, max): the valid range for a hit along a ray that
    /// already has a candidate at distance `max`.
    pub fn ahead(max: f64) -> Self {
        Self::new(0.0, max)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Grows the upper bound by `bias`.
    ///
    /// A candidate hit is accepted when `t - bias < max`, which is the same
    /// as `t < max + bias`.
    pub fn with_bias(&self, bias: f64) -> Interval {
        Interval::new(self.min, self.max + bias)
    }

    /// The displayable color range [0, 1].
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

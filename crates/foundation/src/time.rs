use serde::{Deserialize, Serialize};

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    /// Host timestamps (`requestAnimationFrame`, `performance.now()`) are in milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self(ms / 1000.0)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Folds the time into `[0, period_s)`. A non-positive period leaves it at zero.
    pub fn wrap(self, period_s: f64) -> Self {
        if period_s <= 0.0 || !self.0.is_finite() {
            return Self::ZERO;
        }
        Self(self.0.rem_euclid(period_s))
    }

    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn from_millis_converts_to_seconds() {
        assert_eq!(Time::from_millis(1500.0), Time(1.5));
    }

    #[test]
    fn wrap_folds_into_period() {
        assert_eq!(Time(6.0).wrap(6.0), Time(0.0));
        assert_eq!(Time(7.5).wrap(6.0), Time(1.5));
        assert_eq!(Time(-1.0).wrap(6.0), Time(5.0));
        assert_eq!(Time(3.0).wrap(0.0), Time::ZERO);
    }

    #[test]
    fn since_never_goes_negative() {
        assert_eq!(Time(2.0).since(Time(0.5)), 1.5);
        assert_eq!(Time(0.5).since(Time(2.0)), 0.0);
    }
}

// Kinematic limits and their signed per-direction form

use crate::{
    error::{Result, SolveError, ensure_finite},
    profile::Direction,
};
use serde::{Deserialize, Serialize};

/// Velocity, acceleration and jerk caps of an axis.
///
/// `v_max ≥ 0 ≥ v_min`, `a_max ≥ 0 ≥ a_min` and `j_max ≥ 0`. A zero jerk or
/// acceleration limit is allowed and selects the lower-order solver path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    pub v_max: f64,
    pub v_min: f64,
    pub a_max: f64,
    pub a_min: f64,
    pub j_max: f64,
}

impl KinematicLimits {
    pub const fn new(v_max: f64, v_min: f64, a_max: f64, a_min: f64, j_max: f64) -> Self {
        Self {
            v_max,
            v_min,
            a_max,
            a_min,
            j_max,
        }
    }

    /// Limits with `v_min = -v_max` and `a_min = -a_max`.
    pub const fn symmetric(v_max: f64, a_max: f64, j_max: f64) -> Self {
        Self::new(v_max, -v_max, a_max, -a_max, j_max)
    }

    /// The limits of the same axis with its coordinate negated.
    pub fn mirrored(&self) -> Self {
        Self::new(-self.v_min, -self.v_max, -self.a_min, -self.a_max, self.j_max)
    }

    /// True when the jerk-based formulas are undefined for these limits.
    pub fn is_degenerate(&self) -> bool {
        self.j_max == 0.0 || self.a_max == 0.0 || self.a_min == 0.0
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("v_max", self.v_max)?;
        ensure_finite("v_min", self.v_min)?;
        ensure_finite("a_max", self.a_max)?;
        ensure_finite("a_min", self.a_min)?;
        ensure_finite("j_max", self.j_max)?;

        let checks = [
            ("v_max", "non-negative", self.v_max >= 0.0, self.v_max),
            ("v_min", "non-positive", self.v_min <= 0.0, self.v_min),
            ("a_max", "non-negative", self.a_max >= 0.0, self.a_max),
            ("a_min", "non-positive", self.a_min <= 0.0, self.a_min),
            ("j_max", "non-negative", self.j_max >= 0.0, self.j_max),
        ];
        for (name, sign, ok, value) in checks {
            if !ok {
                return Err(SolveError::WrongSign { name, sign, value });
            }
        }

        Ok(())
    }
}

/// Signed limits for one direction of travel.
///
/// The forward set climbs toward `v_max` with positive jerk first; its
/// [`reversed`](Self::reversed) counterpart swaps the bounds and the jerk
/// sign so the same formulas describe the opposite direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub v_max: f64,
    pub v_min: f64,
    pub a_max: f64,
    pub a_min: f64,
    pub j: f64,
}

impl Bounds {
    pub const fn forward(limits: &KinematicLimits) -> Self {
        Self {
            v_max: limits.v_max,
            v_min: limits.v_min,
            a_max: limits.a_max,
            a_min: limits.a_min,
            j: limits.j_max,
        }
    }

    pub const fn reversed(self) -> Self {
        Self {
            v_max: self.v_min,
            v_min: self.v_max,
            a_max: self.a_min,
            a_min: self.a_max,
            j: -self.j,
        }
    }

    /// Zero jerk counts as upward.
    pub fn direction(&self) -> Direction {
        if self.j >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Upper and lower velocity bound regardless of direction.
    pub(crate) fn velocity_range(&self) -> (f64, f64) {
        (self.v_max.max(self.v_min), self.v_max.min(self.v_min))
    }

    /// Upper and lower acceleration bound regardless of direction.
    pub(crate) fn acceleration_range(&self) -> (f64, f64) {
        (self.a_max.max(self.a_min), self.a_max.min(self.a_min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_swaps_bounds() {
        let limits = KinematicLimits::new(2.0, -1.0, 3.0, -4.0, 5.0);
        let mirrored = limits.mirrored();
        assert_eq!(mirrored, KinematicLimits::new(1.0, -2.0, 4.0, -3.0, 5.0));
        assert_eq!(mirrored.mirrored(), limits);
    }

    #[test]
    fn reversed_bounds_flip_direction() {
        let forward = Bounds::forward(&KinematicLimits::new(2.0, -1.0, 3.0, -4.0, 5.0));
        let reversed = forward.reversed();
        assert_eq!(forward.direction(), Direction::Up);
        assert_eq!(reversed.direction(), Direction::Down);
        assert_eq!(reversed.v_max, -1.0);
        assert_eq!(reversed.a_min, 3.0);
        assert_eq!(reversed.velocity_range(), forward.velocity_range());
        assert_eq!(reversed.acceleration_range(), forward.acceleration_range());
        assert_eq!(reversed.reversed(), forward);
    }

    #[test]
    fn validate_checks_signs() {
        assert!(KinematicLimits::symmetric(1.0, 1.0, 1.0).validate().is_ok());
        assert!(KinematicLimits::symmetric(1.0, 0.0, 0.0).validate().is_ok());

        let err = KinematicLimits::new(1.0, 0.5, 1.0, -1.0, 1.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            SolveError::WrongSign {
                name: "v_min",
                sign: "non-positive",
                value: 0.5
            }
        );

        let err = KinematicLimits::symmetric(1.0, 1.0, f64::INFINITY)
            .validate()
            .unwrap_err();
        assert!(matches!(err, SolveError::NonFinite { name: "j_max", .. }));
    }

    #[test]
    fn degenerate_limits() {
        assert!(KinematicLimits::symmetric(1.0, 1.0, 0.0).is_degenerate());
        assert!(KinematicLimits::new(1.0, -1.0, 1.0, 0.0, 1.0).is_degenerate());
        assert!(!KinematicLimits::symmetric(1.0, 1.0, 1.0).is_degenerate());
    }
}

// Boundary states of a move

use crate::{
    error::{Result, SolveError, ensure_finite},
    limits::KinematicLimits,
};
use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration of an axis at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub p: f64,
    pub v: f64,
    pub a: f64,
}

impl State {
    pub const fn new(p: f64, v: f64, a: f64) -> Self {
        Self { p, v, a }
    }

    /// Integrates a constant jerk `j` for `t` seconds.
    #[inline]
    pub fn advance(self, t: f64, j: f64) -> Self {
        Self {
            p: self.p + t * (self.v + t * (self.a / 2.0 + t * j / 6.0)),
            v: self.v + t * (self.a + t * j / 2.0),
            a: self.a + t * j,
        }
    }
}

/// Start and target state of a single-axis move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryState {
    pub p0: f64,
    pub v0: f64,
    pub a0: f64,
    pub pf: f64,
    pub vf: f64,
    pub af: f64,
}

impl BoundaryState {
    pub const fn new(start: State, target: State) -> Self {
        Self {
            p0: start.p,
            v0: start.v,
            a0: start.a,
            pf: target.p,
            vf: target.v,
            af: target.a,
        }
    }

    /// A move between two positions, at rest on both ends.
    pub const fn rest_to_rest(p0: f64, pf: f64) -> Self {
        Self::new(State::new(p0, 0.0, 0.0), State::new(pf, 0.0, 0.0))
    }

    pub const fn start(&self) -> State {
        State::new(self.p0, self.v0, self.a0)
    }

    pub const fn target(&self) -> State {
        State::new(self.pf, self.vf, self.af)
    }

    /// Position difference `pf - p0`.
    pub fn pd(&self) -> f64 {
        self.pf - self.p0
    }

    /// Returns the state negated on every component.
    pub fn mirrored(&self) -> Self {
        Self {
            p0: -self.p0,
            v0: -self.v0,
            a0: -self.a0,
            pf: -self.pf,
            vf: -self.vf,
            af: -self.af,
        }
    }

    /// Checks that the target can be held within `limits`.
    ///
    /// The start state may lie outside the limits; the solver brakes it back
    /// inside before planning the main profile.
    pub fn validate(&self, limits: &KinematicLimits) -> Result<()> {
        ensure_finite("p0", self.p0)?;
        ensure_finite("v0", self.v0)?;
        ensure_finite("a0", self.a0)?;
        ensure_finite("pf", self.pf)?;
        ensure_finite("vf", self.vf)?;
        ensure_finite("af", self.af)?;

        if self.vf > limits.v_max || self.vf < limits.v_min {
            return Err(SolveError::TargetVelocity {
                velocity: self.vf,
                min: limits.v_min,
                max: limits.v_max,
            });
        }
        if self.af > limits.a_max || self.af < limits.a_min {
            return Err(SolveError::TargetAcceleration {
                acceleration: self.af,
                min: limits.a_min,
                max: limits.a_max,
            });
        }

        // the target acceleration has to be ramped out of without crossing a
        // velocity limit
        if limits.j_max > 0.0 {
            let overshoot = self.af * self.af / (2.0 * limits.j_max);
            if self.af < 0.0 && self.vf + overshoot > limits.v_max {
                return Err(SolveError::TargetUnreachable {
                    velocity: self.vf,
                    acceleration: self.af,
                    limit: limits.v_max,
                });
            }
            if self.af > 0.0 && self.vf - overshoot < limits.v_min {
                return Err(SolveError::TargetUnreachable {
                    velocity: self.vf,
                    acceleration: self.af,
                    limit: limits.v_min,
                });
            }
        }

        Ok(())
    }

    pub(crate) fn terms(&self) -> Terms {
        let v0_v0 = self.v0 * self.v0;
        let vf_vf = self.vf * self.vf;
        let a0_a0 = self.a0 * self.a0;
        let af_af = self.af * self.af;
        Terms {
            pd: self.pd(),
            v0_v0,
            vf_vf,
            a0_a0,
            af_af,
            a0_p3: a0_a0 * self.a0,
            af_p3: af_af * self.af,
            a0_p4: a0_a0 * a0_a0,
            af_p4: af_af * af_af,
        }
    }
}

/// Powers of the boundary values shared by the closed-form formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Terms {
    pub pd: f64,
    pub v0_v0: f64,
    pub vf_vf: f64,
    pub a0_a0: f64,
    pub af_af: f64,
    pub a0_p3: f64,
    pub af_p3: f64,
    pub a0_p4: f64,
    pub af_p4: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_limits() -> KinematicLimits {
        KinematicLimits::symmetric(1.0, 1.0, 1.0)
    }

    #[test]
    fn advance_matches_closed_form() {
        let s = State::new(1.0, 2.0, 3.0).advance(2.0, -1.5);
        assert_eq!(s.a, 0.0);
        assert_eq!(s.v, 2.0 + 6.0 - 3.0);
        assert_eq!(s.p, 1.0 + 4.0 + 6.0 - 2.0);
    }

    #[test]
    fn terms_are_memoized_powers() {
        let state = BoundaryState::new(State::new(1.0, 2.0, -3.0), State::new(4.0, 0.5, 2.0));
        let terms = state.terms();
        assert_eq!(terms.pd, 3.0);
        assert_eq!(terms.v0_v0, 4.0);
        assert_eq!(terms.a0_p3, -27.0);
        assert_eq!(terms.a0_p4, 81.0);
        assert_eq!(terms.af_p4, 16.0);
    }

    #[test]
    fn rejects_target_that_overshoots_velocity() {
        let state = BoundaryState::new(State::default(), State::new(1.0, 1.0, -0.0001));
        assert!(matches!(
            state.validate(&unit_limits()),
            Err(SolveError::TargetUnreachable { .. })
        ));
    }

    #[test]
    fn accepts_target_with_room_to_ramp() {
        let state = BoundaryState::new(State::default(), State::new(1.0, 0.72, 0.72));
        assert_eq!(state.validate(&unit_limits()), Ok(()));
    }

    #[test]
    fn rejects_target_outside_limits() {
        let state = BoundaryState::new(State::default(), State::new(1.0, 1.5, 0.0));
        assert!(matches!(
            state.validate(&unit_limits()),
            Err(SolveError::TargetVelocity { .. })
        ));

        let state = BoundaryState::new(State::default(), State::new(1.0, 0.0, -2.0));
        assert!(matches!(
            state.validate(&unit_limits()),
            Err(SolveError::TargetAcceleration { .. })
        ));
    }

    #[test]
    fn start_may_violate_limits() {
        let state = BoundaryState::new(State::new(0.0, 3.0, 2.0), State::new(1.0, 0.0, 0.0));
        assert_eq!(state.validate(&unit_limits()), Ok(()));
    }

    #[test]
    fn rejects_nan() {
        let state = BoundaryState::rest_to_rest(0.0, f64::NAN);
        assert!(matches!(
            state.validate(&unit_limits()),
            Err(SolveError::NonFinite { name: "pf", .. })
        ));
    }
}

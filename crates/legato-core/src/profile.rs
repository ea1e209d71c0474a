//! Seven-segment jerk profiles and their validity check.
//!
//! A profile is a list of segment durations together with the jerk applied in
//! each segment. Segments 0–2 shape the first acceleration ramp, segment 3 is
//! the cruise and segments 4–6 shape the second ramp.

use crate::{
    brake::BrakeProfile,
    limits::Bounds,
    state::{BoundaryState, State},
};
use serde::Serialize;

/// Durations above this are treated as unusable.
pub const T_MAX: f64 = 1e12;

/// Absolute tolerance on the final position.
pub const P_PRECISION: f64 = 1e-8;
/// Absolute tolerance on the final velocity.
pub const V_PRECISION: f64 = 1e-8;
/// Absolute tolerance on the final acceleration.
pub const A_PRECISION: f64 = 1e-10;
/// Tolerance growth per unit of magnitude of the values compared.
pub const RELATIVE_PRECISION: f64 = 1e-12;

const T_EPS: f64 = 1e-12;
const V_EPS: f64 = 1e-12;
const A_EPS: f64 = 1e-12;

/// Which kinematic caps a profile saturates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReachedLimits {
    Acc0Acc1Vel,
    Vel,
    Acc0,
    Acc1,
    Acc0Acc1,
    Acc0Vel,
    Acc1Vel,
    #[default]
    None,
}

impl ReachedLimits {
    /// The profile cruises at the velocity limit in segment 3.
    pub const fn has_velocity_plateau(self) -> bool {
        matches!(
            self,
            Self::Vel | Self::Acc0Vel | Self::Acc1Vel | Self::Acc0Acc1Vel
        )
    }

    /// Segment 1 must hold the acceleration limit for a non-zero time.
    pub const fn requires_acc0_plateau(self) -> bool {
        matches!(self, Self::Acc0 | Self::Acc0Acc1)
    }

    /// Segment 5 must hold the acceleration limit for a non-zero time.
    pub const fn requires_acc1_plateau(self) -> bool {
        matches!(self, Self::Acc1 | Self::Acc0Acc1)
    }
}

/// Sign pattern of the jerk across the two acceleration ramps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlSigns {
    /// Up, down, down, up: the second ramp mirrors the first.
    #[default]
    Uddu,
    /// Up, down, up, down: the second ramp repeats the first.
    Udud,
}

impl ControlSigns {
    /// Jerk of every segment for a profile starting with jerk `j`.
    pub const fn jerks(self, j: f64) -> [f64; 7] {
        match self {
            Self::Uddu => [j, 0.0, -j, 0.0, -j, 0.0, j],
            Self::Udud => [j, 0.0, -j, 0.0, j, 0.0, -j],
        }
    }
}

/// Sign of the first jerk segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Profile {
    /// Segment durations.
    pub t: [f64; 7],
    /// Segment jerks.
    pub j: [f64; 7],
    /// Acceleration at each segment boundary.
    pub a: [f64; 8],
    /// Velocity at each segment boundary.
    pub v: [f64; 8],
    /// Position at each segment boundary.
    pub p: [f64; 8],
    pub limits: ReachedLimits,
    pub direction: Direction,
    pub control_signs: ControlSigns,
    /// Pre-trajectory executed before segment 0.
    pub brake: BrakeProfile,
    #[serde(skip)]
    target: State,
}

impl Profile {
    /// An empty candidate from the start state of `state` toward its target.
    pub fn new(state: &BoundaryState, brake: BrakeProfile) -> Self {
        let mut profile = Self {
            target: state.target(),
            brake,
            ..Self::default()
        };
        profile.p[0] = state.p0;
        profile.v[0] = state.v0;
        profile.a[0] = state.a0;
        profile
    }

    pub fn start(&self) -> State {
        State::new(self.p[0], self.v[0], self.a[0])
    }

    pub fn target(&self) -> State {
        self.target
    }

    /// Sum of the segment durations without the brake.
    pub fn motion_duration(&self) -> f64 {
        self.t.iter().sum()
    }

    /// Total duration including the brake.
    pub fn duration(&self) -> f64 {
        self.brake.duration + self.motion_duration()
    }

    pub fn final_state(&self) -> State {
        State::new(self.p[7], self.v[7], self.a[7])
    }

    /// The integrated state at every segment boundary.
    pub fn boundaries(&self) -> impl Iterator<Item = State> + '_ {
        (0..8).map(|i| State::new(self.p[i], self.v[i], self.a[i]))
    }

    /// Largest velocity magnitude reached by the main profile.
    pub fn peak_velocity(&self) -> f64 {
        let mut peak = self.v.iter().fold(0.0f64, |peak, v| peak.max(v.abs()));
        for i in 0..7 {
            if self.t[i] > 0.0 && self.j[i] != 0.0 && self.a[i] * self.a[i + 1] < 0.0 {
                let v = self.v[i] - self.a[i] * self.a[i] / (2.0 * self.j[i]);
                peak = peak.max(v.abs());
            }
        }
        peak
    }

    /// Largest acceleration magnitude reached by the main profile.
    pub fn peak_acceleration(&self) -> f64 {
        self.a.iter().fold(0.0f64, |peak, a| peak.max(a.abs()))
    }

    /// Integrates the candidate durations and accepts them if they reach the
    /// target without leaving `bounds`.
    ///
    /// On success the clamped durations, boundary states and classification
    /// are written back; on failure the profile is left untouched.
    pub fn check(&mut self, signs: ControlSigns, limits: ReachedLimits, bounds: &Bounds) -> bool {
        if self
            .t
            .iter()
            .any(|t| !t.is_finite() || *t < -T_EPS)
        {
            return false;
        }
        let t = self.t.map(|t| t.max(0.0));

        if limits.has_velocity_plateau() && t[3] < f64::EPSILON {
            return false;
        }
        if limits.requires_acc0_plateau() && t[1] < f64::EPSILON {
            return false;
        }
        if limits.requires_acc1_plateau() && t[5] < f64::EPSILON {
            return false;
        }
        if t.iter().sum::<f64>() > T_MAX {
            return false;
        }

        let j = signs.jerks(bounds.j);
        let (v_upper, v_lower) = bounds.velocity_range();
        let (a_upper, a_lower) = bounds.acceleration_range();
        let v_eps = V_EPS * v_upper.abs().max(v_lower.abs()).max(1.0);
        let a_eps = A_EPS * a_upper.abs().max(a_lower.abs()).max(1.0);
        let v_upper = v_upper + v_eps;
        let v_lower = v_lower - v_eps;
        let a_upper = a_upper + a_eps;
        let a_lower = a_lower - a_eps;

        let mut p = [0.0; 8];
        let mut v = [0.0; 8];
        let mut a = [0.0; 8];
        let mut state = self.start();
        (p[0], v[0], a[0]) = (state.p, state.v, state.a);

        for i in 0..7 {
            state = state.advance(t[i], j[i]);
            // a cruise runs exactly at the limit, rounding errors would
            // otherwise grow with its duration
            if i == 2 && limits.has_velocity_plateau() {
                state.a = 0.0;
                if (state.v - bounds.v_max).abs() < v_eps {
                    state.v = bounds.v_max;
                }
            }
            (p[i + 1], v[i + 1], a[i + 1]) = (state.p, state.v, state.a);

            // the velocity peaks inside a segment where the acceleration
            // changes sign
            if i > 1 && a[i + 1] * a[i] < -f64::EPSILON {
                let v_peak = v[i] - a[i] * a[i] / (2.0 * j[i]);
                if v_peak > v_upper || v_peak < v_lower {
                    return false;
                }
            }
        }

        let target = self.target;
        let start = self.start();
        let p_tolerance =
            P_PRECISION + RELATIVE_PRECISION * start.p.abs().max(target.p.abs());
        let v_tolerance = V_PRECISION
            + RELATIVE_PRECISION
                * start
                    .v
                    .abs()
                    .max(target.v.abs())
                    .max(bounds.v_max.abs())
                    .max(bounds.v_min.abs());
        let a_tolerance =
            A_PRECISION + RELATIVE_PRECISION * bounds.a_max.abs().max(bounds.a_min.abs());

        let reached = (p[7] - target.p).abs() < p_tolerance
            && (v[7] - target.v).abs() < v_tolerance
            && (a[7] - target.a).abs() < a_tolerance;
        let within_acceleration = [a[1], a[3], a[5]]
            .iter()
            .all(|a| (a_lower..=a_upper).contains(a));
        let within_velocity = v[3..7]
            .iter()
            .all(|v| (v_lower..=v_upper).contains(v));

        if !(reached && within_acceleration && within_velocity) {
            return false;
        }

        self.t = t;
        self.j = j;
        self.a = a;
        self.v = v;
        self.p = p;
        self.limits = limits;
        self.direction = bounds.direction();
        self.control_signs = signs;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::KinematicLimits;

    fn unit_bounds() -> Bounds {
        Bounds::forward(&KinematicLimits::symmetric(1.0, 1.0, 1.0))
    }

    fn assert_near(actual: State, expected: State) {
        assert!(
            (actual.p - expected.p).abs() < 1e-12
                && (actual.v - expected.v).abs() < 1e-12
                && (actual.a - expected.a).abs() < 1e-12,
            "{actual:?} != {expected:?}"
        );
    }

    fn candidate(state: BoundaryState, t: [f64; 7]) -> Profile {
        let mut profile = Profile::new(&state, BrakeProfile::default());
        profile.t = t;
        profile
    }

    #[test]
    fn accepts_unit_trapezoid() {
        let mut profile = candidate(
            BoundaryState::rest_to_rest(0.0, 10.0),
            [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0],
        );
        assert!(profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));
        assert_eq!(profile.duration(), 12.0);
        assert_eq!(profile.direction, Direction::Up);
        assert_eq!(profile.limits, ReachedLimits::Vel);
        assert_near(profile.final_state(), State::new(10.0, 0.0, 0.0));
        assert_eq!(profile.peak_velocity(), 1.0);
        assert_eq!(profile.peak_acceleration(), 1.0);
    }

    #[test]
    fn rejects_missing_plateau() {
        let mut profile = candidate(
            BoundaryState::rest_to_rest(0.0, 10.0),
            [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0],
        );
        assert!(!profile.check(ControlSigns::Uddu, ReachedLimits::Acc0Acc1, &unit_bounds()));
        assert!(!profile.check(ControlSigns::Uddu, ReachedLimits::Acc1, &unit_bounds()));
        // untouched by the failed checks
        assert_eq!(profile.limits, ReachedLimits::None);
    }

    #[test]
    fn rejects_wrong_target() {
        let mut profile = candidate(
            BoundaryState::rest_to_rest(0.0, 10.5),
            [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0],
        );
        assert!(!profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));
    }

    #[test]
    fn rejects_velocity_overshoot() {
        // same shape with a jerk twice as large peaks at twice the velocity
        let limits = KinematicLimits::symmetric(1.0, 2.0, 2.0);
        let mut profile = candidate(
            BoundaryState::rest_to_rest(0.0, 20.0),
            [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0],
        );
        assert!(!profile.check(
            ControlSigns::Uddu,
            ReachedLimits::None,
            &Bounds::forward(&limits)
        ));
    }

    #[test]
    fn rejects_negative_durations_and_clamps_tiny_ones() {
        let state = BoundaryState::rest_to_rest(0.0, 10.0);
        let mut profile = candidate(state, [1.0, -1e-3, 1.0, 8.0, 1.0, 0.0, 1.0]);
        assert!(!profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));

        let mut profile = candidate(state, [1.0, -1e-14, 1.0, 8.0, 1.0, 0.0, 1.0]);
        assert!(profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));
        assert_eq!(profile.t[1], 0.0);

        let mut profile = candidate(state, [1.0, f64::NAN, 1.0, 8.0, 1.0, 0.0, 1.0]);
        assert!(!profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));
    }

    #[test]
    fn checks_both_sign_patterns() {
        // accelerate to 1 m/s, cruise, then accelerate again in the second ramp
        let state = BoundaryState::new(State::default(), State::new(5.0, 2.0, 0.0));
        let limits = KinematicLimits::symmetric(4.0, 1.0, 1.0);
        let t = [1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0];

        let mut udud = candidate(state, t);
        assert!(udud.check(ControlSigns::Udud, ReachedLimits::None, &Bounds::forward(&limits)));
        assert_eq!(udud.j, [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0]);
        assert_near(udud.final_state(), State::new(5.0, 2.0, 0.0));

        let mut uddu = candidate(state, t);
        assert!(!uddu.check(ControlSigns::Uddu, ReachedLimits::None, &Bounds::forward(&limits)));
    }

    #[test]
    fn reversed_bounds_mark_down_direction() {
        let state = BoundaryState::rest_to_rest(0.0, -10.0);
        let mut profile = candidate(state, [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0]);
        assert!(profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds().reversed()));
        assert_eq!(profile.direction, Direction::Down);
        assert_eq!(profile.peak_velocity(), 1.0);
    }

    #[test]
    fn long_cruise_runs_at_exact_limit() {
        // 5e-13 above the limit over 1e9 seconds would miss the target by
        // half a millimeter
        let limits = KinematicLimits::symmetric(1e-3, 1.0, 1.0);
        let state = BoundaryState::new(
            State::new(0.0, 1e-3 + 5e-13, 0.0),
            State::new(1e6, 1e-3, 0.0),
        );
        let mut profile = candidate(state, [0.0, 0.0, 0.0, 1e9, 0.0, 0.0, 0.0]);
        assert!(profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &Bounds::forward(&limits)));
        assert_eq!(profile.v[3], 1e-3);
        assert_eq!(profile.a[3], 0.0);
    }

    #[test]
    fn boundaries_follow_segments() {
        let mut profile = candidate(
            BoundaryState::rest_to_rest(0.0, 10.0),
            [1.0, 0.0, 1.0, 8.0, 1.0, 0.0, 1.0],
        );
        assert!(profile.check(ControlSigns::Uddu, ReachedLimits::Vel, &unit_bounds()));
        let velocities: Vec<_> = profile.boundaries().map(|s| s.v).collect();
        assert_eq!(velocities, [0.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 0.0]);
    }
}

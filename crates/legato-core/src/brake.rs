// Pre-trajectory that brings an out-of-limit start state back inside the limits

use crate::{limits::KinematicLimits, state::State};
use serde::Serialize;

const EPS: f64 = 2.2e-14;

/// Up to two segments executed before the main profile: a maximal-jerk ramp
/// followed by an optional constant-acceleration hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BrakeProfile {
    pub duration: f64,
    pub t: [f64; 2],
    pub j: [f64; 2],
    /// Acceleration at the start of each segment.
    pub a: [f64; 2],
    /// Velocity at the start of each segment.
    pub v: [f64; 2],
    /// Position at the start of each segment.
    pub p: [f64; 2],
}

#[inline]
fn v_at_a_zero(v0: f64, a0: f64, j: f64) -> f64 {
    v0 + (a0 * a0) / (2.0 * j)
}

#[inline]
fn v_at_t(v0: f64, a0: f64, j: f64, t: f64) -> f64 {
    v0 + t * (a0 + j * t / 2.0)
}

impl BrakeProfile {
    /// Plans the brake for a start state with velocity `v0` and acceleration
    /// `a0`. The result is empty when the state is already safe.
    pub fn plan(v0: f64, a0: f64, limits: &KinematicLimits) -> Self {
        let mut brake = Self::default();
        if limits.is_degenerate() {
            return brake;
        }

        let KinematicLimits {
            v_max,
            v_min,
            a_max,
            a_min,
            j_max,
        } = *limits;

        if a0 > a_max {
            brake.acceleration_brake(v0, a0, v_max, v_min, a_max, a_min, j_max);
        } else if a0 < a_min {
            brake.acceleration_brake(v0, a0, v_min, v_max, a_min, a_max, -j_max);
        } else if (v0 > v_max && v_at_a_zero(v0, a0, -j_max) > v_min)
            || (a0 > 0.0 && v_at_a_zero(v0, a0, j_max) > v_max)
        {
            brake.velocity_brake(v0, a0, v_max, v_min, a_min, j_max);
        } else if (v0 < v_min && v_at_a_zero(v0, a0, j_max) < v_max)
            || (a0 < 0.0 && v_at_a_zero(v0, a0, -j_max) < v_min)
        {
            brake.velocity_brake(v0, a0, v_min, v_max, a_max, -j_max);
        }

        brake
    }

    /// True when no brake segment is needed.
    pub fn is_empty(&self) -> bool {
        self.t[0] <= 0.0 && self.t[1] <= 0.0
    }

    #[allow(clippy::too_many_arguments)]
    fn acceleration_brake(
        &mut self,
        v0: f64,
        a0: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        a_min: f64,
        j_max: f64,
    ) {
        self.j[0] = -j_max;

        let t_to_a_max = (a0 - a_max) / j_max;
        let t_to_a_zero = a0 / j_max;

        let v_at_a_max = v_at_t(v0, a0, -j_max, t_to_a_max);
        let v_at_a_zero = v_at_t(v0, a0, -j_max, t_to_a_zero);

        if (v_at_a_zero > v_max && j_max > 0.0) || (v_at_a_zero < v_max && j_max < 0.0) {
            self.velocity_brake(v0, a0, v_max, v_min, a_min, j_max);
        } else if (v_at_a_max < v_min && j_max > 0.0) || (v_at_a_max > v_min && j_max < 0.0) {
            // hold the acceleration limit until the velocity is back in range,
            // but not so long that ramping the acceleration out overshoots
            let t_to_v_min = -(v_at_a_max - v_min) / a_max;
            let t_to_v_max = -a_max / (2.0 * j_max) - (v_at_a_max - v_max) / a_max;

            self.t[0] = t_to_a_max + EPS;
            self.t[1] = t_to_v_min.min(t_to_v_max - EPS).max(0.0);
        } else {
            self.t[0] = t_to_a_max + EPS;
        }
    }

    fn velocity_brake(&mut self, v0: f64, a0: f64, v_max: f64, v_min: f64, a_min: f64, j_max: f64) {
        self.j[0] = -j_max;

        let t_to_a_min = (a0 - a_min) / j_max;
        let t_to_v_max = a0 / j_max + (a0 * a0 + 2.0 * j_max * (v0 - v_max)).max(0.0).sqrt() / j_max.abs();
        let t_to_v_min =
            a0 / j_max + (a0 * a0 / 2.0 + j_max * (v0 - v_min)).max(0.0).sqrt() / j_max.abs();
        let t_min_to_v_max = t_to_v_max.min(t_to_v_min);

        if t_to_a_min < t_min_to_v_max {
            // the acceleration limit is reached first, hold it
            let v_at_a_min = v_at_t(v0, a0, -j_max, t_to_a_min);
            let t_to_v_max_with_constant = -(v_at_a_min - v_max) / a_min;
            let t_to_v_min_with_constant = a_min / (2.0 * j_max) - (v_at_a_min - v_min) / a_min;

            self.t[0] = (t_to_a_min - EPS).max(0.0);
            self.t[1] = t_to_v_max_with_constant
                .min(t_to_v_min_with_constant)
                .max(0.0);
        } else {
            self.t[0] = (t_min_to_v_max - EPS).max(0.0);
        }
    }

    /// Integrates the brake from `start` and returns the state the main
    /// profile starts from.
    pub fn finalize(&mut self, start: State) -> State {
        let mut state = start;
        if self.t[0] <= 0.0 && self.t[1] <= 0.0 {
            self.duration = 0.0;
            return state;
        }

        self.duration = self.t[0];
        self.p[0] = state.p;
        self.v[0] = state.v;
        self.a[0] = state.a;
        state = state.advance(self.t[0], self.j[0]);

        if self.t[1] > 0.0 {
            self.duration += self.t[1];
            self.p[1] = state.p;
            self.v[1] = state.v;
            self.a[1] = state.a;
            state = state.advance(self.t[1], self.j[1]);
        }

        state
    }
}

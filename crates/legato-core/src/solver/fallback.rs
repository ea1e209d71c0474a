// Shortened profiles for targets the regular families miss, and the jerk-free
// single step used with degenerate limits

use super::{EPS, ProfileSolver};
use crate::{limits::Bounds, profile::ReachedLimits};

impl ProfileSolver {
    /// Tries the shortened shapes in order of preference, forward before
    /// reversed, and stops at the first valid one.
    pub(super) fn fallback(&mut self, forward: &Bounds, reversed: &Bounds) {
        let steps: [fn(&mut Self, &Bounds) -> bool; 4] = [
            Self::time_none_two_step,
            Self::time_acc0_two_step,
            Self::time_vel_two_step,
            Self::time_acc1_vel_two_step,
        ];

        for step in steps {
            if step(self, forward) || step(self, reversed) {
                tracing::debug!("Profile found by two-step fallback");
                return;
            }
        }
    }

    /// A single triangular ramp from `a0` to `af`, or the bare ramp when no
    /// peak fits.
    fn time_none_two_step(&mut self, bounds: &Bounds) -> bool {
        let j = bounds.j;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);

        let peak = (self.terms.a0_a0 + self.terms.af_af) / 2.0 + j * (vf - v0);
        if peak >= 0.0 {
            let h = peak.sqrt().copysign(j);
            let t = [(h - a0) / j, 0.0, (h - af) / j, 0.0, 0.0, 0.0, 0.0];
            if self.try_profile(t, ReachedLimits::None, bounds) {
                return true;
            }
        }

        let t = [(af - a0) / j, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        self.try_profile(t, ReachedLimits::None, bounds)
    }

    /// One ramp with an acceleration plateau, either at the current
    /// acceleration, at `a_max`, or at the level that also lands on the
    /// target position.
    fn time_acc0_two_step(&mut self, bounds: &Bounds) -> bool {
        let Bounds { a_max, j, .. } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;

        if a0.abs() > EPS {
            let t = [
                0.0,
                (vf - v0 - (terms.a0_a0 - terms.af_af) / (2.0 * j)) / a0,
                (a0 - af) / j,
                0.0,
                0.0,
                0.0,
                0.0,
            ];
            if self.try_profile(t, ReachedLimits::Acc0, bounds) {
                return true;
            }
        }

        let t = [
            (a_max - a0) / j,
            (terms.a0_a0 + terms.af_af - 2.0 * a_max * a_max + 2.0 * j * (vf - v0))
                / (2.0 * a_max * j),
            (a_max - af) / j,
            0.0,
            0.0,
            0.0,
            0.0,
        ];
        if self.try_profile(t, ReachedLimits::Acc0, bounds) {
            return true;
        }

        // plateau level h solving the position equation
        let a = 6.0 * (-terms.a0_a0 + terms.af_af + 2.0 * j * v0 + 2.0 * j * vf);
        let b = -8.0
            * (-terms.a0_p3 + 3.0 * a0 * j * v0 + terms.af_p3 + 3.0 * af * j * vf
                + 3.0 * j * j * terms.pd);
        let c = -3.0
            * (-terms.a0_a0 - terms.af_af + 2.0 * j * v0 - 2.0 * j * vf)
            * (-terms.a0_a0 + terms.af_af + 2.0 * j * v0 + 2.0 * j * vf);

        let mut levels = heapless::Vec::<f64, 2>::new();
        if a.abs() > EPS {
            let discriminant = b * b - 4.0 * a * c;
            if discriminant >= 0.0 {
                let root = discriminant.sqrt();
                let _ = levels.push((-b + root) / (2.0 * a));
                let _ = levels.push((-b - root) / (2.0 * a));
            }
        } else if b.abs() > EPS {
            let _ = levels.push(-c / b);
        }

        for h in levels {
            if h.abs() < EPS {
                continue;
            }
            let t = [
                (h - a0) / j,
                (terms.a0_a0 + terms.af_af - 2.0 * h * h + 2.0 * j * (vf - v0)) / (2.0 * h * j),
                (h - af) / j,
                0.0,
                0.0,
                0.0,
                0.0,
            ];
            if self.try_profile(t, ReachedLimits::Acc0, bounds) {
                return true;
            }
        }
        false
    }

    /// Ramps the current acceleration out, cruises at `v_max` and ramps
    /// into the target without an acceleration plateau.
    fn time_vel_two_step(&mut self, bounds: &Bounds) -> bool {
        let j = bounds.j;
        let (a0, vf, af) = (self.state.a0, self.state.vf, self.state.af);

        let peak = self.terms.af_af / (2.0 * j * j) + (bounds.v_max - vf) / j;
        if peak < 0.0 {
            return false;
        }
        let h = peak.sqrt();

        for head in [[-a0 / j, 0.0, 0.0], [0.0, 0.0, a0 / j]] {
            let mut t = [head[0], head[1], head[2], 0.0, h, 0.0, h + af / j];
            self.fill_cruise(&mut t, bounds);
            if self.try_profile(t, ReachedLimits::Vel, bounds) {
                return true;
            }
        }
        false
    }

    /// Like [`time_vel_two_step`](Self::time_vel_two_step) with the final
    /// ramp holding `a_min`.
    fn time_acc1_vel_two_step(&mut self, bounds: &Bounds) -> bool {
        let Bounds {
            v_max, a_min, j, ..
        } = *bounds;
        let (a0, vf, af) = (self.state.a0, self.state.vf, self.state.af);

        let mut t = [
            0.0,
            0.0,
            a0 / j,
            0.0,
            -a_min / j,
            -(self.terms.af_af / 2.0 - a_min * a_min - j * (vf - v_max)) / (a_min * j),
            (af - a_min) / j,
        ];
        self.fill_cruise(&mut t, bounds);
        self.try_profile(t, ReachedLimits::Acc1Vel, bounds)
    }

    /// Constant acceleration motion for limits without usable jerk. Only
    /// moves that keep the start acceleration can be planned.
    pub(super) fn single_step(&mut self, bounds: &Bounds) -> bool {
        let (v0, a0, af) = (self.state.v0, self.state.a0, self.state.af);
        let pd = self.terms.pd;

        if (af - a0).abs() > EPS {
            return false;
        }

        let hold = |t: f64| [0.0, 0.0, 0.0, t, 0.0, 0.0, 0.0];

        if a0.abs() > EPS {
            let discriminant = 2.0 * a0 * pd + self.terms.v0_v0;
            if discriminant < 0.0 {
                return false;
            }
            let root = discriminant.sqrt();
            [(-v0 + root) / a0, -(v0 + root) / a0]
                .into_iter()
                .any(|t| t >= 0.0 && self.try_profile(hold(t), ReachedLimits::None, bounds))
        } else if v0.abs() > EPS {
            self.try_profile(hold(pd / v0), ReachedLimits::None, bounds)
        } else if pd.abs() < EPS {
            self.try_profile(hold(0.0), ReachedLimits::None, bounds)
        } else {
            false
        }
    }
}

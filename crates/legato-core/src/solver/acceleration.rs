//! Profiles without a velocity plateau.
//!
//! With both acceleration limits held the peak velocity solves a quadratic.
//! The remaining shapes leave one ramp duration free; eliminating the others
//! yields a monic quartic in that duration whose non-negative roots are
//! polished with a few Newton steps on the final position before checking.

use super::{EPS, ProfileSolver};
use crate::{
    limits::Bounds,
    profile::ReachedLimits,
    roots::{NEWTON_STEPS, poly_derivative_eval, poly_eval, refine, solve_quartic_monic},
};

impl ProfileSolver {
    pub(super) fn time_acc0_acc1(&mut self, bounds: &Bounds, return_after_found: bool) {
        let Bounds {
            a_max, a_min, j, ..
        } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;
        let jj = j * j;

        let a = -(a_max - a_min) / (2.0 * a_max * a_min);
        let b = (a_max - a_min) / (2.0 * j);
        let c = -(3.0 * terms.a0_p4 * a_min - 8.0 * terms.a0_p3 * a_max * a_min
            + 6.0 * terms.a0_a0 * a_max * a_max * a_min
            - 12.0 * terms.a0_a0 * a_min * j * v0
            + 24.0 * a0 * a_max * a_min * j * v0
            - 12.0 * a_max * a_max * a_min * j * v0
            - 6.0 * a_max * a_min * a_min * terms.af_af
            + 12.0 * a_max * a_min * a_min * j * vf
            + 8.0 * a_max * a_min * terms.af_p3
            - 24.0 * a_max * a_min * af * j * vf
            + 24.0 * a_max * a_min * jj * terms.pd
            - 3.0 * a_max * terms.af_p4
            + 12.0 * a_max * terms.af_af * j * vf
            - 12.0 * a_max * jj * terms.vf_vf
            + 12.0 * a_min * jj * terms.v0_v0)
            / (24.0 * a_max * a_min * jj);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return;
        }
        let root = discriminant.sqrt();

        // both signs give a candidate peak velocity
        for peak in [(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)] {
            let durations = [
                (a_max - a0) / j,
                (peak - v0 - (a_max * a_max - terms.a0_a0) / (2.0 * j) - a_max * a_max / (2.0 * j))
                    / a_max,
                a_max / j,
                0.0,
                -a_min / j,
                (vf - peak + a_min * a_min / (2.0 * j) - (terms.af_af - a_min * a_min) / (2.0 * j))
                    / a_min,
                (af - a_min) / j,
            ];
            if self.try_profile(durations, ReachedLimits::Acc0Acc1, bounds) && return_after_found
            {
                return;
            }
        }
    }

    pub(super) fn time_all_none_acc0_acc1(&mut self, bounds: &Bounds, return_after_found: bool) {
        if self.time_none(bounds, return_after_found) && return_after_found {
            return;
        }
        if self.time_acc0(bounds, return_after_found) && return_after_found {
            return;
        }
        self.time_acc1(bounds, return_after_found);
    }

    /// Neither limit reached: two triangular ramps, `T` is the length of the
    /// ramp-down segment 2.
    fn time_none(&mut self, bounds: &Bounds, return_after_found: bool) -> bool {
        let Bounds {
            a_max, a_min, j, ..
        } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;
        let jj = j * j;

        let h2 = vf - v0 + (terms.a0_a0 - terms.af_af) / (2.0 * j);
        let poly = [
            1.0,
            0.0,
            2.0 * (-terms.a0_a0 - terms.af_af + 2.0 * j * v0 + 2.0 * j * vf) / jj,
            -4.0 * (-terms.a0_p3 + 3.0 * a0 * j * v0 + terms.af_p3 - 3.0 * af * j * vf + 3.0 * jj * terms.pd)
                / (3.0 * jj * j),
            -(-terms.a0_a0 + terms.af_af + 2.0 * j * v0 - 2.0 * j * vf).powi(2) / (4.0 * jj * jj),
        ];

        let durations = |t: f64| {
            let h0 = h2 / (2.0 * j * t);
            [
                h0 + t / 2.0 - a0 / j,
                0.0,
                t,
                0.0,
                0.0,
                0.0,
                -h0 + t / 2.0 + af / j,
            ]
        };
        // the quartic is the position residual scaled by 4·T/j
        let slope = |t: f64| {
            j / 4.0 * (poly_derivative_eval(&poly, t) * t - poly_eval(&poly, t)) / (t * t)
        };

        let (lower, upper) = ((a0 - af) / j, (a_max - a_min) / j);
        let roots = solve_quartic_monic(poly[1], poly[2], poly[3], poly[4])
            .into_iter()
            .filter(|t| *t >= lower && *t <= upper && *t > EPS);

        self.try_quartic_roots(
            roots,
            durations,
            slope,
            ReachedLimits::None,
            bounds,
            return_after_found,
        )
    }

    /// Only the first ramp holds `a_max`.
    fn time_acc0(&mut self, bounds: &Bounds, return_after_found: bool) -> bool {
        let Bounds {
            a_max, a_min, j, ..
        } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;
        let jj = j * j;

        let poly = [
            1.0,
            -2.0 * a_max / j,
            (a_max * a_max - terms.af_af + 2.0 * j * vf) / jj,
            0.0,
            -(3.0 * terms.a0_p4 - 8.0 * terms.a0_p3 * a_max + 6.0 * terms.a0_a0 * a_max * a_max
                - 12.0 * terms.a0_a0 * j * v0
                + 24.0 * a0 * a_max * j * v0
                - 6.0 * a_max * a_max * terms.af_af
                - 12.0 * a_max * a_max * j * v0
                + 12.0 * a_max * a_max * j * vf
                + 8.0 * a_max * terms.af_p3
                - 24.0 * a_max * af * j * vf
                + 24.0 * a_max * jj * terms.pd
                - 3.0 * terms.af_p4
                + 12.0 * terms.af_af * j * vf
                + 12.0 * jj * terms.v0_v0
                - 12.0 * jj * terms.vf_vf)
                / (12.0 * jj * jj),
        ];

        let durations = |t: f64| {
            [
                (a_max - a0) / j,
                -(-2.0 * t * t * jj + 4.0 * t * a_max * j - terms.a0_a0 + terms.af_af
                    + 2.0 * j * v0
                    - 2.0 * j * vf)
                    / (2.0 * a_max * j),
                t,
                0.0,
                0.0,
                0.0,
                (af - a_max) / j + t,
            ]
        };
        let slope = |t: f64| jj / (2.0 * a_max) * poly_derivative_eval(&poly, t);

        let (lower, upper) = ((a_max - af) / j, (a_max - a_min) / j);
        let roots = solve_quartic_monic(poly[1], poly[2], poly[3], poly[4])
            .into_iter()
            .filter(|t| *t >= lower && *t <= upper);

        self.try_quartic_roots(
            roots,
            durations,
            slope,
            ReachedLimits::Acc0,
            bounds,
            return_after_found,
        )
    }

    /// Only the second ramp holds `a_min`.
    fn time_acc1(&mut self, bounds: &Bounds, return_after_found: bool) -> bool {
        let Bounds {
            a_max, a_min, j, ..
        } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;
        let jj = j * j;

        let poly = [
            1.0,
            2.0 * a_min / j,
            (-terms.a0_a0 + a_min * a_min + 2.0 * j * v0) / jj,
            0.0,
            (3.0 * terms.a0_p4 - 8.0 * terms.a0_p3 * a_min + 6.0 * terms.a0_a0 * a_min * a_min
                - 12.0 * terms.a0_a0 * j * v0
                + 24.0 * a0 * a_min * j * v0
                - 6.0 * a_min * a_min * terms.af_af
                - 12.0 * a_min * a_min * j * v0
                + 12.0 * a_min * a_min * j * vf
                + 8.0 * a_min * terms.af_p3
                - 24.0 * a_min * af * j * vf
                + 24.0 * a_min * jj * terms.pd
                - 3.0 * terms.af_p4
                + 12.0 * terms.af_af * j * vf
                + 12.0 * jj * terms.v0_v0
                - 12.0 * jj * terms.vf_vf)
                / (12.0 * jj * jj),
        ];

        let durations = |t: f64| {
            [
                (a_min - a0) / j + t,
                0.0,
                t,
                0.0,
                0.0,
                -(2.0 * t * t * jj + 4.0 * t * a_min * j - terms.a0_a0 + terms.af_af
                    + 2.0 * j * v0
                    - 2.0 * j * vf)
                    / (2.0 * a_min * j),
                (af - a_min) / j,
            ]
        };
        let slope = |t: f64| -jj / (2.0 * a_min) * poly_derivative_eval(&poly, t);

        let (lower, upper) = ((a0 - a_min) / j, (a_max - a_min) / j);
        let roots = solve_quartic_monic(poly[1], poly[2], poly[3], poly[4])
            .into_iter()
            .filter(|t| *t >= lower && *t <= upper);

        self.try_quartic_roots(
            roots,
            durations,
            slope,
            ReachedLimits::Acc1,
            bounds,
            return_after_found,
        )
    }

    /// Refines each root against the final position and checks the profile
    /// it describes. Returns whether any root gave a valid profile.
    fn try_quartic_roots(
        &mut self,
        roots: impl Iterator<Item = f64>,
        durations: impl Fn(f64) -> [f64; 7],
        slope: impl Fn(f64) -> f64,
        limits: ReachedLimits,
        bounds: &Bounds,
        return_after_found: bool,
    ) -> bool {
        let mut found = false;
        for root in roots {
            let root = refine(
                root,
                NEWTON_STEPS,
                |t| self.final_position(&durations(t), bounds.j) - self.state.pf,
                &slope,
            );
            if self.try_profile(durations(root), limits, bounds) {
                found = true;
                if return_after_found {
                    break;
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        limits::{Bounds, KinematicLimits},
        profile::ReachedLimits,
        solver::ProfileSolver,
        state::{BoundaryState, State},
    };

    fn solver(state: BoundaryState, limits: &KinematicLimits) -> ProfileSolver {
        ProfileSolver::new(&state, limits)
    }

    #[test]
    fn both_plateaus_without_cruise() {
        let limits = KinematicLimits::symmetric(10.0, 1.0, 1.0);
        let mut solver = solver(BoundaryState::rest_to_rest(0.0, 6.0), &limits);
        solver.time_acc0_acc1(&Bounds::forward(&limits), true);

        let profile = solver.candidates.first().unwrap();
        assert_eq!(profile.limits, ReachedLimits::Acc0Acc1);
        assert!((profile.duration() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn short_move_solves_none_quartic() {
        let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
        let mut solver = solver(BoundaryState::rest_to_rest(0.0, 0.01), &limits);
        solver.time_all_none_acc0_acc1(&Bounds::forward(&limits), true);

        assert_eq!(solver.candidates.len(), 1);
        let profile = &solver.candidates[0];
        assert_eq!(profile.limits, ReachedLimits::None);
        assert!((profile.duration() - 0.683_990_378_670_678_8).abs() < 1e-12);
    }

    #[test]
    fn second_ramp_plateau_solves_acc1_quartic() {
        let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
        let state = BoundaryState::new(State::new(-2.0, 0.0, 0.0), State::new(-3.0, 0.3, 0.0));
        let mut solver = solver(state, &limits);
        solver.time_all_none_acc0_acc1(&Bounds::forward(&limits).reversed(), true);

        let profile = solver.candidates.first().unwrap();
        assert_eq!(profile.limits, ReachedLimits::Acc1);
        assert!((profile.duration() - 3.686_097_731_5).abs() < 1e-9);
    }

    #[test]
    fn wrong_direction_finds_nothing() {
        let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
        let mut solver = solver(BoundaryState::rest_to_rest(0.0, 0.01), &limits);
        let reversed = Bounds::forward(&limits).reversed();
        solver.time_all_none_acc0_acc1(&reversed, true);
        solver.time_acc0_acc1(&reversed, true);
        assert!(solver.candidates.is_empty());
    }
}

// Profiles that cruise at the velocity limit

use super::ProfileSolver;
use crate::{limits::Bounds, profile::ReachedLimits};

impl ProfileSolver {
    /// Tries every combination of ramp shapes around a cruise at `v_max`.
    ///
    /// Each ramp either holds the acceleration limit or peaks below it. At
    /// most one combination can be valid, so the search stops on the first.
    pub(super) fn time_all_vel(&mut self, bounds: &Bounds) {
        let Bounds {
            v_max,
            a_max,
            a_min,
            j,
            ..
        } = *bounds;
        let (v0, a0, vf, af) = (self.state.v0, self.state.a0, self.state.vf, self.state.af);
        let terms = self.terms;

        let acc0 = [
            (a_max - a0) / j,
            (terms.a0_a0 / 2.0 - a_max * a_max - j * (v0 - v_max)) / (a_max * j),
            a_max / j,
        ];
        let acc0_peak = terms.a0_a0 / (2.0 * j * j) + (v_max - v0) / j;
        let no_acc0 = (acc0_peak >= 0.0).then(|| {
            let h = acc0_peak.sqrt();
            [h - a0 / j, 0.0, h]
        });

        let acc1 = [
            -a_min / j,
            -(terms.af_af / 2.0 - a_min * a_min - j * (vf - v_max)) / (a_min * j),
            (af - a_min) / j,
        ];
        let acc1_peak = terms.af_af / (2.0 * j * j) + (v_max - vf) / j;
        let no_acc1 = (acc1_peak >= 0.0).then(|| {
            let h = acc1_peak.sqrt();
            [h, 0.0, h + af / j]
        });

        let shapes = [
            (Some(acc0), Some(acc1), ReachedLimits::Acc0Acc1Vel),
            (no_acc0, Some(acc1), ReachedLimits::Acc1Vel),
            (Some(acc0), no_acc1, ReachedLimits::Acc0Vel),
            (no_acc0, no_acc1, ReachedLimits::Vel),
        ];
        for (first, second, limits) in shapes {
            let (Some(first), Some(second)) = (first, second) else {
                continue;
            };

            let mut t = [
                first[0], first[1], first[2], 0.0, second[0], second[1], second[2],
            ];
            self.fill_cruise(&mut t, bounds);
            if self.try_profile(t, limits, bounds) {
                return;
            }
        }
    }
}

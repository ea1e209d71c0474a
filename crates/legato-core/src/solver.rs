//! Time-optimal profile search for a single axis.
//!
//! Every profile family has a closed-form or quartic description of its
//! segment durations. The solver evaluates each family once with the forward
//! bounds and once with the reversed ones, keeps the candidates that pass
//! [`Profile::check`], and hands them to [`Block::calculate`].

mod acceleration;
mod fallback;
mod velocity;

use crate::{
    block::Block,
    brake::BrakeProfile,
    error::Result,
    limits::{Bounds, KinematicLimits},
    profile::{ControlSigns, Profile, ReachedLimits},
    state::{BoundaryState, State, Terms},
};

/// Upper bound on the extremal profiles of one move.
pub const MAX_CANDIDATES: usize = 8;

pub type Candidates = heapless::Vec<Profile, MAX_CANDIDATES>;

/// Values below this are treated as zero when selecting a strategy.
const EPS: f64 = f64::EPSILON;

pub struct ProfileSolver {
    /// The move as seen after the brake.
    state: BoundaryState,
    terms: Terms,
    limits: KinematicLimits,
    brake: BrakeProfile,
    candidates: Candidates,
}

impl ProfileSolver {
    /// Plans the brake for `state` and prepares the search from the state the
    /// brake ends in.
    pub fn new(state: &BoundaryState, limits: &KinematicLimits) -> Self {
        let mut brake = BrakeProfile::plan(state.v0, state.a0, limits);
        let start = brake.finalize(state.start());
        let state = BoundaryState::new(start, state.target());

        Self {
            state,
            terms: state.terms(),
            limits: *limits,
            brake,
            candidates: Candidates::new(),
        }
    }

    /// Start of the main profile, after any brake.
    pub fn start(&self) -> State {
        self.state.start()
    }

    pub fn brake(&self) -> &BrakeProfile {
        &self.brake
    }

    /// Finds the time-optimal profile and the blocked durations of the move.
    pub fn solve(self) -> Result<Block> {
        let moving = self.state.v0.abs() > EPS || self.state.a0.abs() > EPS;
        let degenerate = self.limits.is_degenerate();
        let candidates = self.into_candidates();

        let block = match candidates.first() {
            // without jerk the axis cannot come to rest on its own, so it
            // can only arrive at the optimal time
            Some(profile) if degenerate && moving => Ok(Block::moving(profile)),
            _ => Block::calculate(&candidates),
        };

        match &block {
            Ok(block) => tracing::debug!(
                "Solved move in {:.6}s with {:?} profile ({} candidates)",
                block.t_min,
                block.p_min.limits,
                candidates.len()
            ),
            Err(err) => tracing::debug!("No profile for move: {}", err),
        }
        block
    }

    /// Runs the search and returns every valid extremal profile.
    pub fn into_candidates(mut self) -> Candidates {
        let forward = Bounds::forward(&self.limits);

        if self.limits.is_degenerate() {
            self.single_step(&Bounds { j: 0.0, ..forward });
            return self.candidates;
        }

        let reversed = forward.reversed();
        let state = self.state;

        if state.vf.abs() < EPS && state.af.abs() < EPS {
            // rest targets have at most one extremal profile per direction,
            // so the first hit in the direction of travel is optimal
            let (first, second) = if self.terms.pd >= 0.0 {
                (forward, reversed)
            } else {
                (reversed, forward)
            };

            if state.v0.abs() < EPS && state.a0.abs() < EPS && self.terms.pd.abs() < EPS {
                self.standstill(&first);
            } else {
                for bounds in [first, second] {
                    if self.solve_direction(&bounds, true) {
                        break;
                    }
                }
            }
        } else {
            for bounds in [forward, reversed] {
                self.solve_direction(&bounds, false);
            }
        }

        if self.candidates.is_empty() {
            self.fallback(&forward, &reversed);
        }

        self.candidates
    }

    /// Evaluates every family for one direction of travel. Returns whether
    /// any candidate was found.
    fn solve_direction(&mut self, bounds: &Bounds, return_after_found: bool) -> bool {
        let before = self.candidates.len();

        self.time_all_vel(bounds);
        if return_after_found && self.candidates.len() > before {
            return true;
        }
        self.time_acc0_acc1(bounds, return_after_found);
        if return_after_found && self.candidates.len() > before {
            return true;
        }
        self.time_all_none_acc0_acc1(bounds, return_after_found);

        self.candidates.len() > before
    }

    fn standstill(&mut self, bounds: &Bounds) {
        let mut profile = self.candidate();
        if profile.check(ControlSigns::Uddu, ReachedLimits::None, bounds) {
            self.accept(profile);
        }
    }

    /// An empty profile starting where the brake ends.
    fn candidate(&self) -> Profile {
        Profile::new(&self.state, self.brake)
    }

    fn accept(&mut self, profile: Profile) {
        tracing::trace!(
            "Candidate {:?} {:?} with duration {}",
            profile.limits,
            profile.direction,
            profile.duration()
        );
        if self.candidates.push(profile).is_err() {
            tracing::warn!("Dropping profile candidate, {} already found", MAX_CANDIDATES);
        }
    }

    /// Position reached from the start when the profile follows `t` with
    /// jerk sign pattern up, down, down, up.
    fn final_position(&self, t: &[f64; 7], j: f64) -> f64 {
        let jerks = ControlSigns::Uddu.jerks(j);
        t.iter()
            .zip(jerks)
            .fold(self.state.start(), |state, (duration, jerk)| {
                state.advance(*duration, jerk)
            })
            .p
    }

    /// Sets the cruise segment `t[3]` so that the profile covers the full
    /// distance at the velocity limit.
    fn fill_cruise(&self, t: &mut [f64; 7], bounds: &Bounds) {
        let jerks = ControlSigns::Uddu.jerks(bounds.j);
        t[3] = 0.0;

        let mut state = State::new(0.0, self.state.v0, self.state.a0);
        for (i, (duration, jerk)) in t.iter().zip(jerks).enumerate() {
            state = state.advance(*duration, jerk);
            if i == 2 {
                state.a = 0.0;
            }
        }

        t[3] = (self.terms.pd - state.p) / bounds.v_max;
    }

    /// Checks a duration vector and keeps it on success.
    fn try_profile(&mut self, t: [f64; 7], limits: ReachedLimits, bounds: &Bounds) -> bool {
        let mut profile = self.candidate();
        profile.t = t;
        if profile.check(ControlSigns::Uddu, limits, bounds) {
            self.accept(profile);
            true
        } else {
            false
        }
    }
}

//! Time-optimal, jerk-limited motion profiles for a single axis.
//!
//! Given a start and target state (position, velocity, acceleration) and
//! asymmetric velocity/acceleration limits plus a jerk limit, the solver finds
//! the shortest seven-segment jerk profile connecting them and summarizes the
//! feasible durations as a [`Block`] for later multi-axis synchronization.
//!
//! ```
//! use legato_core::{BoundaryState, KinematicLimits};
//!
//! let state = BoundaryState::rest_to_rest(0.0, 10.0);
//! let limits = KinematicLimits::symmetric(1.0, 1.0, 1.0);
//! let block = legato_core::solve(&state, &limits).unwrap();
//! assert!((block.t_min - 12.0).abs() < 1e-9);
//! ```

pub mod block;
pub mod brake;
pub mod error;
pub mod limits;
pub mod profile;
pub mod roots;
pub mod solver;
pub mod state;

pub use block::{Block, Interval};
pub use error::{Result, SolveError};
pub use limits::{Bounds, KinematicLimits};
pub use profile::{ControlSigns, Direction, Profile, ReachedLimits};
pub use brake::BrakeProfile;
pub use solver::{Candidates, ProfileSolver};
pub use state::{BoundaryState, State};

/// Validates the request and computes its [`Block`].
pub fn solve(state: &BoundaryState, limits: &KinematicLimits) -> Result<Block> {
    limits.validate()?;
    state.validate(limits)?;
    ProfileSolver::new(state, limits).solve()
}

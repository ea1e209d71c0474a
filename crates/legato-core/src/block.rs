//! Feasible durations of a single axis.
//!
//! The time-optimal solver finds every extremal profile of a move. Their
//! durations split the time axis into allowed and forbidden ranges: a
//! synchronizing caller may stretch the move to any duration of at least
//! `t_min` except those falling inside one of the blocked intervals.

use crate::{
    error::{Result, SolveError},
    profile::Profile,
};
use serde::Serialize;

const DUPLICATE_TOLERANCE: f64 = 256.0 * f64::EPSILON;

/// Durations strictly between `left` and `right` are infeasible.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Interval {
    pub left: f64,
    /// May be infinite when nothing is feasible past `left`.
    pub right: f64,
    /// The profile valid at `right`.
    pub profile: Profile,
}

impl Interval {
    fn between(a: &Profile, b: &Profile) -> Self {
        let (left, right) = (a.duration(), b.duration());
        if left < right {
            Self {
                left,
                right,
                profile: b.clone(),
            }
        } else {
            Self {
                left: right,
                right: left,
                profile: a.clone(),
            }
        }
    }

    fn unbounded(left: f64, profile: &Profile) -> Self {
        Self {
            left,
            right: f64::INFINITY,
            profile: profile.clone(),
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        self.left < t && t < self.right
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block {
    /// Shortest feasible duration.
    pub t_min: f64,
    /// The time-optimal profile.
    pub p_min: Profile,
    pub a: Option<Interval>,
    pub b: Option<Interval>,
}

impl Block {
    fn new(p_min: &Profile) -> Self {
        Self {
            t_min: p_min.duration(),
            p_min: p_min.clone(),
            a: None,
            b: None,
        }
    }

    /// A block for an axis that cannot wait at its target: every duration
    /// longer than the optimal one is infeasible.
    pub(crate) fn moving(p_min: &Profile) -> Self {
        let mut block = Self::new(p_min);
        block.a = Some(Interval::unbounded(block.t_min, p_min));
        block
    }

    /// Builds the block from all extremal profiles of a move.
    pub fn calculate(candidates: &[Profile]) -> Result<Self> {
        match candidates {
            [] => Err(SolveError::Infeasible),
            [only] => Ok(Self::new(only)),
            [first, second] => {
                let (d0, d1) = (first.duration(), second.duration());
                if (d0 - d1).abs() < 8.0 * f64::EPSILON {
                    return Ok(Self::new(first));
                }

                let (min, other) = if d0 < d1 {
                    (first, second)
                } else {
                    (second, first)
                };
                let mut block = Self::new(min);
                block.a = Some(Interval::between(min, other));
                Ok(block)
            }
            [_, _, _, _] => {
                // the same profile found in both directions shows up twice,
                // drop the later copy
                let duplicate = (0..4)
                    .flat_map(|i| (i + 1..4).map(move |k| (i, k)))
                    .find(|&(i, k)| {
                        let (a, b) = (&candidates[i], &candidates[k]);
                        let (da, db) = (a.duration(), b.duration());
                        (da - db).abs() < DUPLICATE_TOLERANCE * da.max(1.0)
                            && a.direction != b.direction
                    })
                    .map(|(_, k)| k)
                    .ok_or(SolveError::InconsistentBlock { count: 4 })?;

                let reduced: heapless::Vec<&Profile, 3> = candidates
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != duplicate)
                    .map(|(_, p)| p)
                    .collect();
                Ok(Self::from_odd(&reduced))
            }
            [_, _, _] | [_, _, _, _, _] => {
                let refs: heapless::Vec<&Profile, 5> = candidates.iter().collect();
                Ok(Self::from_odd(&refs))
            }
            _ => Err(SolveError::InconsistentBlock {
                count: candidates.len(),
            }),
        }
    }

    fn from_odd(candidates: &[&Profile]) -> Self {
        let n = candidates.len();
        let min_index = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.duration().total_cmp(&b.duration()))
            .map_or(0, |(i, _)| i);

        let mut block = Self::new(candidates[min_index]);
        let next = |k: usize| candidates[(min_index + k) % n];

        if n == 3 {
            block.a = Some(Interval::between(next(1), next(2)));
        } else if n == 5 {
            if next(1).direction == next(2).direction {
                block.a = Some(Interval::between(next(1), next(2)));
                block.b = Some(Interval::between(next(3), next(4)));
            } else {
                block.a = Some(Interval::between(next(1), next(4)));
                block.b = Some(Interval::between(next(2), next(3)));
            }
        }

        block
    }

    /// True when no valid profile of duration `t` exists.
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min
            || self.a.as_ref().is_some_and(|a| a.contains(t))
            || self.b.as_ref().is_some_and(|b| b.contains(t))
    }

    /// The smallest feasible duration not shorter than `t`, if any.
    pub fn next_feasible(&self, t: f64) -> Option<f64> {
        let mut t = t.max(self.t_min);

        let mut intervals = [self.a.as_ref(), self.b.as_ref()];
        intervals.sort_by(|x, y| {
            let left = |i: &Option<&Interval>| i.map_or(f64::INFINITY, |i| i.left);
            left(x).total_cmp(&left(y))
        });

        for interval in intervals.into_iter().flatten() {
            if interval.contains(t) {
                t = interval.right;
            }
        }

        t.is_finite().then_some(t)
    }

    /// The extremal profile a move stretched to `t` builds on, `None` when
    /// `t` is blocked.
    pub fn profile_for(&self, t: f64) -> Option<&Profile> {
        if self.is_blocked(t) {
            return None;
        }

        let beyond = self
            .intervals()
            .filter(|interval| interval.right <= t)
            .max_by(|x, y| x.right.total_cmp(&y.right));
        Some(beyond.map_or(&self.p_min, |interval| &interval.profile))
    }

    /// Every blocked interval, `a` first.
    pub fn intervals(&self) -> impl Iterator<Item = &Interval> {
        self.a.iter().chain(self.b.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Direction;

    fn profile(duration: f64, direction: Direction) -> Profile {
        let mut profile = Profile::default();
        profile.t[3] = duration;
        profile.direction = direction;
        profile
    }

    #[test]
    fn empty_is_infeasible() {
        assert_eq!(Block::calculate(&[]), Err(SolveError::Infeasible));
    }

    #[test]
    fn single_profile() {
        let block = Block::calculate(&[profile(2.0, Direction::Up)]).unwrap();
        assert_eq!(block.t_min, 2.0);
        assert!(block.a.is_none() && block.b.is_none());
        assert!(!block.is_blocked(2.0));
        assert!(block.is_blocked(1.9));
        assert!(!block.is_blocked(100.0));
        assert_eq!(block.next_feasible(1.0), Some(2.0));
        assert_eq!(block.next_feasible(3.0), Some(3.0));
    }

    #[test]
    fn two_equal_profiles_collapse() {
        let block =
            Block::calculate(&[profile(2.0, Direction::Up), profile(2.0, Direction::Down)])
                .unwrap();
        assert_eq!(block.t_min, 2.0);
        assert!(block.a.is_none());
    }

    #[test]
    fn two_profiles_block_the_gap() {
        let block =
            Block::calculate(&[profile(5.0, Direction::Down), profile(2.0, Direction::Up)])
                .unwrap();
        assert_eq!(block.t_min, 2.0);
        assert_eq!(block.p_min.direction, Direction::Up);

        let a = block.a.as_ref().unwrap();
        assert_eq!((a.left, a.right), (2.0, 5.0));
        assert_eq!(a.profile.direction, Direction::Down);

        assert!(!block.is_blocked(2.0));
        assert!(block.is_blocked(3.0));
        assert!(!block.is_blocked(5.0));
        assert!(!block.is_blocked(6.0));
        assert_eq!(block.next_feasible(3.0), Some(5.0));
        assert_eq!(block.next_feasible(2.0), Some(2.0));
    }

    #[test]
    fn three_profiles() {
        let block = Block::calculate(&[
            profile(4.0, Direction::Up),
            profile(1.0, Direction::Up),
            profile(3.0, Direction::Down),
        ])
        .unwrap();
        assert_eq!(block.t_min, 1.0);
        let a = block.a.as_ref().unwrap();
        assert_eq!((a.left, a.right), (3.0, 4.0));
        assert!(block.b.is_none());
        assert!(!block.is_blocked(2.0));
        assert!(block.is_blocked(3.5));
        assert_eq!(block.next_feasible(3.5), Some(4.0));
    }

    #[test]
    fn four_profiles_drop_duplicate() {
        let block = Block::calculate(&[
            profile(1.0, Direction::Up),
            profile(1.0, Direction::Down),
            profile(3.0, Direction::Down),
            profile(4.0, Direction::Up),
        ])
        .unwrap();
        assert_eq!(block.t_min, 1.0);
        let a = block.a.as_ref().unwrap();
        assert_eq!((a.left, a.right), (3.0, 4.0));
    }

    #[test]
    fn four_distinct_profiles_are_inconsistent() {
        let candidates = [
            profile(1.0, Direction::Up),
            profile(2.0, Direction::Down),
            profile(3.0, Direction::Down),
            profile(4.0, Direction::Up),
        ];
        assert_eq!(
            Block::calculate(&candidates),
            Err(SolveError::InconsistentBlock { count: 4 })
        );
    }

    #[test]
    fn five_profiles_pair_by_direction() {
        let block = Block::calculate(&[
            profile(1.0, Direction::Up),
            profile(2.0, Direction::Up),
            profile(3.0, Direction::Up),
            profile(5.0, Direction::Down),
            profile(6.0, Direction::Down),
        ])
        .unwrap();
        let a = block.a.as_ref().unwrap();
        let b = block.b.as_ref().unwrap();
        assert_eq!((a.left, a.right), (2.0, 3.0));
        assert_eq!((b.left, b.right), (5.0, 6.0));
        assert_eq!(block.intervals().count(), 2);

        assert!(block.is_blocked(2.5));
        assert!(!block.is_blocked(4.0));
        assert!(block.is_blocked(5.5));
        assert_eq!(block.next_feasible(2.5), Some(3.0));
        assert_eq!(block.next_feasible(5.5), Some(6.0));

        assert_eq!(block.profile_for(1.5).map(Profile::duration), Some(1.0));
        assert_eq!(block.profile_for(2.5), None);
        assert_eq!(block.profile_for(4.0).map(Profile::duration), Some(3.0));
        assert_eq!(block.profile_for(7.0).map(Profile::duration), Some(6.0));
    }

    #[test]
    fn unbounded_interval() {
        let block = Block::moving(&profile(2.0, Direction::Up));
        assert!(!block.is_blocked(2.0));
        assert!(block.is_blocked(2.5));
        assert_eq!(block.next_feasible(2.0), Some(2.0));
        assert_eq!(block.next_feasible(2.5), None);
    }

    #[test]
    fn six_profiles_are_inconsistent() {
        let candidates: Vec<_> = (1..=6)
            .map(|i| profile(i as f64, Direction::Up))
            .collect();
        assert_eq!(
            Block::calculate(&candidates),
            Err(SolveError::InconsistentBlock { count: 6 })
        );
    }
}

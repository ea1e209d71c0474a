use crate::config::MoveConfig;
use anyhow::{Context, Result};
use legato_core::{Block, ControlSigns, Direction, Interval, ReachedLimits};
use serde::Serialize;

/// Solution of every axis of a move.
#[derive(Debug, Serialize)]
pub struct Report {
    pub axes: Vec<AxisReport>,
    /// Largest optimal duration over all axes, the earliest any
    /// synchronized move could finish.
    pub duration: f64,
}

#[derive(Debug, Serialize)]
pub struct AxisReport {
    /// Durations no profile of this axis can take.
    pub blocked: Vec<BlockedInterval>,
    pub name: String,
    pub profile: ProfileReport,
    pub t_min: f64,
}

#[derive(Debug, Serialize)]
pub struct BlockedInterval {
    pub from: f64,
    /// `None` when nothing is feasible past `from`.
    pub to: Option<f64>,
}

/// The time-optimal profile of an axis.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub brake: [f64; 2],
    pub control_signs: ControlSigns,
    pub direction: Direction,
    pub durations: [f64; 7],
    pub jerks: [f64; 7],
    pub limits: ReachedLimits,
    pub peak_acceleration: f64,
    pub peak_velocity: f64,
}

impl From<&Interval> for BlockedInterval {
    fn from(interval: &Interval) -> Self {
        Self {
            from: interval.left,
            to: interval.right.is_finite().then_some(interval.right),
        }
    }
}

impl AxisReport {
    pub fn new(name: String, block: &Block) -> Self {
        let profile = &block.p_min;
        Self {
            blocked: block.intervals().map(BlockedInterval::from).collect(),
            name,
            profile: ProfileReport {
                brake: profile.brake.t,
                control_signs: profile.control_signs,
                direction: profile.direction,
                durations: profile.t,
                jerks: profile.j,
                limits: profile.limits,
                peak_acceleration: profile.peak_acceleration(),
                peak_velocity: profile.peak_velocity(),
            },
            t_min: block.t_min,
        }
    }
}

impl Report {
    /// Solves every axis of a validated move.
    pub fn solve(config: &MoveConfig) -> Result<Self> {
        let mut axes = Vec::with_capacity(config.axes.len());
        for (index, axis) in config.axes.iter().enumerate() {
            let name = axis.label(index);
            let block = legato_core::solve(&axis.boundary_state(), &axis.limits.to_limits())
                .with_context(|| format!("failed to solve axis {name}"))?;

            tracing::info!(
                "Axis {name}: t_min {:.6} s with {} blocked intervals",
                block.t_min,
                block.intervals().count()
            );
            axes.push(AxisReport::new(name, &block));
        }

        let duration = axes.iter().fold(0.0f64, |max, axis| max.max(axis.t_min));
        Ok(Self { axes, duration })
    }
}

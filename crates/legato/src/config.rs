use anyhow::{Context, Result};
use legato_core::{BoundaryState, KinematicLimits, State};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

/// A multi-axis move request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveConfig {
    /// Axes solved independently of each other
    #[serde(default)]
    pub axes: Vec<AxisConfig>,
}

/// Boundary states and limits of one axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Display name, the axis index when missing
    pub name: Option<String>,

    /// State at the beginning of the move
    #[serde(default)]
    pub start: StateConfig,

    /// State to reach at the end of the move
    pub target: StateConfig,

    pub limits: LimitsConfig,
}

/// Position, velocity and acceleration of an axis
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub position: f64,

    #[serde(default)]
    pub velocity: f64,

    #[serde(default)]
    pub acceleration: f64,
}

/// Kinematic limits of an axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_velocity: f64,

    /// Defaults to the negated `max_velocity`
    pub min_velocity: Option<f64>,

    pub max_acceleration: f64,

    /// Defaults to the negated `max_acceleration`
    pub min_acceleration: Option<f64>,

    pub max_jerk: f64,
}

impl StateConfig {
    pub fn to_state(self) -> State {
        State::new(self.position, self.velocity, self.acceleration)
    }
}

impl LimitsConfig {
    pub fn to_limits(self) -> KinematicLimits {
        KinematicLimits::new(
            self.max_velocity,
            self.min_velocity.unwrap_or(-self.max_velocity),
            self.max_acceleration,
            self.min_acceleration.unwrap_or(-self.max_acceleration),
            self.max_jerk,
        )
    }
}

impl AxisConfig {
    pub fn boundary_state(&self) -> BoundaryState {
        BoundaryState::new(self.start.to_state(), self.target.to_state())
    }

    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| index.to_string())
    }
}

impl MoveConfig {
    /// Load a move from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read move file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            // TOML preferred, fall back to JSON
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse a move from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse move as TOML")
    }

    /// Parse a move from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse move as JSON")
    }

    /// Validate the move
    pub fn validate(&self) -> Result<()> {
        if self.axes.is_empty() {
            anyhow::bail!("move has no axes");
        }

        let mut names = HashSet::new();
        for (index, axis) in self.axes.iter().enumerate() {
            let label = axis.label(index);
            if !names.insert(label.clone()) {
                anyhow::bail!("duplicate axis name {label}");
            }

            let limits = axis.limits.to_limits();
            limits
                .validate()
                .with_context(|| format!("invalid limits for axis {label}"))?;
            axis.boundary_state()
                .validate(&limits)
                .with_context(|| format!("invalid target for axis {label}"))?;
        }

        Ok(())
    }
}

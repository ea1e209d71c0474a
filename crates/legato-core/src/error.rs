use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be {sign}, got {value}")]
    WrongSign {
        name: &'static str,
        sign: &'static str,
        value: f64,
    },
    #[error("target velocity {velocity} outside of [{min}, {max}]")]
    TargetVelocity { velocity: f64, min: f64, max: f64 },
    #[error("target acceleration {acceleration} outside of [{min}, {max}]")]
    TargetAcceleration { acceleration: f64, min: f64, max: f64 },
    #[error(
        "target velocity {velocity} with acceleration {acceleration} would exceed the velocity limit {limit}"
    )]
    TargetUnreachable {
        velocity: f64,
        acceleration: f64,
        limit: f64,
    },
    #[error("no profile satisfies the boundary state within the limits")]
    Infeasible,
    #[error("cannot build a block from {count} candidate profiles")]
    InconsistentBlock { count: usize },
}

pub type Result<T> = std::result::Result<T, SolveError>;

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SolveError::NonFinite { name, value })
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Dimension mismatch in {what}: expected {expected} coefficients, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid bounds for {variable}: [{lower}, {upper}]")]
    InvalidBounds { variable: String, lower: f64, upper: f64 },
    #[error("Variable index {index} out of range for {count} variables")]
    UnknownVariable { index: usize, count: usize },
    #[error("Tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),
    #[error("Non-finite coefficient in {0}")]
    NonFiniteCoefficient(String),
    #[error("Problem is infeasible")]
    Infeasible,
    #[error("Problem is unbounded")]
    Unbounded,
    #[error("Iteration limit of {0} reached before optimality")]
    IterationLimit(usize),
}

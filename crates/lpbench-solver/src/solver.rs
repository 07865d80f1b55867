use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::SolveError;
use crate::problem::LpProblem;
use crate::solution::{Solution, SolutionStatus};
use crate::standard_form::{Outcome, StandardForm};
use crate::{revised, simplex};

/// Which simplex variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Dense tableau updated in full on every pivot
    #[default]
    Simplex,
    /// Basis inverse only; columns priced from the original matrix
    RevisedSimplex,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Simplex, Method::RevisedSimplex];

    pub fn name(&self) -> &'static str {
        match self {
            Method::Simplex => "simplex",
            Method::RevisedSimplex => "revised simplex",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown method: {0} (expected \"simplex\" or \"revised simplex\")")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "simplex" => Ok(Method::Simplex),
            "revised simplex" | "revised" => Ok(Method::RevisedSimplex),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// Knobs shared by both methods
#[derive(Debug, Clone)]
pub(crate) struct SolverOptions {
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Consecutive degenerate pivots before switching to Bland's rule
    pub bland_after: usize,
    /// Pivots between basis refactorizations (revised simplex only)
    pub refactor_interval: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            bland_after: 50,
            refactor_interval: 32,
        }
    }
}

/// Linear programming solver
#[derive(Debug, Clone, Default)]
pub struct Solver {
    method: Method,
    options: SolverOptions,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Maximum pivots (both phases together) before giving up
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.options.max_iterations = max;
        self
    }

    /// Tolerance for floating point comparisons; must be finite and positive
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    pub fn with_bland_after(mut self, pivots: usize) -> Self {
        self.options.bland_after = pivots;
        self
    }

    pub fn with_refactor_interval(mut self, pivots: usize) -> Self {
        self.options.refactor_interval = pivots.max(1);
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Solve the LP problem with the configured method.
    ///
    /// Malformed problems are rejected up front; infeasible, unbounded and
    /// iteration-limited runs come back as a [`Solution`] with the matching
    /// [`SolutionStatus`].
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        validate_tolerance(self.options.tolerance)?;
        problem.validate()?;

        let sf = StandardForm::build(problem);
        debug!(
            method = %self.method,
            rows = sf.num_rows(),
            cols = sf.num_cols(),
            artificials = sf.n_artificial,
            "solving"
        );

        let outcome = match self.method {
            Method::Simplex => simplex::solve(&sf, &self.options),
            Method::RevisedSimplex => revised::solve(&sf, &self.options),
        };

        let solution = match outcome {
            Outcome::Optimal { x, iterations } => {
                let values = sf.recover(&x, sf.feasibility_tolerance(self.options.tolerance));
                Solution {
                    status: SolutionStatus::Optimal,
                    objective_value: problem.evaluate(&values),
                    slack: problem.slack(&values),
                    values,
                    iterations,
                }
            }
            Outcome::Infeasible { iterations } => Solution::infeasible(iterations),
            Outcome::Unbounded { iterations } => Solution::unbounded(problem.objective.minimize, iterations),
            Outcome::IterationLimit { iterations } => Solution::iteration_limit(iterations),
        };

        debug!(
            method = %self.method,
            status = ?solution.status,
            objective = solution.objective_value,
            iterations = solution.iterations,
            "solved"
        );
        Ok(solution)
    }
}

/// Accepts only finite, strictly positive tolerances.
pub fn validate_tolerance(tolerance: f64) -> Result<f64, SolveError> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(tolerance)
    } else {
        Err(SolveError::InvalidTolerance(tolerance))
    }
}

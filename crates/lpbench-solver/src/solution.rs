use crate::error::SolveError;

/// The result of solving an LP problem
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable (empty unless optimal)
    pub values: Vec<f64>,
    /// Optimal objective value, in the problem's own sense
    pub objective_value: f64,
    /// `rhs - a·x` for each constraint (empty unless optimal)
    pub slack: Vec<f64>,
    /// Number of pivots performed across both phases
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The iteration limit was hit before reaching optimality
    IterationLimit,
}

impl Solution {
    pub fn infeasible(iterations: usize) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values: Vec::new(),
            objective_value: f64::NAN,
            slack: Vec::new(),
            iterations,
        }
    }

    pub fn unbounded(minimize: bool, iterations: usize) -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: if minimize { f64::NEG_INFINITY } else { f64::INFINITY },
            slack: Vec::new(),
            iterations,
        }
    }

    pub fn iteration_limit(iterations: usize) -> Self {
        Self {
            status: SolutionStatus::IterationLimit,
            values: Vec::new(),
            objective_value: f64::NAN,
            slack: Vec::new(),
            iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// The optimal objective value, or the reason there is none.
    pub fn optimal_value(&self) -> Result<f64, SolveError> {
        match self.status {
            SolutionStatus::Optimal => Ok(self.objective_value),
            SolutionStatus::Infeasible => Err(SolveError::Infeasible),
            SolutionStatus::Unbounded => Err(SolveError::Unbounded),
            SolutionStatus::IterationLimit => Err(SolveError::IterationLimit(self.iterations)),
        }
    }
}

mod error;
mod pricing;
mod problem;
mod revised;
mod simplex;
mod solution;
mod solver;
mod standard_form;

pub use error::SolveError;
pub use problem::{Bounds, Constraint, ConstraintOp, LpProblem, Objective};
pub use solution::{Solution, SolutionStatus};
pub use solver::{Method, ParseMethodError, Solver, validate_tolerance};

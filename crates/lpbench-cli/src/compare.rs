use std::time::{Duration, Instant};

use lpbench_solver::{LpProblem, Method, SolveError, Solver};
use tracing::{info, warn};

/// One method's run over the problem
#[derive(Debug, Clone)]
pub struct MethodRun {
    pub method: Method,
    /// Objective in the maximization sense, or why there is none
    pub objective: Result<f64, SolveError>,
    pub elapsed: Duration,
}

/// Runs `f` and returns its result with the wall-clock time it took.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Solves `problem` once per method, in order, with `base`'s settings.
///
/// The problem is stated as a minimization of negated profit, so the reported
/// objective is negated back.
pub fn run_methods(problem: &LpProblem, methods: &[Method], base: &Solver) -> Vec<MethodRun> {
    methods
        .iter()
        .map(|&method| {
            let solver = base.clone().with_method(method);
            let (result, elapsed) = timed(|| solver.solve(problem));
            let objective = result.and_then(|solution| solution.optimal_value()).map(|v| -v);

            match &objective {
                Ok(value) => info!(%method, objective = value, ?elapsed, "solved"),
                Err(e) => warn!(%method, error = %e, ?elapsed, "no optimum"),
            }

            MethodRun {
                method,
                objective,
                elapsed,
            }
        })
        .collect()
}

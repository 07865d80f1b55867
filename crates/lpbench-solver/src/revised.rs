//! Revised simplex over an explicit basis inverse.
//!
//! Only the `m x m` inverse, the basic values and the basis are carried between
//! iterations; reduced costs and the entering column are recomputed from the
//! original constraint matrix each time. The inverse is updated in place after
//! every pivot and rebuilt from scratch every `refactor_interval` pivots.

use tracing::{debug, trace, warn};

use crate::pricing::Pricing;
use crate::solver::SolverOptions;
use crate::standard_form::{Outcome, StandardForm};

struct RevisedState<'a> {
    sf: &'a StandardForm,
    basis: Vec<usize>,
    in_basis: Vec<bool>,
    b_inv: Vec<Vec<f64>>,
    x_b: Vec<f64>,
    iterations: usize,
    since_refactor: usize,
}

enum PhaseResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

pub(crate) fn solve(sf: &StandardForm, options: &SolverOptions) -> Outcome {
    let mut state = RevisedState::new(sf);
    let feas_tol = sf.feasibility_tolerance(options.tolerance);

    if sf.n_artificial > 0 {
        debug!(artificials = sf.n_artificial, "revised simplex: phase 1");
        let cost = sf.phase1_cost();
        match state.run(&cost, sf.num_cols(), options) {
            PhaseResult::Optimal => {}
            PhaseResult::Unbounded => {
                return Outcome::Infeasible {
                    iterations: state.iterations,
                };
            }
            PhaseResult::IterationLimit => {
                return Outcome::IterationLimit {
                    iterations: state.iterations,
                };
            }
        }

        let residual: f64 = state
            .basis
            .iter()
            .zip(&state.x_b)
            .filter(|&(&col, _)| sf.is_artificial(col))
            .map(|(_, &v)| v)
            .sum();
        if residual > feas_tol {
            debug!(residual, "revised simplex: artificials stay positive");
            return Outcome::Infeasible {
                iterations: state.iterations,
            };
        }

        state.drive_out_artificials(options.tolerance);
    }

    debug!(iterations = state.iterations, "revised simplex: phase 2");
    match state.run(&sf.cost, sf.artificial_start(), options) {
        PhaseResult::Optimal => Outcome::Optimal {
            x: state.point(),
            iterations: state.iterations,
        },
        PhaseResult::Unbounded => Outcome::Unbounded {
            iterations: state.iterations,
        },
        PhaseResult::IterationLimit => Outcome::IterationLimit {
            iterations: state.iterations,
        },
    }
}

impl<'a> RevisedState<'a> {
    fn new(sf: &'a StandardForm) -> Self {
        let m = sf.num_rows();
        let mut in_basis = vec![false; sf.num_cols()];
        for &col in &sf.basis {
            in_basis[col] = true;
        }
        // The starting basis is made of unit slack/artificial columns
        let b_inv = identity(m);

        Self {
            sf,
            basis: sf.basis.clone(),
            in_basis,
            b_inv,
            x_b: sf.b.clone(),
            iterations: 0,
            since_refactor: 0,
        }
    }

    /// Minimizes `cost` allowing only columns below `allowed` to enter.
    fn run(&mut self, cost: &[f64], allowed: usize, options: &SolverOptions) -> PhaseResult {
        let mut pricing = Pricing::new(options.bland_after);

        loop {
            if self.iterations >= options.max_iterations {
                return PhaseResult::IterationLimit;
            }
            if self.since_refactor >= options.refactor_interval {
                self.refactor(options.tolerance);
            }

            let y = self.duals(cost);
            let candidates = (0..allowed)
                .filter(|&j| !self.in_basis[j])
                .map(|j| (j, -self.reduced_cost(cost, &y, j)));
            let Some(entering) = pricing.entering(candidates, options.tolerance) else {
                return PhaseResult::Optimal;
            };

            let u = self.ftran(entering);
            let rows = (0..self.basis.len()).map(|i| (i, self.x_b[i], u[i], self.basis[i]));
            let Some((leaving_row, step)) = pricing.leaving(rows, options.tolerance) else {
                return PhaseResult::Unbounded;
            };

            trace!(
                iteration = self.iterations,
                entering,
                leaving = self.basis[leaving_row],
                step,
                "revised simplex: pivot"
            );
            self.pivot(leaving_row, entering, &u, step);
            self.iterations += 1;
            pricing.record_step(step, options.tolerance);
        }
    }

    /// `y = c_B^T B^-1`
    fn duals(&self, cost: &[f64]) -> Vec<f64> {
        let m = self.basis.len();
        let mut y = vec![0.0; m];
        for (i, &col) in self.basis.iter().enumerate() {
            let c = cost[col];
            if c != 0.0 {
                for k in 0..m {
                    y[k] += c * self.b_inv[i][k];
                }
            }
        }
        y
    }

    fn reduced_cost(&self, cost: &[f64], y: &[f64], col: usize) -> f64 {
        let priced: f64 = y.iter().zip(&self.sf.a).map(|(yk, row)| yk * row[col]).sum();
        cost[col] - priced
    }

    /// `B^-1 a_col`
    fn ftran(&self, col: usize) -> Vec<f64> {
        self.b_inv
            .iter()
            .map(|inv_row| inv_row.iter().zip(&self.sf.a).map(|(v, row)| v * row[col]).sum())
            .collect()
    }

    fn pivot(&mut self, row: usize, entering: usize, u: &[f64], step: f64) {
        let m = self.basis.len();

        for i in 0..m {
            if i != row {
                self.x_b[i] -= step * u[i];
            }
        }
        self.x_b[row] = step;

        let pivot_val = u[row];
        for k in 0..m {
            self.b_inv[row][k] /= pivot_val;
        }
        let pivot_row = self.b_inv[row].clone();
        for i in 0..m {
            if i != row && u[i] != 0.0 {
                let factor = u[i];
                for k in 0..m {
                    self.b_inv[i][k] -= factor * pivot_row[k];
                }
            }
        }

        self.in_basis[self.basis[row]] = false;
        self.in_basis[entering] = true;
        self.basis[row] = entering;
        self.since_refactor += 1;
    }

    /// Swaps zero-level artificials for structural or slack columns.
    fn drive_out_artificials(&mut self, tolerance: f64) {
        let sf = self.sf;
        for row in 0..self.basis.len() {
            if !sf.is_artificial(self.basis[row]) {
                continue;
            }
            let replacement = (0..sf.artificial_start())
                .filter(|&j| !self.in_basis[j])
                .map(|j| (j, self.ftran(j)))
                .find(|(_, u)| u[row].abs() > tolerance);
            if let Some((col, u)) = replacement {
                let step = self.x_b[row] / u[row];
                self.pivot(row, col, &u, step);
            }
        }
    }

    /// Rebuilds `B^-1` and `x_B` from the current basis columns.
    fn refactor(&mut self, tolerance: f64) {
        let m = self.basis.len();
        let basis_matrix: Vec<Vec<f64>> = (0..m)
            .map(|i| self.basis.iter().map(|&col| self.sf.a[i][col]).collect())
            .collect();

        match invert(basis_matrix, tolerance) {
            Some(inv) => {
                self.x_b = inv
                    .iter()
                    .map(|inv_row| inv_row.iter().zip(&self.sf.b).map(|(v, b)| v * b).sum())
                    .collect();
                self.b_inv = inv;
            }
            None => warn!(iteration = self.iterations, "revised simplex: singular basis, keeping updated inverse"),
        }
        self.since_refactor = 0;
    }

    fn point(&self) -> Vec<f64> {
        let mut x = vec![0.0; self.sf.num_cols()];
        for (i, &col) in self.basis.iter().enumerate() {
            x[col] = self.x_b[i];
        }
        x
    }
}

fn identity(m: usize) -> Vec<Vec<f64>> {
    (0..m)
        .map(|i| {
            let mut row = vec![0.0; m];
            row[i] = 1.0;
            row
        })
        .collect()
}

/// Gauss-Jordan inversion with partial pivoting. `None` if a pivot falls below
/// `tolerance`.
fn invert(mut a: Vec<Vec<f64>>, tolerance: f64) -> Option<Vec<Vec<f64>>> {
    let m = a.len();
    let mut inv = identity(m);

    for col in 0..m {
        let pivot = (col..m).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= tolerance {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for k in 0..m {
            a[col][k] /= p;
            inv[col][k] /= p;
        }

        let a_row = a[col].clone();
        let inv_row = inv[col].clone();
        for i in 0..m {
            if i != col {
                let factor = a[i][col];
                if factor != 0.0 {
                    for k in 0..m {
                        a[i][k] -= factor * a_row[k];
                        inv[i][k] -= factor * inv_row[k];
                    }
                }
            }
        }
    }

    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Bounds, ConstraintOp, LpProblem};

    fn optimal(outcome: Outcome) -> Vec<f64> {
        match outcome {
            Outcome::Optimal { x, .. } => x,
            other => panic!("expected optimal, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize 3x + 2y s.t. x + y <= 4, x <= 3, y <= 3 -> x=3, y=1
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let sf = StandardForm::build(&problem);
        let x = optimal(solve(&sf, &SolverOptions::default()));

        assert!((x[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", x[0]);
        assert!((x[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", x[1]);
    }

    #[test]
    fn test_equality_and_lower_bound() {
        // Minimize x + 2y s.t. x + y = 5, x <= 4, y >= 0.5 -> x=4, y=1
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 5.0);
        problem.set_bounds(0, Bounds::new(0.0, Some(4.0))).unwrap();
        problem.set_bounds(1, Bounds::new(0.5, None)).unwrap();

        let sf = StandardForm::build(&problem);
        let x = optimal(solve(&sf, &SolverOptions::default()));
        let values = sf.recover(&x, 1e-9);

        assert!((values[0] - 4.0).abs() < 1e-9, "x = {}", values[0]);
        assert!((values[1] - 1.0).abs() < 1e-9, "y = {}", values[1]);
    }

    #[test]
    fn test_infeasible() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let sf = StandardForm::build(&problem);
        assert!(matches!(solve(&sf, &SolverOptions::default()), Outcome::Infeasible { .. }));
    }

    #[test]
    fn test_unbounded() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 0.0], false);
        problem.add_constraint("diff", vec![1.0, -1.0], ConstraintOp::Le, 1.0);

        let sf = StandardForm::build(&problem);
        assert!(matches!(solve(&sf, &SolverOptions::default()), Outcome::Unbounded { .. }));
    }

    #[test]
    fn test_frequent_refactor_matches() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string(), "z".to_string()]);
        problem.set_objective(vec![2.0, 3.0, 1.0], false);
        problem.add_constraint("a", vec![1.0, 1.0, 1.0], ConstraintOp::Le, 10.0);
        problem.add_constraint("b", vec![2.0, 1.0, 0.0], ConstraintOp::Le, 12.0);
        problem.add_constraint("c", vec![0.0, 1.0, 3.0], ConstraintOp::Le, 9.0);

        let sf = StandardForm::build(&problem);
        let every_pivot = SolverOptions {
            refactor_interval: 1,
            ..SolverOptions::default()
        };
        let a = optimal(solve(&sf, &SolverOptions::default()));
        let b = optimal(solve(&sf, &every_pivot));
        for (u, v) in a.iter().zip(&b) {
            assert!((u - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invert() {
        let inv = invert(vec![vec![4.0, 7.0], vec![2.0, 6.0]], 1e-9).unwrap();
        let expected = [[0.6, -0.7], [-0.2, 0.4]];
        for i in 0..2 {
            for k in 0..2 {
                assert!((inv[i][k] - expected[i][k]).abs() < 1e-12);
            }
        }
        assert!(invert(vec![vec![1.0, 2.0], vec![2.0, 4.0]], 1e-9).is_none());
    }

    #[test]
    fn test_invert_uses_given_tolerance() {
        let nearly_singular = vec![vec![1.0, 0.0], vec![0.0, 1e-6]];
        assert!(invert(nearly_singular.clone(), 1e-9).is_some());
        assert!(invert(nearly_singular, 1e-5).is_none());
    }
}

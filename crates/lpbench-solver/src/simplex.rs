//! Dense tableau, two-phase simplex.

use tracing::{debug, trace};

use crate::pricing::Pricing;
use crate::solver::SolverOptions;
use crate::standard_form::{Outcome, StandardForm};

struct Tableau {
    /// Constraint rows followed by the objective row; last column is the RHS
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    artificial_start: usize,
    iterations: usize,
}

enum SimplexResult {
    Optimal,
    Unbounded,
    IterationLimit,
}

pub(crate) fn solve(sf: &StandardForm, options: &SolverOptions) -> Outcome {
    let mut tableau = Tableau::new(sf);
    let feas_tol = sf.feasibility_tolerance(options.tolerance);

    if sf.n_artificial > 0 {
        debug!(artificials = sf.n_artificial, "simplex: phase 1");
        match phase1(&mut tableau, options, feas_tol) {
            Phase1::Feasible => {}
            Phase1::Infeasible => {
                return Outcome::Infeasible {
                    iterations: tableau.iterations,
                };
            }
            Phase1::IterationLimit => {
                return Outcome::IterationLimit {
                    iterations: tableau.iterations,
                };
            }
        }
    }

    debug!(iterations = tableau.iterations, "simplex: phase 2");
    let exclude_from = tableau.artificial_start;
    let result = run(&mut tableau, exclude_from, options);
    let iterations = tableau.iterations;
    match result {
        SimplexResult::Optimal => Outcome::Optimal {
            x: tableau.point(sf.num_cols()),
            iterations,
        },
        SimplexResult::Unbounded => Outcome::Unbounded { iterations },
        SimplexResult::IterationLimit => Outcome::IterationLimit { iterations },
    }
}

enum Phase1 {
    Feasible,
    Infeasible,
    IterationLimit,
}

fn phase1(tableau: &mut Tableau, options: &SolverOptions, feas_tol: f64) -> Phase1 {
    let n_constraints = tableau.data.len() - 1;
    let n_cols = tableau.data[0].len();
    let art_start = tableau.artificial_start;

    // Save phase 2 objective
    let orig_obj = tableau.data[n_constraints].clone();

    // Maximize -sum(artificials)
    for j in 0..n_cols {
        tableau.data[n_constraints][j] = if j >= art_start && j < n_cols - 1 { -1.0 } else { 0.0 };
    }
    // Price out the basic artificials
    for i in 0..n_constraints {
        if tableau.basic_vars[i] >= art_start {
            for j in 0..n_cols {
                tableau.data[n_constraints][j] += tableau.data[i][j];
            }
        }
    }

    match run(tableau, n_cols - 1, options) {
        SimplexResult::Optimal => {}
        // The phase 1 objective is bounded below by zero
        SimplexResult::Unbounded => return Phase1::Infeasible,
        SimplexResult::IterationLimit => return Phase1::IterationLimit,
    }

    let rhs_col = n_cols - 1;
    for i in 0..n_constraints {
        if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > feas_tol {
            debug!(row = i, residual = tableau.data[i][rhs_col], "simplex: artificial stays positive");
            return Phase1::Infeasible;
        }
    }

    // Drive zero-level artificials out of the basis where possible
    for i in 0..n_constraints {
        if tableau.basic_vars[i] < art_start {
            continue;
        }
        let col = (0..art_start).find(|&j| tableau.data[i][j].abs() > options.tolerance);
        if let Some(col) = col {
            tableau.pivot(i, col);
        }
    }

    // Restore the original objective and price out the basis
    tableau.data[n_constraints] = orig_obj;
    for i in 0..n_constraints {
        let basic = tableau.basic_vars[i];
        let ratio = tableau.data[n_constraints][basic];
        if ratio.abs() > 0.0 {
            for j in 0..n_cols {
                tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
            }
        }
    }

    Phase1::Feasible
}

/// Pivots until no column below `exclude_from` improves the objective row.
fn run(tableau: &mut Tableau, exclude_from: usize, options: &SolverOptions) -> SimplexResult {
    let mut pricing = Pricing::new(options.bland_after);
    let obj_row = tableau.data.len() - 1;
    let rhs_col = tableau.data[0].len() - 1;

    loop {
        if tableau.iterations >= options.max_iterations {
            return SimplexResult::IterationLimit;
        }

        let candidates = (0..exclude_from).map(|j| (j, tableau.data[obj_row][j]));
        let Some(pivot_col) = pricing.entering(candidates, options.tolerance) else {
            return SimplexResult::Optimal;
        };

        let rows = (0..obj_row).map(|i| {
            (i, tableau.data[i][rhs_col], tableau.data[i][pivot_col], tableau.basic_vars[i])
        });
        let Some((pivot_row, step)) = pricing.leaving(rows, options.tolerance) else {
            return SimplexResult::Unbounded;
        };

        trace!(
            iteration = tableau.iterations,
            entering = pivot_col,
            leaving = tableau.basic_vars[pivot_row],
            step,
            "simplex: pivot"
        );
        tableau.pivot(pivot_row, pivot_col);
        tableau.iterations += 1;
        pricing.record_step(step, options.tolerance);
    }
}

impl Tableau {
    fn new(sf: &StandardForm) -> Self {
        let m = sf.num_rows();
        let n_cols = sf.num_cols();

        let mut data = vec![vec![0.0; n_cols + 1]; m + 1];
        for i in 0..m {
            data[i][..n_cols].copy_from_slice(&sf.a[i]);
            data[i][n_cols] = sf.b[i];
        }
        // The objective row holds reduced costs of the maximization of -cost
        for j in 0..n_cols {
            data[m][j] = -sf.cost[j];
        }
        // Phase 2 may start straight away; make the row consistent with the basis
        for i in 0..m {
            let basic = sf.basis[i];
            let ratio = data[m][basic];
            if ratio != 0.0 {
                for j in 0..=n_cols {
                    data[m][j] -= ratio * data[i][j];
                }
            }
        }

        Self {
            data,
            basic_vars: sf.basis.clone(),
            artificial_start: sf.artificial_start(),
            iterations: 0,
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let n_rows = self.data.len();
        let n_cols = self.data[0].len();

        self.basic_vars[row] = col;

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for i in 0..n_rows {
            if i != row {
                let factor = self.data[i][col];
                if factor != 0.0 {
                    for j in 0..n_cols {
                        self.data[i][j] -= factor * pivot_row[j];
                    }
                }
            }
        }
    }

    fn point(&self, n_cols: usize) -> Vec<f64> {
        let rhs_col = self.data[0].len() - 1;
        let mut x = vec![0.0; n_cols];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            x[basic] = self.data[i][rhs_col];
        }
        x
    }
}

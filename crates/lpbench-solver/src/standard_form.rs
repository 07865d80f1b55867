use crate::problem::{ConstraintOp, LpProblem};

/// `min cost·x  s.t.  a·x = b, x >= 0, b >= 0` with an identity starting basis.
///
/// Columns are laid out as `[structural | slack/surplus | artificial]`. Finite
/// lower bounds are shifted to zero and finite upper bounds become extra rows
/// appended after the problem's own constraints.
#[derive(Debug, Clone)]
pub(crate) struct StandardForm {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
    pub cost: Vec<f64>,
    pub basis: Vec<usize>,
    pub n_vars: usize,
    pub n_slack: usize,
    pub n_artificial: usize,
    shift: Vec<f64>,
}

/// What a simplex method reports back in standard-form coordinates.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Optimal { x: Vec<f64>, iterations: usize },
    Infeasible { iterations: usize },
    Unbounded { iterations: usize },
    IterationLimit { iterations: usize },
}

struct Row {
    coefficients: Vec<f64>,
    op: ConstraintOp,
    rhs: f64,
}

impl StandardForm {
    pub fn build(problem: &LpProblem) -> Self {
        let n_vars = problem.num_variables();
        let shift: Vec<f64> = problem.bounds.iter().map(|b| b.lower).collect();

        let mut rows = Vec::with_capacity(problem.num_constraints());
        for c in &problem.constraints {
            let shifted: f64 = c.coefficients.iter().zip(&shift).map(|(a, l)| a * l).sum();
            rows.push(Row {
                coefficients: c.coefficients.clone(),
                op: c.op,
                rhs: c.rhs - shifted,
            });
        }
        for (j, bounds) in problem.bounds.iter().enumerate() {
            if let Some(upper) = bounds.finite_upper() {
                let mut coefficients = vec![0.0; n_vars];
                coefficients[j] = 1.0;
                rows.push(Row {
                    coefficients,
                    op: ConstraintOp::Le,
                    rhs: upper - bounds.lower,
                });
            }
        }

        // Keep the right-hand side non-negative
        for row in &mut rows {
            if row.rhs < 0.0 {
                row.rhs = -row.rhs;
                row.coefficients.iter_mut().for_each(|v| *v = -*v);
                row.op = match row.op {
                    ConstraintOp::Le => ConstraintOp::Ge,
                    ConstraintOp::Ge => ConstraintOp::Le,
                    ConstraintOp::Eq => ConstraintOp::Eq,
                };
            }
        }

        let mut n_slack = 0;
        let mut n_artificial = 0;
        for row in &rows {
            match row.op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1;
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let n_cols = n_vars + n_slack + n_artificial;
        let m = rows.len();
        let mut a = vec![vec![0.0; n_cols]; m];
        let mut b = vec![0.0; m];
        let mut basis = vec![0; m];

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, row) in rows.iter().enumerate() {
            a[i][..n_vars].copy_from_slice(&row.coefficients);
            b[i] = row.rhs;

            match row.op {
                ConstraintOp::Le => {
                    a[i][slack_idx] = 1.0;
                    basis[i] = slack_idx;
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    a[i][slack_idx] = -1.0;
                    slack_idx += 1;
                    a[i][artificial_idx] = 1.0;
                    basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    a[i][artificial_idx] = 1.0;
                    basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        let sign = if problem.objective.minimize { 1.0 } else { -1.0 };
        let mut cost = vec![0.0; n_cols];
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            cost[j] = sign * coef;
        }

        Self {
            a,
            b,
            cost,
            basis,
            n_vars,
            n_slack,
            n_artificial,
            shift,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.b.len()
    }

    pub fn num_cols(&self) -> usize {
        self.n_vars + self.n_slack + self.n_artificial
    }

    /// First artificial column
    pub fn artificial_start(&self) -> usize {
        self.n_vars + self.n_slack
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.artificial_start()
    }

    /// Phase 1 objective: sum of artificials.
    pub fn phase1_cost(&self) -> Vec<f64> {
        (0..self.num_cols())
            .map(|j| if self.is_artificial(j) { 1.0 } else { 0.0 })
            .collect()
    }

    /// Absolute tolerance for "is this basic value zero", scaled by the rhs.
    pub fn feasibility_tolerance(&self, tolerance: f64) -> f64 {
        let scale = self.b.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
        tolerance * scale
    }

    /// Maps a standard-form point back to the original variables.
    pub fn recover(&self, x: &[f64], tolerance: f64) -> Vec<f64> {
        (0..self.n_vars)
            .map(|j| {
                let y = if x[j].abs() < tolerance { 0.0 } else { x[j] };
                y + self.shift[j]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Bounds;

    #[test]
    fn test_le_rows_get_slack_basis() {
        let problem = LpProblem::from_inequalities(&[-1.0, -1.0], &[vec![1.0, 2.0], vec![3.0, 1.0]], &[4.0, 6.0]);
        let sf = StandardForm::build(&problem);

        assert_eq!(sf.num_rows(), 2);
        assert_eq!(sf.n_slack, 2);
        assert_eq!(sf.n_artificial, 0);
        assert_eq!(sf.basis, vec![2, 3]);
        assert_eq!(sf.a[0], vec![1.0, 2.0, 1.0, 0.0]);
        assert_eq!(sf.cost, vec![-1.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negative_rhs_flips_row_and_adds_artificial() {
        let problem = LpProblem::from_inequalities(&[1.0], &[vec![1.0]], &[-1.0]);
        let sf = StandardForm::build(&problem);

        // x <= -1 becomes -x >= 1
        assert_eq!(sf.b, vec![1.0]);
        assert_eq!(sf.n_artificial, 1);
        assert_eq!(sf.a[0], vec![-1.0, -1.0, 1.0]);
        assert!(sf.is_artificial(sf.basis[0]));
    }

    #[test]
    fn test_bounds_shift_and_upper_rows() {
        let mut problem = LpProblem::from_inequalities(&[1.0], &[vec![1.0]], &[10.0]);
        problem.set_bounds(0, Bounds::new(2.0, Some(5.0))).unwrap();
        let sf = StandardForm::build(&problem);

        assert_eq!(sf.b, vec![8.0, 3.0]);
        assert_eq!(sf.recover(&[1.5, 0.0, 0.0], 1e-9), vec![3.5]);
    }

    #[test]
    fn test_infinite_upper_adds_no_row() {
        let mut problem = LpProblem::from_inequalities(&[1.0], &[vec![1.0]], &[10.0]);
        problem.set_bounds(0, Bounds::new(0.0, Some(f64::INFINITY))).unwrap();
        let sf = StandardForm::build(&problem);

        assert_eq!(sf.num_rows(), 1);
        assert!((sf.feasibility_tolerance(1e-9) - 1e-8).abs() < 1e-20);
    }

    #[test]
    fn test_maximize_negates_cost() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![2.0], false);
        let sf = StandardForm::build(&problem);
        assert_eq!(sf.cost, vec![-2.0]);
    }
}

use crate::error::SolveError;

/// Represents a linear programming problem
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
    /// Per-variable bounds, one entry per variable
    pub bounds: Vec<Bounds>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

/// Bounds on a single variable. The lower bound must be finite.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

impl Bounds {
    /// `[0, inf)`
    pub fn non_negative() -> Self {
        Self { lower: 0.0, upper: None }
    }

    pub fn new(lower: f64, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    /// The upper bound if it is finite; `+inf` means no bound.
    pub fn finite_upper(&self) -> Option<f64> {
        self.upper.filter(|u| u.is_finite())
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
            bounds: vec![Bounds::non_negative(); n],
        }
    }

    /// Builds a problem of the form `min c·x  s.t.  A·x <= b, x >= 0` with
    /// variables named `x1..xn` and rows named `row1..rowm`.
    pub fn from_inequalities(c: &[f64], a_ub: &[Vec<f64>], b_ub: &[f64]) -> Self {
        let variables = (1..=c.len()).map(|i| format!("x{i}")).collect();
        let mut problem = Self::new(variables);
        problem.set_objective(c.to_vec(), true);
        for (i, (row, &rhs)) in a_ub.iter().zip(b_ub).enumerate() {
            problem.add_constraint(format!("row{}", i + 1), row.clone(), ConstraintOp::Le, rhs);
        }
        problem
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn set_bounds(&mut self, variable: usize, bounds: Bounds) -> Result<(), SolveError> {
        let count = self.bounds.len();
        let slot = self
            .bounds
            .get_mut(variable)
            .ok_or(SolveError::UnknownVariable { index: variable, count })?;
        *slot = bounds;
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value of `values` in the problem's own sense
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        dot(&self.objective.coefficients, values)
    }

    /// `rhs - a·x` for every constraint
    pub fn slack(&self, values: &[f64]) -> Vec<f64> {
        self.constraints
            .iter()
            .map(|c| c.rhs - dot(&c.coefficients, values))
            .collect()
    }

    /// Checks that every vector has the right length and every number is usable.
    pub fn validate(&self) -> Result<(), SolveError> {
        let n = self.num_variables();

        if self.objective.coefficients.len() != n {
            return Err(SolveError::DimensionMismatch {
                what: "objective".to_string(),
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }
        if self.objective.coefficients.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::NonFiniteCoefficient("objective".to_string()));
        }

        if self.bounds.len() != n {
            return Err(SolveError::DimensionMismatch {
                what: "bounds".to_string(),
                expected: n,
                found: self.bounds.len(),
            });
        }
        for (name, b) in self.variables.iter().zip(&self.bounds) {
            let upper_ok = match b.upper {
                Some(u) => !u.is_nan() && u >= b.lower,
                None => true,
            };
            if !b.lower.is_finite() || !upper_ok {
                return Err(SolveError::InvalidBounds {
                    variable: name.clone(),
                    lower: b.lower,
                    upper: b.upper.unwrap_or(f64::INFINITY),
                });
            }
        }

        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(SolveError::DimensionMismatch {
                    what: format!("constraint {}", c.name),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|v| !v.is_finite()) {
                return Err(SolveError::NonFiniteCoefficient(format!("constraint {}", c.name)));
            }
        }

        Ok(())
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var() -> LpProblem {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem
    }

    #[test]
    fn test_defaults_to_non_negative_bounds() {
        let problem = two_var();
        assert_eq!(problem.bounds, vec![Bounds::non_negative(); 2]);
        assert!(problem.validate().is_ok());
    }

    #[test]
    fn test_from_inequalities_names_rows_and_variables() {
        let problem = LpProblem::from_inequalities(
            &[-1.0, -2.0],
            &[vec![1.0, 1.0], vec![1.0, 0.0]],
            &[4.0, 2.0],
        );
        assert_eq!(problem.variables, vec!["x1", "x2"]);
        assert_eq!(problem.constraints[1].name, "row2");
        assert_eq!(problem.constraints[1].op, ConstraintOp::Le);
        assert!(problem.objective.minimize);
    }

    #[test]
    fn test_rejects_short_constraint_row() {
        let mut problem = two_var();
        problem.add_constraint("bad", vec![1.0], ConstraintOp::Le, 1.0);
        match problem.validate() {
            Err(SolveError::DimensionMismatch { expected, found, .. }) => {
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_objective_length() {
        let mut problem = two_var();
        problem.set_objective(vec![1.0, 2.0, 3.0], true);
        assert!(matches!(problem.validate(), Err(SolveError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_rejects_crossed_bounds() {
        let mut problem = two_var();
        problem.set_bounds(0, Bounds::new(5.0, Some(1.0))).unwrap();
        assert!(matches!(problem.validate(), Err(SolveError::InvalidBounds { .. })));
    }

    #[test]
    fn test_infinite_upper_is_no_bound() {
        let mut problem = two_var();
        problem.set_bounds(0, Bounds::new(0.0, Some(f64::INFINITY))).unwrap();
        assert!(problem.validate().is_ok());
        assert_eq!(problem.bounds[0].finite_upper(), None);
        assert_eq!(Bounds::new(0.0, Some(3.0)).finite_upper(), Some(3.0));
    }

    #[test]
    fn test_rejects_nan_and_negative_infinite_upper() {
        let mut problem = two_var();
        problem.set_bounds(1, Bounds::new(0.0, Some(f64::NAN))).unwrap();
        assert!(matches!(problem.validate(), Err(SolveError::InvalidBounds { .. })));

        problem.set_bounds(1, Bounds::new(0.0, Some(f64::NEG_INFINITY))).unwrap();
        assert!(matches!(problem.validate(), Err(SolveError::InvalidBounds { .. })));
    }

    #[test]
    fn test_set_bounds_out_of_range() {
        let mut problem = two_var();
        assert_eq!(
            problem.set_bounds(2, Bounds::new(1.0, None)),
            Err(SolveError::UnknownVariable { index: 2, count: 2 })
        );
        assert_eq!(problem.bounds, vec![Bounds::non_negative(); 2]);
    }

    #[test]
    fn test_rejects_nan_rhs() {
        let mut problem = two_var();
        problem.add_constraint("nan", vec![1.0, 0.0], ConstraintOp::Le, f64::NAN);
        assert!(matches!(problem.validate(), Err(SolveError::NonFiniteCoefficient(_))));
    }

    #[test]
    fn test_slack_and_evaluate() {
        let problem = two_var();
        assert_eq!(problem.evaluate(&[1.0, 2.0]), 7.0);
        assert_eq!(problem.slack(&[1.0, 2.0]), vec![1.0]);
    }
}

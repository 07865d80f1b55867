use lpbench_solver::{ConstraintOp, LpProblem};

/// The fixed 12-variable, 19-row problem.
///
/// Minimizes the negated profit of x1..x9 subject to per-variable caps, links
/// from each of x1..x9 to one of the aggregates x10..x12, and a shared capacity
/// row over the aggregates. All variables are non-negative.
pub fn fixed_problem() -> LpProblem {
    let objective = [
        -640.0, -440.0, -200.0, -480.0, -330.0, -150.0, -480.0, -330.0, -150.0, 0.0, 0.0, 0.0,
    ];
    // (cap, aggregate index) for x1..x9
    let links: [(f64, usize); 9] = [
        (25.0, 10),
        (60.0, 10),
        (210.0, 12),
        (12.0, 10),
        (30.0, 11),
        (130.0, 12),
        (5.0, 10),
        (9.0, 11),
        (150.0, 12),
    ];

    let mut problem = LpProblem::new((1..=12).map(|i| format!("x{i}")).collect());
    problem.set_objective(objective.to_vec(), true);

    for (k, &(cap, aggregate)) in links.iter().enumerate() {
        let var = k + 1;

        let mut row = vec![0.0; 12];
        row[k] = 1.0;
        problem.add_constraint(format!("x{var}_cap"), row, ConstraintOp::Le, cap);

        let mut row = vec![0.0; 12];
        row[k] = 1.0;
        row[aggregate - 1] = -1.0;
        problem.add_constraint(format!("x{var}_link"), row, ConstraintOp::Le, 0.0);
    }

    let mut row = vec![0.0; 12];
    row[9] = 2.0;
    row[10] = 1.5;
    row[11] = 1.0;
    problem.add_constraint("aggregate_capacity", row, ConstraintOp::Le, 190.0);

    problem
}

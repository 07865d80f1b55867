/// Entering/leaving variable selection shared by both simplex methods.
///
/// Uses Dantzig's rule until a run of degenerate pivots gets long, then falls
/// back to Bland's rule until the objective moves again.
#[derive(Debug, Clone)]
pub(crate) struct Pricing {
    bland_after: usize,
    degenerate_run: usize,
}

impl Pricing {
    pub fn new(bland_after: usize) -> Self {
        Self {
            bland_after,
            degenerate_run: 0,
        }
    }

    pub fn use_bland(&self) -> bool {
        self.degenerate_run >= self.bland_after
    }

    /// Records the step length of the pivot just taken.
    pub fn record_step(&mut self, step: f64, tolerance: f64) {
        if step.abs() <= tolerance {
            self.degenerate_run += 1;
        } else {
            self.degenerate_run = 0;
        }
    }

    /// Picks the entering column from `(column, improvement)` pairs.
    /// Only improvements above `tolerance` qualify.
    pub fn entering(&self, candidates: impl Iterator<Item = (usize, f64)>, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (col, improvement) in candidates {
            if improvement <= tolerance {
                continue;
            }
            if self.use_bland() {
                if best.is_none_or(|(c, _)| col < c) {
                    best = Some((col, improvement));
                }
            } else if best.is_none_or(|(_, v)| improvement > v) {
                best = Some((col, improvement));
            }
        }
        best.map(|(col, _)| col)
    }

    /// Minimum ratio test over `(row, rhs, pivot_entry, basic_column)`.
    /// Ties go to the smallest basic column.
    pub fn leaving(&self, rows: impl Iterator<Item = (usize, f64, f64, usize)>, tolerance: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64, usize)> = None;
        for (row, rhs, entry, basic) in rows {
            if entry <= tolerance {
                continue;
            }
            let ratio = (rhs / entry).max(0.0);
            let better = match best {
                None => true,
                Some((_, r, b)) => ratio < r - tolerance || (ratio <= r + tolerance && basic < b),
            };
            if better {
                best = Some((row, ratio, basic));
            }
        }
        best.map(|(row, ratio, _)| (row, ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dantzig_picks_largest_improvement() {
        let pricing = Pricing::new(10);
        let col = pricing.entering(vec![(0, 1.0), (1, 5.0), (2, 3.0)].into_iter(), 1e-9);
        assert_eq!(col, Some(1));
    }

    #[test]
    fn test_bland_after_degenerate_run() {
        let mut pricing = Pricing::new(2);
        pricing.record_step(0.0, 1e-9);
        assert!(!pricing.use_bland());
        pricing.record_step(0.0, 1e-9);
        assert!(pricing.use_bland());

        let col = pricing.entering(vec![(4, 1.0), (1, 0.5), (2, 3.0)].into_iter(), 1e-9);
        assert_eq!(col, Some(1));

        pricing.record_step(2.0, 1e-9);
        assert!(!pricing.use_bland());
    }

    #[test]
    fn test_no_improving_column() {
        let pricing = Pricing::new(10);
        assert_eq!(pricing.entering(vec![(0, -1.0), (1, 0.0)].into_iter(), 1e-9), None);
    }

    #[test]
    fn test_ratio_test_tie_breaks_on_basic_index() {
        let pricing = Pricing::new(10);
        let rows = vec![(0, 4.0, 2.0, 7), (1, 2.0, 1.0, 3), (2, 9.0, -1.0, 0)];
        assert_eq!(pricing.leaving(rows.into_iter(), 1e-9), Some((1, 2.0)));
    }

    #[test]
    fn test_ratio_test_unbounded() {
        let pricing = Pricing::new(10);
        let rows = vec![(0, 4.0, -2.0, 0), (1, 2.0, 0.0, 1)];
        assert_eq!(pricing.leaving(rows.into_iter(), 1e-9), None);
    }
}

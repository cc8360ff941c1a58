//! Fitness evaluation of candidate assignments.

mod evaluator;

pub use evaluator::{ScoreBreakdown, SolutionEvaluator};

pub mod solve;
pub mod vector;

pub use solve::{solve, solve_with_tolerance, DEFAULT_PIVOT_TOLERANCE};
pub use vector::{dot, l1_norm, l2_norm};

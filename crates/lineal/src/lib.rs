//! # Lineal
//!
//! Linear-model estimation in pure Rust, with no external linear-algebra
//! dependency.
//!
//! ## Modules
//!
//! - **core** — `Matrix` numeric table, `Float` scalar trait, shared errors
//! - **linalg** — dot/norms and Gaussian elimination with partial pivoting
//! - **objective** — squared/logistic losses, L1/L2/elastic-net penalties
//! - **solvers** — closed-form, coordinate-descent, gradient-descent and
//!   mistake-driven strategies producing a `FitOutcome`
//! - **metrics** — R², MSE, accuracy
//! - **models** — OLS, Ridge, Lasso, ElasticNet, LogisticRegression,
//!   SgdRegressor, Perceptron, PassiveAggressive

/// Numeric table and shared error types.
pub use lineal_core as core;

/// Linear algebra kernel.
pub use lineal_linalg as linalg;

/// Losses and regularization penalties.
pub use lineal_objective as objective;

/// Solver strategies.
pub use lineal_solvers as solvers;

/// Scoring metrics.
pub use lineal_metrics as metrics;

/// Public estimators.
pub use lineal_models as models;

pub use lineal_core::{Float, LinearError, LinearResult, Matrix};
pub use lineal_models::{
    ElasticNet, Lasso, LinearRegression, LogisticRegression, PassiveAggressive, Perceptron,
    Ridge, SgdRegressor,
};
pub use lineal_solvers::{ConvergenceStatus, FitOutcome};

pub mod closed_form;
pub mod coordinate_descent;
pub mod gradient_descent;
pub mod mistake_driven;
pub mod outcome;
pub mod schedule;

pub use closed_form::ClosedForm;
pub use coordinate_descent::CoordinateDescent;
pub use gradient_descent::{GradientDescent, Traversal};
pub use mistake_driven::{MarginRule, MistakeDriven};
pub use outcome::{ConvergenceStatus, FitOutcome};
pub use schedule::LearningRate;

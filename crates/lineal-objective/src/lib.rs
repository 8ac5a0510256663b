pub mod loss;
pub mod objective;
pub mod penalty;

pub use loss::{sigmoid, Loss};
pub use objective::Objective;
pub use penalty::{soft_threshold, Penalty};

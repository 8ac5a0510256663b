pub mod dtype;
pub mod error;
pub mod matrix;

pub use dtype::Float;
pub use error::{LinearError, LinearResult};
pub use matrix::Matrix;

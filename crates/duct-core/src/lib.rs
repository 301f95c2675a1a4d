pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{DuctError, Result, Side};
pub use tolerance::Tolerance;

pub mod types;
pub mod transcript;

pub use types::{ExonBlock, StartFailure};

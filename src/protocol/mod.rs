pub mod constants;
pub mod container;
pub mod error;

pub use constants::*;
pub use container::*;
pub use error::ContainerError;

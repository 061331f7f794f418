//! Type definitions

pub mod messages;
pub mod stop;
pub mod tour;

pub use messages::*;
pub use stop::*;
pub use tour::*;

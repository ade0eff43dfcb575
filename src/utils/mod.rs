//! Utility modules shared by the query engines.
//!
//! - Constants
//! - Request validation helpers

pub mod constants;
pub mod validation;

pub use constants::*;
pub use validation::*;

//! Configuration validation
//!
//! Validates pipeline configuration before any dataset is touched.

mod error;
mod validator;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use error::ValidationError;
pub use validator::validate_config;

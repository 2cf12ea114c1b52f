//! # stepmint-core
//! Foundation types and traits for the stepmint sale engine.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

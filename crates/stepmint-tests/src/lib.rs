//! Integration test suite for stepmint.
//!
//! Exercises the sale engine end to end through its public API, including
//! concurrent buyers and collaborators that fail mid-purchase.

pub mod helpers;

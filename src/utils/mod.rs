//! Helpers shared across the console.

pub mod validation;

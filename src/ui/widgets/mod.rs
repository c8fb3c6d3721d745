//! Reusable UI widget components.
//!
//! This module contains the shared styling utilities.

pub mod styling;

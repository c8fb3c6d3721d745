//! Event handling module.
//!
//! Terminal events: key presses routed through the hotkey tables, and the
//! tick that drives status expiry and log collection.

pub mod terminal;

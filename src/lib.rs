//! Terminal administration console for benefit disbursement programs.
//!
//! The centre of the console is a form designer: fields are picked from a
//! component library or a template, arranged on pages, configured in a
//! property panel, previewed in fill mode and published to share channels.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod logger;
pub mod services;
pub mod state;
pub mod ui;
pub mod utils;

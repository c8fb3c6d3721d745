//! Console state management module.
//!
//! This module contains the core state management for the console, including:
//! - Main `State` struct that holds the stores, the designer session and cursors
//! - Navigation types (View, Focus, DesignerPane, etc.)
//! - Modal types (confirmations, text input, status line)
//! - State error handling

mod error;
mod modal;
mod navigation;

pub use error::StateError;
pub use modal::{Confirmation, InputTarget, StatusLevel, StatusMessage, TextInput};
pub use navigation::{DesignerPane, Focus, TemplateTab, View, MENU_VIEWS};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::{PanelEntry, State};

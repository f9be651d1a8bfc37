//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - key dispatch through the keybinding registry
//! - `events` - background task completions
//! - `render` - layout and view dispatch
//! - `helpers` - fetch spawning, panic capture, layout utilities
//! - `header`, `articles`, `detail`, `navbar`, `status`, `help` - widgets

mod articles;
pub mod detail;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod navbar;
mod render;
mod status;

pub use loop_runner::{run, Action};

//! Terminal UI module using ratatui.
//!
//! - `render`: frame rendering for the home and login pages
//! - `input`: keyboard event handling
//! - `styles`: color palette and text styling

pub mod input;
pub mod render;
pub mod styles;

//! Buffer module: The in-memory canvas every frame is drawn into.
//!
//! This module contains:
//! - [`Cell`]: One character plus its [`Style`]
//! - [`Buffer`]: A clipped grid of cells the widgets draw on
//! - [`Rgb`]: True-color representation
//! - [`Modifiers`]: Text style bitflags
//! - [`diff`]: Turns two consecutive frames into minimal terminal output

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use cell::{Cell, Modifiers, Rgb, Style};
pub use buffer::Buffer;

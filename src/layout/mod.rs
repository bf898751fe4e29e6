//! Layout module: Screen regions recomputed from the terminal size.
//!
//! Layouts are cheap and recomputed every frame, so a resize never needs
//! any bookkeeping beyond reading the new size.

mod rect;
mod dashboard;

pub use rect::Rect;
pub use dashboard::DashboardLayout;

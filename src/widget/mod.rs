//! Widgets: the pieces the dashboard screen is built from.
//!
//! Every widget implements [`Widget`] and draws into a [`Buffer`] region
//! handed to it by the layout. Widgets are cheap views over data owned
//! elsewhere and are rebuilt each frame.
//!
//! [`Buffer`]: crate::buffer::Buffer

mod block;
mod summary;
mod table;
mod traits;

pub use block::Block;
pub use summary::{SummaryPanel, NO_DATA};
pub use table::{clamp_scroll, negotiate_widths, SensorTable, TableRow, HEADERS, MISSING, TARGET_WIDTHS};
pub use traits::Widget;

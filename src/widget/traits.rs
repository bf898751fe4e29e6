//! Widget trait shared by everything drawn on the dashboard.

use crate::buffer::Buffer;
use crate::layout::Rect;

/// A UI component that can draw itself into a region of a buffer.
///
/// Widgets are rebuilt every frame from current data, so they carry no
/// bounds or dirty state of their own: the caller hands them an area.
pub trait Widget {
    /// Render this widget into `area` of `buffer`.
    ///
    /// The widget must only write to cells within `area`, and must cope
    /// with any size, including an empty one.
    fn render(&self, area: Rect, buffer: &mut Buffer);
}

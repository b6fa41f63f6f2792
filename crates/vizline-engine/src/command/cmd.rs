use crate::math::Mat4;
use crate::text::FontId;

/// Topology and shading of a command's vertices.
///
/// Declaration order is submission order after sorting.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DrawMode {
    /// Point list.
    Point,
    /// Line list; every two vertices form a segment.
    Stroke,
    /// Triangle list.
    Fill,
    /// Triangle list in viewport pixels, textured from a font atlas.
    Text,
}

/// A recorded batch of vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Command {
    /// First vertex of the command in the frame's vertex stream.
    pub base_index: u32,
    pub vertex_count: u32,
    /// Transform active when the command was opened; maps local to world space.
    pub transform: Mat4,
    pub mode: DrawMode,
    /// Depth key used as the secondary sort criterion.
    pub min_depth: f32,
    pub depth_test: bool,
    /// Font bound to a text command.
    pub font: Option<FontId>,
}

impl Command {
    pub(crate) fn open(
        mode: DrawMode,
        base_index: u32,
        transform: Mat4,
        depth_test: bool,
        font: Option<FontId>,
    ) -> Self {
        Self {
            base_index,
            vertex_count: 0,
            transform,
            mode,
            min_depth: f32::INFINITY,
            depth_test,
            font,
        }
    }

    /// Vertex range `[base_index, base_index + vertex_count)`.
    #[inline]
    pub fn range(&self) -> core::ops::Range<usize> {
        let start = self.base_index as usize;
        start..start + self.vertex_count as usize
    }
}

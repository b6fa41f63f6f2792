use core::cmp::Ordering;

use super::{Command, DrawMode};

/// Sort key for recorded commands.
///
/// Ordering rules:
/// 1) `mode`: ascending (point, stroke, fill, text)
/// 2) `depth`: ascending, total order over `f32` (unset depths sort last)
///
/// Equal keys keep recording order; the sort that consumes this key is stable.
#[derive(Debug, Copy, Clone)]
pub struct SortKey {
    pub mode: DrawMode,
    pub depth: f32,
}

impl SortKey {
    #[inline]
    pub const fn new(mode: DrawMode, depth: f32) -> Self {
        Self { mode, depth }
    }

    #[inline]
    pub fn of(cmd: &Command) -> Self {
        Self::new(cmd.mode, cmd.min_depth)
    }
}

impl PartialEq for SortKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.mode.cmp(&other.mode) {
            Ordering::Equal => self.depth.total_cmp(&other.depth),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

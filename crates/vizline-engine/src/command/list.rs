use crate::buffer::FixedBuffer;
use crate::error::{Error, Result};

use super::{Command, SortKey};

/// Index of a command in a [`CommandList`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CommandHandle(usize);

impl CommandHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Recorded command stream for a frame.
///
/// State machine with two states: idle (`open == None`) and recording.
/// Exactly one command may be open; it is always the last one in the store.
#[derive(Debug)]
pub struct CommandList {
    commands: FixedBuffer<Command>,
    open: Option<CommandHandle>,
}

impl CommandList {
    pub fn new(capacity: usize) -> Self {
        Self {
            commands: FixedBuffer::new(capacity),
            open: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.commands.capacity()
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.open.is_some()
    }

    /// Commands in recording order (or sorted order after [`sort`](Self::sort)).
    #[inline]
    pub fn as_slice(&self) -> &[Command] {
        self.commands.as_slice()
    }

    /// Opens `cmd` for recording. Idle → recording.
    pub fn begin(&mut self, cmd: Command) -> Result<CommandHandle> {
        if self.open.is_some() {
            return Err(Error::PrevCommandNotEnded);
        }
        let index = self
            .commands
            .push(cmd)
            .map_err(|_| Error::OutOfCommandBuffer { capacity: self.commands.capacity() })?;
        let handle = CommandHandle(index);
        self.open = Some(handle);
        Ok(handle)
    }

    /// Closes the open command and returns a copy of it. Recording → idle.
    pub fn end(&mut self) -> Result<Command> {
        let handle = self.open.take().ok_or(Error::NoActiveCommand)?;
        self.commands
            .get(handle.0)
            .copied()
            .ok_or(Error::OutOfBoundsAccess { index: handle.0, len: self.commands.len() })
    }

    #[inline]
    pub fn open(&self) -> Option<&Command> {
        self.open.and_then(|h| self.commands.get(h.0))
    }

    #[inline]
    pub fn open_mut(&mut self) -> Option<&mut Command> {
        self.open.and_then(|h| self.commands.get_mut(h.0))
    }

    #[inline]
    pub fn get(&self, handle: CommandHandle) -> Option<&Command> {
        self.commands.get(handle.0)
    }

    /// Stable sort by [`SortKey`]. Reorders records only; vertex ranges stay valid.
    ///
    /// Fails with `PrevCommandNotEnded` while a command is open.
    pub fn sort(&mut self) -> Result<()> {
        if self.open.is_some() {
            return Err(Error::PrevCommandNotEnded);
        }
        self.commands
            .as_mut_slice()
            .sort_by(|a, b| SortKey::of(a).cmp(&SortKey::of(b)));
        Ok(())
    }

    /// Drops all commands, including an open one. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.open = None;
    }

    pub(crate) fn release(&mut self) {
        self.commands.release();
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DrawMode;
    use crate::math::Mat4;

    fn cmd(mode: DrawMode, base: u32) -> Command {
        Command::open(mode, base, Mat4::IDENTITY, true, None)
    }

    // ── protocol ──────────────────────────────────────────────────────────

    #[test]
    fn begin_twice_is_rejected() {
        let mut list = CommandList::new(4);
        list.begin(cmd(DrawMode::Fill, 0)).unwrap();
        assert!(matches!(list.begin(cmd(DrawMode::Fill, 0)), Err(Error::PrevCommandNotEnded)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn end_without_begin_is_rejected() {
        let mut list = CommandList::new(4);
        assert!(matches!(list.end(), Err(Error::NoActiveCommand)));
    }

    #[test]
    fn begin_end_cycle() {
        let mut list = CommandList::new(4);
        let h = list.begin(cmd(DrawMode::Stroke, 0)).unwrap();
        assert!(list.is_recording());
        list.open_mut().unwrap().vertex_count = 6;
        let closed = list.end().unwrap();
        assert!(!list.is_recording());
        assert_eq!(closed.vertex_count, 6);
        assert_eq!(list.get(h).unwrap().range(), 0..6);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut list = CommandList::new(1);
        list.begin(cmd(DrawMode::Point, 0)).unwrap();
        list.end().unwrap();
        assert!(matches!(
            list.begin(cmd(DrawMode::Point, 0)),
            Err(Error::OutOfCommandBuffer { capacity: 1 })
        ));
    }

    // ── sort ──────────────────────────────────────────────────────────────

    fn record(list: &mut CommandList, mode: DrawMode, depth: f32, base: u32) {
        list.begin(cmd(mode, base)).unwrap();
        list.open_mut().unwrap().min_depth = depth;
        list.end().unwrap();
    }

    #[test]
    fn sort_orders_by_mode_then_depth() {
        let mut list = CommandList::new(8);
        record(&mut list, DrawMode::Text, 0.5, 0);
        record(&mut list, DrawMode::Fill, 2.0, 1);
        record(&mut list, DrawMode::Point, 9.0, 2);
        record(&mut list, DrawMode::Text, 0.1, 3);
        record(&mut list, DrawMode::Fill, -1.0, 4);
        record(&mut list, DrawMode::Stroke, 0.0, 5);
        list.sort().unwrap();

        let cmds = list.as_slice();
        for pair in cmds.windows(2) {
            let (i, j) = (&pair[0], &pair[1]);
            assert!(i.mode < j.mode || (i.mode == j.mode && i.min_depth <= j.min_depth));
        }
        let bases: Vec<u32> = cmds.iter().map(|c| c.base_index).collect();
        assert_eq!(bases, vec![2, 5, 4, 1, 3, 0]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut list = CommandList::new(8);
        for base in 0..4 {
            record(&mut list, DrawMode::Stroke, 1.0, base);
        }
        list.sort().unwrap();
        let bases: Vec<u32> = list.as_slice().iter().map(|c| c.base_index).collect();
        assert_eq!(bases, vec![0, 1, 2, 3]);
    }

    #[test]
    fn sort_while_recording_is_rejected() {
        let mut list = CommandList::new(2);
        list.begin(cmd(DrawMode::Fill, 0)).unwrap();
        assert!(matches!(list.sort(), Err(Error::PrevCommandNotEnded)));
    }
}

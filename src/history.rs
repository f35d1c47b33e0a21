// Bounded undo/redo history of full snapshots.
//
// Invariants:
// - the undo stack is never empty; undo always restores its new top
// - undo/redo move the caller's live state onto the opposite stack, so after
//   a redo the undo top is the state the redo replaced
// - both stacks hold at most `capacity` entries, evicting the oldest
// - pushing a new state discards the redo stack

use std::collections::VecDeque;

/// Default number of snapshots kept on each stack.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>, // back = state the next undo restores past
    redo: VecDeque<T>, // back = next state to redo
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Start with `initial` as the only (current) state. Capacity is at least 1.
    pub fn new(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut undo = VecDeque::with_capacity(capacity + 1);
        undo.push_back(initial);
        Self { undo, redo: VecDeque::new(), capacity }
    }

    /// Record a new current state. Evicts the oldest entry past capacity and
    /// clears the redo stack.
    pub fn push(&mut self, state: T) {
        self.undo.push_back(state);
        if self.undo.len() > self.capacity {
            self.undo.pop_front();
            log::debug!("history full ({}), evicted oldest snapshot", self.capacity);
        }
        if !self.redo.is_empty() {
            log::debug!("new snapshot discards {} redo entries", self.redo.len());
            self.redo.clear();
        }
    }

    /// Step back one state. `live` (the state on screen) goes to the redo
    /// stack, the top snapshot is dropped, and the one below it is returned.
    /// `None` when only the oldest state is left; nothing changes then.
    pub fn undo(&mut self, live: &T) -> Option<&T> {
        if self.undo.len() <= 1 {
            return None;
        }
        Self::push_bounded(&mut self.redo, live.clone(), self.capacity);
        self.undo.pop_back();
        self.undo.back()
    }

    /// Step forward one state. `live` is pushed onto the undo stack and the
    /// most recently undone state is handed back. `None` when there is
    /// nothing to redo.
    pub fn redo(&mut self, live: &T) -> Option<T> {
        let next = self.redo.pop_back()?;
        Self::push_bounded(&mut self.undo, live.clone(), self.capacity);
        Some(next)
    }

    fn push_bounded(stack: &mut VecDeque<T>, item: T, capacity: usize) {
        stack.push_back(item);
        if stack.len() > capacity {
            stack.pop_front();
        }
    }

    /// The newest snapshot on the undo stack.
    pub fn current(&self) -> &T {
        // Never empty: `new` seeds one entry and `undo` always leaves one.
        &self.undo[self.undo.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

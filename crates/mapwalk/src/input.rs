//! Logical input: the keys the session reacts to, the events the window layer
//! produces, and the queue that carries them into the next frame.

use glam::Vec2;
use std::collections::{HashSet, VecDeque};

/// Logical keys, independent of the physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    PanUp,
    PanDown,
    PanLeft,
    PanRight,
    ToggleMode,
    ClearMarkers,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    /// Left click at a pixel position (origin top-left).
    Click(Vec2),
    Resized { width: u32, height: u32 },
    /// The window lost keyboard focus; releases will not arrive.
    FocusLost,
    CloseRequested,
}

/// Which logical keys are currently held.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held. Returns `true` only on the transition from
    /// released to pressed, so OS auto-repeat does not re-trigger.
    pub fn press(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Forgets every held key, e.g. after focus loss.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// FIFO of input events collected between two executed frames.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Takes every pending event in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//! Double buffer with a flag swap.
//!
//! Each sub-step reads the current buffer and writes the next one, then
//! calls [`PingPong::swap`]. [`PingPong::split`] is the only way to hold
//! both at once, and it hands out the current buffer immutably, so a
//! sub-step can never write what it reads.
//!
//! ```text
//! b_is_current = false:  buffer_a ── current    buffer_b ── next
//! b_is_current = true:   buffer_a ── next       buffer_b ── current
//! ```

use std::mem;

/// Two buffers of the same type alternating between "current" and "next".
#[derive(Clone, Debug)]
pub struct PingPong<T> {
    buffer_a: T,
    buffer_b: T,
    /// Which buffer holds the latest data (false = A, true = B).
    b_is_current: bool,
    swaps: u32,
}

impl<T> PingPong<T> {
    /// `current` starts as the readable buffer, `next` as the writable one.
    pub fn new(current: T, next: T) -> Self {
        Self {
            buffer_a: current,
            buffer_b: next,
            b_is_current: false,
            swaps: 0,
        }
    }

    /// The buffer holding the latest data.
    pub fn current(&self) -> &T {
        if self.b_is_current {
            &self.buffer_b
        } else {
            &self.buffer_a
        }
    }

    /// Mutable access to the latest data, for edits between sub-steps.
    pub fn current_mut(&mut self) -> &mut T {
        if self.b_is_current {
            &mut self.buffer_b
        } else {
            &mut self.buffer_a
        }
    }

    /// Borrow the current buffer for reading and the next for writing.
    pub fn split(&mut self) -> (&T, &mut T) {
        if self.b_is_current {
            (&self.buffer_b, &mut self.buffer_a)
        } else {
            (&self.buffer_a, &mut self.buffer_b)
        }
    }

    /// Exchange roles: what was written becomes current.
    pub fn swap(&mut self) {
        self.b_is_current = !self.b_is_current;
        self.swaps += 1;
    }

    /// Swaps performed since construction.
    pub fn swaps(&self) -> u32 {
        self.swaps
    }

    /// Move the latest data into the first slot.
    ///
    /// After an odd number of swaps the latest data sits in the second
    /// slot; this performs the one extra exchange that brings it back.
    /// [`PingPong::current`] returns the same data before and after.
    pub fn settle(&mut self) {
        if self.b_is_current {
            mem::swap(&mut self.buffer_a, &mut self.buffer_b);
            self.b_is_current = false;
        }
    }

    /// Consume the pair, keeping only the latest data.
    pub fn into_current(self) -> T {
        if self.b_is_current {
            self.buffer_b
        } else {
            self.buffer_a
        }
    }
}

impl<T: Clone> PingPong<T> {
    /// Both buffers start as copies of `initial`.
    pub fn from_initial(initial: T) -> Self {
        Self::new(initial.clone(), initial)
    }
}

// ABOUTME: Navigation module for the his-poster application
// ABOUTME: Owns the current-slide cursor and its clamped movement rules

use crate::errors::{DeckError, Result};
use log::debug;

/// Cursor over a deck of `len` slides. The cursor is always a valid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
}

impl Navigator {
    /// Create a navigator positioned on the first slide.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(DeckError::ValidationError(
                "Cannot navigate an empty deck".to_string(),
            ));
        }
        Ok(Self { current: 0, len })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len
    }

    /// Advance one slide; no-op on the last slide.
    pub fn next(&mut self) -> usize {
        if !self.is_last() {
            self.current += 1;
            debug!("Moved to slide {}", self.current + 1);
        }
        self.current
    }

    /// Go back one slide; no-op on the first slide.
    pub fn previous(&mut self) -> usize {
        if !self.is_first() {
            self.current -= 1;
            debug!("Moved to slide {}", self.current + 1);
        }
        self.current
    }

    /// Jump directly to `index`. Out-of-range indices leave the cursor untouched.
    pub fn jump_to(&mut self, index: usize) -> Result<usize> {
        if index >= self.len {
            return Err(DeckError::ValidationError(format!(
                "Slide index {} out of range (deck has {} slides)",
                index, self.len
            )));
        }
        self.current = index;
        Ok(self.current)
    }
}

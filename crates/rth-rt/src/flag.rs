// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lifecycle flags shared between the owner and the worker thread.
//!
//! AtomicBool with release stores and acquire loads. No lock guards the set
//! of flags as a whole; each flag is individually visible.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct Flag {
    value: AtomicBool,
}

impl Flag {
    pub const fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    pub fn set(&self) {
        self.value.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.value.store(false, Ordering::Release);
    }

    /// Set the flag, returning `true` only for the call that flipped it.
    pub fn raise(&self) -> bool {
        !self.value.swap(true, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_flips_once() {
        let f = Flag::new(false);
        assert!(f.raise());
        assert!(!f.raise());
        assert!(f.get());
    }

    #[test]
    fn set_and_clear() {
        let f = Flag::default();
        f.set();
        assert!(f.get());
        f.clear();
        assert!(!f.get());
    }
}

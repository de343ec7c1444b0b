// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Gate: a binary, non-counting permit.
//!
//! Used twice by a worker: as the start barrier for `OnSignal` workers and as
//! the single-slot signal the owner uses to request the next iteration.
//! `leave` calls are not counted. Two `leave`s before anyone claims the
//! permit collapse into one.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Binary permit with claim/release/wait.
#[derive(Debug)]
pub struct Gate {
    open: Mutex<bool>,
    cvar: Condvar,
}

impl Gate {
    /// Create a gate, initially open (permit available) or closed.
    pub fn new(open: bool) -> Self {
        Self {
            open: Mutex::new(open),
            cvar: Condvar::new(),
        }
    }

    pub fn closed() -> Self {
        Self::new(false)
    }

    pub fn open() -> Self {
        Self::new(true)
    }

    /// Block until the permit is available, then take it.
    pub fn enter(&self) {
        let mut open = self.lock();
        while !*open {
            open = self
                .cvar
                .wait(open)
                .unwrap_or_else(|e| e.into_inner());
        }
        *open = false;
    }

    /// Take the permit if it is available right now.
    pub fn try_enter(&self) -> bool {
        let mut open = self.lock();
        if *open {
            *open = false;
            true
        } else {
            false
        }
    }

    /// Make the permit available. Idempotent.
    pub fn leave(&self) {
        let mut open = self.lock();
        if *open {
            return;
        }
        *open = true;
        drop(open);
        // Waiters in `wait` never claim, so a single notify could land on
        // one of them and strand an `enter`. Only one `enter` can win.
        self.cvar.notify_all();
    }

    /// Block until the permit is available without taking it.
    pub fn wait(&self) {
        let mut open = self.lock();
        while !*open {
            open = self
                .cvar
                .wait(open)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Like [`Gate::wait`], giving up after `timeout`. Returns whether the
    /// gate was observed open.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut open = self.lock();
        while !*open {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .cvar
                .wait_timeout(open, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            open = guard;
        }
        true
    }

    /// Snapshot of the permit state.
    pub fn is_open(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A panic while holding this lock cannot leave the bool torn.
        self.open.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn enter_consumes_permit() {
        let g = Gate::open();
        g.enter();
        assert!(!g.is_open());
        assert!(!g.try_enter());
    }

    #[test]
    fn leave_is_idempotent() {
        let g = Gate::closed();
        g.leave();
        g.leave();
        assert!(g.try_enter());
        // The second leave did not queue another permit.
        assert!(!g.try_enter());
    }

    #[test]
    fn wait_does_not_claim() {
        let g = Gate::open();
        g.wait();
        assert!(g.is_open());
    }

    #[test]
    fn wait_timeout_expires_on_closed_gate() {
        let g = Gate::closed();
        assert!(!g.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn enter_blocks_until_leave() {
        let g = Arc::new(Gate::closed());
        let entered = Arc::new(AtomicBool::new(false));
        let h = {
            let g = g.clone();
            let entered = entered.clone();
            thread::spawn(move || {
                g.enter();
                entered.store(true, Ordering::Release);
            })
        };
        thread::sleep(Duration::from_millis(20));
        assert!(!entered.load(Ordering::Acquire));
        g.leave();
        h.join().unwrap();
        assert!(entered.load(Ordering::Acquire));
        assert!(!g.is_open());
    }

    #[test]
    fn waiter_does_not_strand_enterer() {
        let g = Arc::new(Gate::closed());
        let waiter = {
            let g = g.clone();
            thread::spawn(move || g.wait())
        };
        let enterer = {
            let g = g.clone();
            thread::spawn(move || g.enter())
        };
        thread::sleep(Duration::from_millis(20));
        g.leave();
        waiter.join().unwrap();
        enterer.join().unwrap();
        assert!(!g.is_open());
    }

    #[test]
    fn only_one_enter_wins() {
        let g = Arc::new(Gate::closed());
        let mut handles = vec![];
        for _ in 0..4 {
            let g = g.clone();
            handles.push(thread::spawn(move || g.wait_timeout(Duration::ZERO) && g.try_enter()));
        }
        g.leave();
        let mut claimed = 0;
        for h in handles {
            if h.join().unwrap() {
                claimed += 1;
            }
        }
        claimed += g.try_enter() as usize;
        assert_eq!(claimed, 1);
    }
}

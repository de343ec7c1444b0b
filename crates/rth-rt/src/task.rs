// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Start policies, task return values and exit statuses.

use std::fmt;
use std::time::Duration;

/// What the launcher does before the first iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPolicy {
    /// Run the first iteration right away.
    #[default]
    Immediate,
    /// Sleep, then run the first iteration without waiting for a signal.
    After(Duration),
    /// Park on the gate until the owner calls `start(true)`.
    OnSignal,
}

impl StartPolicy {
    /// Map a signed delay selector in seconds: zero runs immediately,
    /// positive sleeps that many seconds, negative waits for `start`.
    pub fn from_delay(secs: i32) -> Self {
        match secs {
            0 => StartPolicy::Immediate,
            s if s > 0 => StartPolicy::After(Duration::from_secs(s as u64)),
            _ => StartPolicy::OnSignal,
        }
    }
}

/// Returned by the task after each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Park until the owner grants the next iteration.
    Continue,
    /// Leave the loop. The thread exits and stays joinable.
    Stop,
    /// The task has taken over the worker. The launcher exits without
    /// touching worker state again.
    Detach,
}

impl From<i32> for Step {
    fn from(code: i32) -> Self {
        match code {
            c if c > 0 => Step::Continue,
            0 => Step::Stop,
            _ => Step::Detach,
        }
    }
}

impl From<bool> for Step {
    fn from(again: bool) -> Self {
        if again {
            Step::Continue
        } else {
            Step::Stop
        }
    }
}

/// How the worker thread ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    /// The task returned `Step::Stop`.
    Stopped,
    /// The task returned `Step::Detach`.
    Detached,
    /// The task panicked; carries the panic message.
    Panicked(String),
    /// The thread was abandoned by `kill_forced`.
    Killed,
    /// The owning handle was dropped while the launcher was parked.
    Shutdown,
}

impl ExitStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, ExitStatus::Stopped | ExitStatus::Detached)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Stopped => write!(f, "stopped"),
            ExitStatus::Detached => write!(f, "detached"),
            ExitStatus::Panicked(msg) => write!(f, "panicked: {}", msg),
            ExitStatus::Killed => write!(f, "killed"),
            ExitStatus::Shutdown => write!(f, "shut down"),
        }
    }
}

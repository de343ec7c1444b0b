// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Worker error types.

use std::fmt;

use thiserror::Error;

/// Platform features a worker may or may not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Renaming a thread after it was spawned.
    Naming,
    /// Cooperative pause checkpoint inside the task.
    PauseCheckpoint,
    /// Sleeping before the first iteration (`StartPolicy::After`).
    DelayedStart,
    /// Native thread identifiers.
    Identity,
    /// OS-level termination of a running thread. Never available: a worker
    /// that ignores its break is abandoned instead.
    ForcedTermination,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Naming,
        Capability::PauseCheckpoint,
        Capability::DelayedStart,
        Capability::Identity,
        Capability::ForcedTermination,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Naming => "thread naming",
            Capability::PauseCheckpoint => "pause checkpoint",
            Capability::DelayedStart => "delayed start",
            Capability::Identity => "thread identity",
            Capability::ForcedTermination => "forced termination",
        };
        f.write_str(s)
    }
}

/// Errors from worker control operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadError {
    /// The native thread could not be created. No worker exists.
    #[error("failed to spawn worker thread: {0}")]
    SpawnFailure(String),
    /// The handle was freed, or the thread is gone and cannot be joined.
    #[error("worker handle is not joinable")]
    NotJoinable,
    #[error("{0} is not supported on this platform")]
    Unsupported(Capability),
    /// `free` was called before the native thread exited.
    #[error("worker thread is still running")]
    StillRunning,
    #[error("invalid thread name `{0}`")]
    InvalidName(String),
    /// A native call returned a nonzero code.
    #[error("native thread call failed with code {0}")]
    Os(i32),
}

pub type Result<T> = std::result::Result<T, ThreadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_capability() {
        let e = ThreadError::Unsupported(Capability::Naming);
        assert_eq!(e.to_string(), "thread naming is not supported on this platform");
    }

    #[test]
    fn spawn_failure_carries_reason() {
        let e = ThreadError::SpawnFailure("out of threads".into());
        assert!(e.to_string().contains("out of threads"));
    }
}

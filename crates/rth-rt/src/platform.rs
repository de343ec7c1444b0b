// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Native thread capabilities: identity, naming, delayed start.
//!
//! Unix goes through `libc`. Everything else reports
//! `ThreadError::Unsupported` instead of compiling the call out silently.

use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::{Capability, Result, ThreadError};

/// Identifies a native thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadIdentity {
    Native(u64),
    /// The platform cannot report native thread ids.
    Unsupported,
}

impl ThreadIdentity {
    pub fn is_supported(&self) -> bool {
        matches!(self, ThreadIdentity::Native(_))
    }
}

/// Longest name `pthread_setname_np` accepts, excluding the NUL.
#[cfg(target_os = "linux")]
pub const MAX_NAME_LEN: usize = 15;

/// Whether `cap` is available on this build target.
pub fn supports(cap: Capability) -> bool {
    match cap {
        Capability::Naming => cfg!(target_os = "linux"),
        Capability::PauseCheckpoint => true,
        Capability::DelayedStart => cfg!(not(target_arch = "wasm32")),
        Capability::Identity => cfg!(unix),
        // Cancelling a Rust thread unwinds through `catch_unwind` and aborts.
        Capability::ForcedTermination => false,
    }
}

/// Identity of the calling thread.
pub fn current() -> ThreadIdentity {
    #[cfg(unix)]
    {
        // SAFETY: pthread_self has no preconditions.
        let tid = unsafe { libc::pthread_self() };
        ThreadIdentity::Native(tid as u64)
    }
    #[cfg(not(unix))]
    {
        ThreadIdentity::Unsupported
    }
}

/// Identity of the thread behind `handle`.
pub(crate) fn identity_of<T>(handle: &JoinHandle<T>) -> ThreadIdentity {
    #[cfg(unix)]
    {
        use std::os::unix::thread::JoinHandleExt;
        ThreadIdentity::Native(handle.as_pthread_t() as u64)
    }
    #[cfg(not(unix))]
    {
        let _ = handle;
        ThreadIdentity::Unsupported
    }
}

/// Reject names no platform could carry.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('\0') {
        return Err(ThreadError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Rename a running thread.
pub(crate) fn set_name(id: ThreadIdentity, name: &str) -> Result<()> {
    validate_name(name)?;
    #[cfg(target_os = "linux")]
    {
        let ThreadIdentity::Native(raw) = id else {
            return Err(ThreadError::Unsupported(Capability::Naming));
        };
        if name.len() > MAX_NAME_LEN {
            return Err(ThreadError::InvalidName(name.to_string()));
        }
        let cname = std::ffi::CString::new(name)
            .map_err(|_| ThreadError::InvalidName(name.to_string()))?;
        // SAFETY: `raw` came from a JoinHandle that the caller still owns,
        // so the pthread_t has not been recycled.
        let rc = unsafe { libc::pthread_setname_np(raw as libc::pthread_t, cname.as_ptr()) };
        if rc != 0 {
            return Err(ThreadError::Os(rc));
        }
        Ok(())
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = id;
        Err(ThreadError::Unsupported(Capability::Naming))
    }
}

/// Sleep before the first iteration. Returns `false` where the target
/// cannot block a thread on a timer.
pub(crate) fn delay(duration: Duration) -> bool {
    if supports(Capability::DelayedStart) {
        std::thread::sleep(duration);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_stable_within_a_thread() {
        assert_eq!(current(), current());
    }

    #[cfg(unix)]
    #[test]
    fn current_differs_across_threads() {
        let here = current();
        let there = std::thread::spawn(current).join().unwrap();
        assert!(here.is_supported());
        assert_ne!(here, there);
    }

    #[cfg(unix)]
    #[test]
    fn identity_of_matches_current_inside_thread() {
        let (tx, rx) = std::sync::mpsc::channel();
        let h = std::thread::spawn(move || {
            tx.send(current()).unwrap();
        });
        let expected = identity_of(&h);
        assert_eq!(rx.recv().unwrap(), expected);
        h.join().unwrap();
    }

    #[test]
    fn empty_and_nul_names_rejected() {
        assert!(matches!(validate_name(""), Err(ThreadError::InvalidName(_))));
        assert!(matches!(validate_name("a\0b"), Err(ThreadError::InvalidName(_))));
        assert!(validate_name("rth-worker").is_ok());
    }

    #[test]
    fn unsupported_identity_cannot_be_renamed() {
        assert!(set_name(ThreadIdentity::Unsupported, "x").is_err());
    }
}

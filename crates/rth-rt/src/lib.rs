// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Controllable worker threads.
//!
//! A [`Worker`] owns exactly one OS thread and runs a task function on it
//! repeatedly. The owner controls it without touching native primitives:
//!
//! - start policies: immediate, delayed, or parked until `start(true)`
//! - `start`/`set_user_data` grant the next iteration through a single-slot
//!   [`Gate`]; grants are not counted, back-to-back grants collapse
//! - `pause` plus the task-side `try_pause` checkpoint
//! - `request_break` for cooperative cancellation, `kill` to break and join
//! - `kill_forced` to abandon a task that ignores the break, as a last resort
//!
//! Not a queue or a pool: one thread, one pending iteration per worker.

pub mod error;
pub mod flag;
pub mod gate;
pub mod platform;
pub mod task;
pub mod worker;

pub use error::{Capability, Result, ThreadError};
pub use gate::Gate;
pub use platform::{current, supports, ThreadIdentity};
pub use task::{ExitStatus, StartPolicy, Step};
pub use worker::{TaskContext, Worker, WorkerBuilder};

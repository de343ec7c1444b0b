// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Controllable worker thread.
//!
//! A `Worker` owns one OS thread that runs a task function repeatedly. The
//! owner drives it with `start`/`pause`/`request_break`/`kill` and reaps it
//! with `wait` and `free`.
//!
//! The launcher loop on the worker thread:
//!
//! 1. raise `ready`, then apply the start policy;
//! 2. claim the gate permit (skipped for the first iteration unless the
//!    policy is `OnSignal`, whose barrier already consumed a permit);
//! 3. run the task with `running` raised;
//! 4. `Continue` parks at 2 again, `Stop` exits, `Detach` exits without
//!    further bookkeeping.
//!
//! The gate guards the transition between iterations, not the iteration
//! itself. Control calls never block on a running task.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, ThreadError};
use crate::flag::Flag;
use crate::gate::Gate;
use crate::platform::{self, ThreadIdentity};
use crate::task::{ExitStatus, StartPolicy, Step};

fn relock<G>(r: std::sync::LockResult<G>) -> G {
    r.unwrap_or_else(|e| e.into_inner())
}

/// Write-once exit status with a blocking reader.
#[derive(Debug, Default)]
struct ExitSlot {
    status: Mutex<Option<ExitStatus>>,
    cvar: Condvar,
}

impl ExitSlot {
    /// Record `status` unless one is already recorded.
    fn set(&self, status: ExitStatus) -> bool {
        let mut slot = relock(self.status.lock());
        if slot.is_some() {
            return false;
        }
        *slot = Some(status);
        drop(slot);
        self.cvar.notify_all();
        true
    }

    fn get(&self) -> Option<ExitStatus> {
        relock(self.status.lock()).clone()
    }

    fn wait(&self) -> ExitStatus {
        let mut slot = relock(self.status.lock());
        loop {
            if let Some(status) = slot.as_ref() {
                return status.clone();
            }
            slot = relock(self.cvar.wait(slot));
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + timeout;
        let mut slot = relock(self.status.lock());
        loop {
            if let Some(status) = slot.as_ref() {
                return Some(status.clone());
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            slot = relock(self.cvar.wait_timeout(slot, deadline - now)).0;
        }
    }
}

/// State shared by the owner handle and the launcher.
struct Shared<T> {
    gate: Gate,
    /// Open while not paused.
    pause: Gate,
    ready: Flag,
    running: Flag,
    breaked: Flag,
    /// The owner handle was dropped.
    shutdown: Flag,
    exit: ExitSlot,
    user: Mutex<Arc<T>>,
    name: Mutex<Option<String>>,
    iterations: AtomicU64,
    /// Stalls the launcher before it raises `ready`.
    #[cfg(test)]
    startup_delay: Option<Duration>,
}

impl<T> Shared<T> {
    fn user_data(&self) -> Arc<T> {
        relock(self.user.lock()).clone()
    }

    fn name(&self) -> Option<String> {
        relock(self.name.lock()).clone()
    }

    fn label(&self) -> String {
        self.name().unwrap_or_else(|| "<unnamed>".to_string())
    }
}

/// What the task sees during one iteration.
pub struct TaskContext<'a, T> {
    shared: &'a Shared<T>,
    user: Arc<T>,
    iteration: u64,
}

impl<'a, T> TaskContext<'a, T> {
    /// User data as it was when this iteration began.
    pub fn user_data(&self) -> &Arc<T> {
        &self.user
    }

    /// Whether the owner asked the task to wind down.
    pub fn is_break_requested(&self) -> bool {
        self.shared.breaked.get()
    }

    /// Pause checkpoint. Blocks while the owner holds the pause lock.
    pub fn try_pause(&self) -> bool {
        self.shared.pause.wait();
        true
    }

    /// 1-based iteration counter.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn name(&self) -> Option<String> {
        self.shared.name()
    }
}

/// Worker configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkerBuilder {
    name: Option<String>,
    stack_size: Option<usize>,
    policy: StartPolicy,
    #[cfg(test)]
    startup_delay: Option<Duration>,
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread name, applied when the thread is spawned.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn policy(mut self, policy: StartPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[cfg(test)]
    fn startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = Some(delay);
        self
    }

    /// Signed delay selector in seconds, see [`StartPolicy::from_delay`].
    pub fn delay(self, secs: i32) -> Self {
        self.policy(StartPolicy::from_delay(secs))
    }

    /// Spawn the worker thread. The launcher starts right away and applies
    /// the configured start policy.
    pub fn spawn<T, F>(self, task: F, user_data: impl Into<Arc<T>>) -> Result<Worker<T>>
    where
        T: Send + Sync + 'static,
        F: FnMut(&TaskContext<'_, T>) -> Step + Send + 'static,
    {
        let name = match self.name {
            Some(name) => match platform::validate_name(&name) {
                Ok(()) => Some(name),
                Err(e) => {
                    tracing::warn!(error = %e, "spawning worker without a name");
                    None
                }
            },
            None => None,
        };

        let shared = Arc::new(Shared {
            gate: Gate::closed(),
            pause: Gate::open(),
            ready: Flag::new(false),
            running: Flag::new(false),
            breaked: Flag::new(false),
            shutdown: Flag::new(false),
            exit: ExitSlot::default(),
            user: Mutex::new(user_data.into()),
            name: Mutex::new(name.clone()),
            iterations: AtomicU64::new(0),
            #[cfg(test)]
            startup_delay: self.startup_delay,
        });

        let mut builder = thread::Builder::new();
        if let Some(name) = name {
            builder = builder.name(name);
        }
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let policy = self.policy;
        let launcher_shared = shared.clone();
        let handle = builder
            .spawn(move || launch(launcher_shared, policy, task))
            .map_err(|e| ThreadError::SpawnFailure(e.to_string()))?;

        let identity = platform::identity_of(&handle);
        tracing::debug!(worker = %shared.label(), ?policy, "worker spawned");

        Ok(Worker {
            shared,
            handle: Mutex::new(Some(handle)),
            identity,
            freed: Flag::new(false),
        })
    }
}

/// Launcher body: runs on the worker thread.
fn launch<T, F>(shared: Arc<Shared<T>>, policy: StartPolicy, mut task: F)
where
    F: FnMut(&TaskContext<'_, T>) -> Step,
{
    let status = run_loop(&shared, policy, &mut task);
    tracing::debug!(worker = %shared.label(), %status, "worker exited");
    shared.exit.set(status);
}

fn run_loop<T, F>(shared: &Shared<T>, policy: StartPolicy, task: &mut F) -> ExitStatus
where
    F: FnMut(&TaskContext<'_, T>) -> Step,
{
    #[cfg(test)]
    if let Some(delay) = shared.startup_delay {
        thread::sleep(delay);
    }

    // Before any delay, so `start` never spins past a live thread.
    shared.ready.set();

    match policy {
        StartPolicy::Immediate => {}
        StartPolicy::After(delay) => {
            if !platform::delay(delay) {
                tracing::warn!(
                    worker = %shared.label(),
                    "delayed start unsupported; running immediately"
                );
            }
        }
        StartPolicy::OnSignal => shared.gate.wait(),
    }

    let mut needs_permit = policy == StartPolicy::OnSignal;
    loop {
        if needs_permit {
            shared.gate.enter();
        }
        needs_permit = true;

        if shared.shutdown.get() {
            return ExitStatus::Shutdown;
        }

        let user = shared.user_data();
        // `running` is raised before the counter moves, so an owner that
        // sees the new count also sees the flag.
        shared.running.set();
        let iteration = shared.iterations.fetch_add(1, Ordering::AcqRel) + 1;
        let ctx = TaskContext {
            shared,
            user,
            iteration,
        };
        tracing::trace!(worker = %shared.label(), iteration, "iteration begins");

        let step = match panic::catch_unwind(AssertUnwindSafe(|| task(&ctx))) {
            Ok(step) => step,
            Err(payload) => {
                shared.running.clear();
                return ExitStatus::Panicked(panic_message(payload));
            }
        };

        match step {
            // The task owns the worker now; leave `running` alone.
            Step::Detach => return ExitStatus::Detached,
            Step::Stop => {
                shared.running.clear();
                return ExitStatus::Stopped;
            }
            Step::Continue => shared.running.clear(),
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Owner handle to a worker thread.
pub struct Worker<T> {
    shared: Arc<Shared<T>>,
    /// `None` once joined or abandoned.
    handle: Mutex<Option<JoinHandle<()>>>,
    identity: ThreadIdentity,
    freed: Flag,
}

impl<T: Send + Sync + 'static> Worker<T> {
    /// Spawn an unnamed worker with default stack size.
    pub fn new<F>(task: F, user_data: impl Into<Arc<T>>, policy: StartPolicy) -> Result<Self>
    where
        F: FnMut(&TaskContext<'_, T>) -> Step + Send + 'static,
    {
        WorkerBuilder::new().policy(policy).spawn(task, user_data)
    }
}

impl<T> Worker<T> {
    pub fn builder() -> WorkerBuilder {
        WorkerBuilder::new()
    }

    fn check(&self) -> Result<()> {
        if self.freed.get() {
            Err(ThreadError::NotJoinable)
        } else {
            Ok(())
        }
    }

    fn handle(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        relock(self.handle.lock())
    }

    /// Join the thread if it is still attached. Only called once the exit
    /// slot is filled, so the join does not block for long.
    fn reap(&self) {
        if let Some(handle) = self.handle().take() {
            if handle.join().is_err() {
                tracing::warn!(worker = %self.shared.label(), "launcher panicked outside the task");
            }
        }
    }

    /// Replace the user data and grant one iteration.
    pub fn set_user_data(&self, data: impl Into<Arc<T>>) -> Result<()> {
        self.check()?;
        *relock(self.shared.user.lock()) = data.into();
        self.shared.gate.leave();
        Ok(())
    }

    /// Current user data.
    pub fn user_data(&self) -> Result<Arc<T>> {
        self.check()?;
        Ok(self.shared.user_data())
    }

    /// `true`: wait until the thread is alive, then grant one iteration.
    /// This releases an `OnSignal` barrier and resumes a parked worker.
    ///
    /// `false`: revoke a granted iteration that has not begun, so the worker
    /// parks after the current one. Never blocks.
    pub fn start(&self, enable: bool) -> Result<()> {
        self.check()?;
        if enable {
            let mut spins = 0u32;
            while !self.shared.ready.get() {
                if spins < 64 {
                    std::hint::spin_loop();
                    spins += 1;
                } else {
                    thread::yield_now();
                }
            }
            if self.shared.exit.get().is_none() {
                self.shared.running.set();
            }
            self.shared.gate.leave();
            tracing::trace!(worker = %self.shared.label(), "start granted");
        } else if self.shared.running.get() {
            let revoked = self.shared.gate.try_enter();
            self.shared.running.clear();
            tracing::trace!(worker = %self.shared.label(), revoked, "start revoked");
        }
        Ok(())
    }

    /// Hold (`true`) or release (`false`) the pause lock. Only takes effect
    /// when the task calls [`TaskContext::try_pause`].
    pub fn pause(&self, enable: bool) -> Result<()> {
        self.check()?;
        if enable {
            self.shared.pause.try_enter();
        } else {
            self.shared.pause.leave();
        }
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        !self.shared.pause.is_open()
    }

    /// Set the break flag. Advisory; the task decides when to stop.
    pub fn request_break(&self) -> Result<()> {
        self.check()?;
        if self.shared.breaked.raise() {
            tracing::debug!(worker = %self.shared.label(), "break requested");
        }
        Ok(())
    }

    /// Request a break, wake the worker and join it.
    ///
    /// A parked worker is granted one more iteration so the task can observe
    /// the break flag. A task that ignores the flag and keeps returning
    /// `Continue` makes this block forever; see [`Worker::kill_forced`].
    pub fn kill(&self) -> Result<ExitStatus> {
        self.check()?;
        self.shared.breaked.set();
        self.request_break()?;
        self.shared.pause.leave();
        self.shared.gate.leave();
        self.wait()
    }

    /// Request a break, wait up to `grace`, then abandon the thread.
    /// `wait` reports `Killed` afterwards without blocking.
    ///
    /// Last resort, not a shutdown path. Nothing stops the task: the
    /// abandoned thread keeps running detached until its task returns, may
    /// keep mutating the user data and holding locks, and leaks whatever it
    /// owns if it never returns. The OS is never asked to cancel the thread,
    /// since a forced unwind through Rust frames aborts the process.
    pub fn kill_forced(&self, grace: Duration) -> Result<ExitStatus> {
        self.check()?;
        self.shared.breaked.set();
        self.shared.pause.leave();
        self.shared.gate.leave();
        if let Some(status) = self.wait_timeout(grace)? {
            return Ok(status);
        }

        tracing::warn!(
            worker = %self.shared.label(),
            ?grace,
            "worker ignored break; abandoning thread"
        );
        // Dropping the handle detaches the thread. Never join it.
        drop(self.handle().take());

        self.shared.running.clear();
        self.shared.exit.set(ExitStatus::Killed);
        Ok(self.shared.exit.wait())
    }

    /// Block until the thread exits. Repeated calls return the same status.
    pub fn wait(&self) -> Result<ExitStatus> {
        self.check()?;
        let status = self.shared.exit.wait();
        self.reap();
        self.shared.running.clear();
        Ok(status)
    }

    /// [`Worker::wait`] with a bound. `Ok(None)` if the thread is still
    /// running after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<ExitStatus>> {
        self.check()?;
        match self.shared.exit.wait_timeout(timeout) {
            Some(status) => {
                self.reap();
                self.shared.running.clear();
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }

    /// Last observed `running` flag. Never blocks.
    pub fn wait_async(&self) -> bool {
        !self.freed.get() && self.shared.running.get()
    }

    /// Invalidate the handle. The thread must have exited; call `wait`
    /// first. A second call fails with `NotJoinable`.
    pub fn free(&self) -> Result<()> {
        self.check()?;
        if self.shared.exit.get().is_none() {
            return Err(ThreadError::StillRunning);
        }
        self.reap();
        if !self.freed.raise() {
            return Err(ThreadError::NotJoinable);
        }
        tracing::debug!(worker = %self.shared.label(), "worker freed");
        Ok(())
    }

    /// [`Worker::kill_forced`] followed by [`Worker::free`]. Same hazards.
    pub fn kill_free(&self, grace: Duration) -> Result<ExitStatus> {
        let status = self.kill_forced(grace)?;
        self.free()?;
        Ok(status)
    }

    /// Rename the thread. The label is kept even when the platform cannot
    /// rename the native thread; the error reports that.
    pub fn set_name(&self, name: &str) -> Result<()> {
        self.check()?;
        platform::validate_name(name)?;
        // Hold the handle so the thread cannot be joined mid-call.
        let handle = self.handle();
        if handle.is_none() {
            return Err(ThreadError::NotJoinable);
        }
        let result = platform::set_name(self.identity, name);
        if matches!(result, Ok(()) | Err(ThreadError::Unsupported(_))) {
            *relock(self.shared.name.lock()) = Some(name.to_string());
        }
        if let Err(e) = &result {
            tracing::warn!(worker = name, error = %e, "could not rename native thread");
        }
        result
    }

    pub fn name(&self) -> Option<String> {
        self.shared.name()
    }

    /// Native identity of the worker thread.
    pub fn identity(&self) -> ThreadIdentity {
        self.identity
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.get()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    pub fn is_break_requested(&self) -> bool {
        self.shared.breaked.get()
    }

    /// Whether the launcher has exited (or the thread was abandoned).
    pub fn is_finished(&self) -> bool {
        self.shared.exit.get().is_some()
    }

    pub fn is_freed(&self) -> bool {
        self.freed.get()
    }

    /// Number of iterations begun so far.
    pub fn iterations(&self) -> u64 {
        self.shared.iterations.load(Ordering::Acquire)
    }
}

impl<T> std::fmt::Debug for Worker<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.shared.name())
            .field("identity", &self.identity)
            .field("ready", &self.shared.ready.get())
            .field("running", &self.shared.running.get())
            .field("breaked", &self.shared.breaked.get())
            .field("exit", &self.shared.exit.get())
            .finish()
    }
}

impl<T> Drop for Worker<T> {
    fn drop(&mut self) {
        if self.shared.exit.get().is_some() {
            return;
        }
        // Let a parked launcher exit instead of blocking forever on a gate
        // nobody will open. A task stuck inside an iteration keeps running
        // on the detached thread until it returns.
        self.shared.shutdown.set();
        self.shared.breaked.set();
        self.shared.pause.leave();
        self.shared.gate.leave();
        tracing::debug!(worker = %self.shared.label(), "worker dropped while live; detaching");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    const LONG: Duration = Duration::from_secs(5);

    #[test]
    fn exit_slot_first_status_wins() {
        let slot = ExitSlot::default();
        assert!(slot.set(ExitStatus::Killed));
        assert!(!slot.set(ExitStatus::Stopped));
        assert_eq!(slot.wait(), ExitStatus::Killed);
    }

    #[test]
    fn exit_slot_times_out_when_empty() {
        let slot = ExitSlot::default();
        assert_eq!(slot.wait_timeout(Duration::from_millis(5)), None);
    }

    #[test]
    fn immediate_worker_runs_without_start() {
        let count = Arc::new(AtomicUsize::new(0));
        let w = Worker::new(
            |ctx: &TaskContext<'_, AtomicUsize>| {
                ctx.user_data().fetch_add(1, Ordering::SeqCst);
                Step::Stop
            },
            count.clone(),
            StartPolicy::Immediate,
        )
        .unwrap();
        assert_eq!(w.wait().unwrap(), ExitStatus::Stopped);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!w.is_running());
    }

    #[test]
    fn panic_is_reported_as_exit_status() {
        let w = Worker::new(
            |_: &TaskContext<'_, ()>| -> Step { panic!("boom") },
            (),
            StartPolicy::Immediate,
        )
        .unwrap();
        match w.wait().unwrap() {
            ExitStatus::Panicked(msg) => assert!(msg.contains("boom")),
            other => panic!("expected Panicked, got {:?}", other),
        }
    }

    #[test]
    fn detach_leaves_running_untouched() {
        let w = Worker::new(
            |_: &TaskContext<'_, ()>| Step::Detach,
            (),
            StartPolicy::Immediate,
        )
        .unwrap();
        assert_eq!(w.shared.exit.wait(), ExitStatus::Detached);
        // The launcher never cleared the flag it raised.
        assert!(w.shared.running.get());
        assert_eq!(w.wait().unwrap(), ExitStatus::Detached);
        assert!(!w.is_running());
    }

    #[test]
    fn set_user_data_grants_next_iteration_with_new_data() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let w = {
            let seen = seen.clone();
            Worker::new(
                move |ctx: &TaskContext<'_, u32>| {
                    let v = **ctx.user_data();
                    seen.lock().unwrap().push(v);
                    if v == 3 {
                        Step::Stop
                    } else {
                        Step::Continue
                    }
                },
                1u32,
                StartPolicy::Immediate,
            )
            .unwrap()
        };
        while w.iterations() < 1 || w.is_running() {
            thread::sleep(Duration::from_millis(1));
        }
        w.set_user_data(2u32).unwrap();
        while w.iterations() < 2 || w.is_running() {
            thread::sleep(Duration::from_millis(1));
        }
        w.set_user_data(3u32).unwrap();
        assert_eq!(w.wait_timeout(LONG).unwrap(), Some(ExitStatus::Stopped));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn start_false_revokes_pending_iteration() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let w = Worker::new(
            move |ctx: &TaskContext<'_, ()>| {
                if ctx.iteration() == 1 {
                    release_rx.lock().unwrap().recv().unwrap();
                }
                Step::Continue
            },
            (),
            StartPolicy::Immediate,
        )
        .unwrap();
        while w.iterations() < 1 {
            thread::sleep(Duration::from_millis(1));
        }
        // Grant while the first iteration is held, then take it back.
        w.start(true).unwrap();
        assert!(w.shared.gate.is_open());
        w.start(false).unwrap();
        assert!(!w.shared.gate.is_open());
        release_tx.send(()).unwrap();

        thread::sleep(Duration::from_millis(30));
        assert_eq!(w.iterations(), 1);
        assert!(!w.is_running());
    }

    #[test]
    fn start_spins_until_slow_launcher_is_ready() {
        let delay = Duration::from_millis(60);
        let w = Arc::new(
            Worker::<()>::builder()
                .delay(-1)
                .startup_delay(delay)
                .spawn(|_: &TaskContext<'_, ()>| Step::Stop, ())
                .unwrap(),
        );
        assert!(!w.is_ready());

        let began = Instant::now();
        let starter = {
            let w = w.clone();
            thread::spawn(move || {
                w.start(true).unwrap();
                w.is_ready()
            })
        };
        assert!(starter.join().unwrap());
        assert!(began.elapsed() >= delay / 2);
        assert_eq!(w.wait_timeout(LONG).unwrap(), Some(ExitStatus::Stopped));
        assert_eq!(w.iterations(), 1);
    }

    #[test]
    fn free_rejects_live_worker() {
        let w = Worker::new(
            |_: &TaskContext<'_, ()>| Step::Stop,
            (),
            StartPolicy::OnSignal,
        )
        .unwrap();
        assert_eq!(w.free(), Err(ThreadError::StillRunning));
        w.start(true).unwrap();
        w.wait().unwrap();
        assert!(w.free().is_ok());
    }

    #[test]
    fn dropping_parked_worker_shuts_it_down() {
        let parked_shared;
        {
            let w = Worker::new(
                |_: &TaskContext<'_, ()>| Step::Continue,
                (),
                StartPolicy::OnSignal,
            )
            .unwrap();
            parked_shared = w.shared.clone();
        }
        assert_eq!(
            parked_shared.exit.wait_timeout(LONG),
            Some(ExitStatus::Shutdown)
        );
    }

    #[test]
    fn builder_names_thread() {
        let (tx, rx) = std::sync::mpsc::channel();
        let w = Worker::<()>::builder()
            .name("rth-named")
            .spawn(
                move |_: &TaskContext<'_, ()>| {
                    tx.send(thread::current().name().map(str::to_string)).unwrap();
                    Step::Stop
                },
                (),
            )
            .unwrap();
        assert_eq!(rx.recv().unwrap().as_deref(), Some("rth-named"));
        assert_eq!(w.name().as_deref(), Some("rth-named"));
        w.wait().unwrap();
    }

    #[test]
    fn invalid_builder_name_is_dropped() {
        let w = Worker::<()>::builder()
            .name("bad\0name")
            .spawn(|_: &TaskContext<'_, ()>| Step::Stop, ())
            .unwrap();
        assert_eq!(w.name(), None);
        assert_eq!(w.wait().unwrap(), ExitStatus::Stopped);
    }
}

// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Subcommands. Each drives a worker through one lifecycle and reports
//! whether it behaved as expected.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rth_line::Completion;
use rth_rt::{Capability, ExitStatus, StartPolicy, Step, TaskContext, ThreadError, Worker};

use crate::output;

/// Options shared by the worker subcommands.
#[derive(Debug, Clone)]
pub struct Options {
    pub interval: Duration,
    pub rounds: usize,
    pub grace: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(25),
            rounds: 3,
            grace: Duration::from_millis(200),
        }
    }
}

fn check(label: &str, ok: bool) -> bool {
    let mark = if ok {
        output::status_pass()
    } else {
        output::status_fail()
    };
    println!("  {} {}", mark, label);
    ok
}

/// Park on the gate, run `rounds` appending iterations, then stop on the
/// next grant.
pub fn scenario(opts: &Options) -> Result<bool, ThreadError> {
    let rounds = opts.rounds;
    let worker = Worker::<Mutex<Vec<u64>>>::builder().name("rth-scenario").delay(-1).spawn(
        move |ctx: &TaskContext<'_, Mutex<Vec<u64>>>| {
            let mut log = ctx.user_data().lock().unwrap_or_else(|e| e.into_inner());
            if log.len() < rounds {
                log.push(ctx.iteration());
                Step::Continue
            } else {
                Step::Stop
            }
        },
        Mutex::new(Vec::new()),
    )?;

    thread::sleep(opts.interval);
    let parked = check("no iteration before start", worker.iterations() == 0);

    for _ in 0..=rounds {
        worker.start(true)?;
        thread::sleep(opts.interval);
    }
    let status = worker.wait()?;
    let appended = worker
        .user_data()?
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .len();
    worker.free()?;

    println!("  counter: {}", output::value(appended));
    println!("  exit:    {}", output::value(&status));
    let counted = check("counter matches rounds", appended == rounds);
    let stopped = check("stopped cleanly", status == ExitStatus::Stopped);
    Ok(parked && counted && stopped)
}

/// Hold the pause lock and watch the task stall at its checkpoint.
pub fn pause(opts: &Options) -> Result<bool, ThreadError> {
    let worker = Worker::new(
        |ctx: &TaskContext<'_, AtomicUsize>| {
            while !ctx.is_break_requested() {
                ctx.user_data().fetch_add(1, Ordering::SeqCst);
                ctx.try_pause();
                thread::sleep(Duration::from_millis(1));
            }
            Step::Stop
        },
        AtomicUsize::new(0),
        StartPolicy::Immediate,
    )?;
    let ticks = worker.user_data()?;

    thread::sleep(opts.interval);
    worker.pause(true)?;
    thread::sleep(opts.interval);
    let held = ticks.load(Ordering::SeqCst);
    thread::sleep(opts.interval * 2);
    let while_paused = ticks.load(Ordering::SeqCst);

    worker.pause(false)?;
    thread::sleep(opts.interval);
    let resumed = ticks.load(Ordering::SeqCst);
    let status = worker.kill()?;

    println!("  ticks: held={} paused={} resumed={}", held, while_paused, resumed);
    let stalled = check("task stalls while paused", while_paused <= held + 1);
    let moved = check("task resumes after release", resumed > while_paused);
    let stopped = check("kill stops cleanly", status == ExitStatus::Stopped);
    Ok(stalled && moved && stopped)
}

/// Cooperative break of a looping task.
pub fn cooperative_break(opts: &Options) -> Result<bool, ThreadError> {
    let worker = Worker::new(
        |ctx: &TaskContext<'_, ()>| {
            while !ctx.is_break_requested() {
                thread::sleep(Duration::from_millis(1));
            }
            Step::Stop
        },
        (),
        StartPolicy::Immediate,
    )?;
    thread::sleep(opts.interval);
    let alive = check("task is running", worker.wait_async());

    let began = Instant::now();
    worker.request_break()?;
    let status = worker.wait()?;
    println!("  joined after {:?}", began.elapsed());
    let stopped = check("break honored", status == ExitStatus::Stopped);
    Ok(alive && stopped)
}

/// Forced kill of a task that ignores the break flag. The thread is
/// abandoned, not cancelled.
pub fn forced_kill(opts: &Options) -> Result<bool, ThreadError> {
    let spinning = Arc::new(AtomicBool::new(false));
    let flag = spinning.clone();
    let worker = Worker::<()>::builder().name("rth-runaway").spawn(
        move |_: &TaskContext<'_, ()>| {
            flag.store(true, Ordering::SeqCst);
            loop {
                thread::sleep(Duration::from_millis(1));
            }
        },
        (),
    )?;
    while !spinning.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(1));
    }

    if !rth_rt::supports(Capability::ForcedTermination) {
        println!("  OS termination unavailable; the thread will be abandoned");
    }
    let began = Instant::now();
    let status = worker.kill_free(opts.grace)?;
    println!("  gave up after {:?}", began.elapsed());
    let killed = check("worker reported killed", status == ExitStatus::Killed);
    let freed = check("handle freed", worker.is_freed());
    Ok(killed && freed)
}

/// Print the capability table.
pub fn caps() {
    println!("{}", output::section_header("Capabilities:"));
    for cap in Capability::ALL {
        let mark = if rth_rt::supports(cap) {
            output::status_pass()
        } else {
            output::status_fail()
        };
        println!("  {} {}", mark, cap);
    }
    match rth_rt::current() {
        rth_rt::ThreadIdentity::Native(id) => println!("  main thread: {}", output::value(id)),
        rth_rt::ThreadIdentity::Unsupported => println!("  main thread: unsupported"),
    }
}

/// Completion candidates matching `prefix`.
pub fn complete(prefix: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let mut completion = Completion::new(limit);
    completion.set_all(candidates);
    completion.matching(prefix).map(str::to_string).collect()
}

/// Longest extension of `prefix` shared by every matching candidate.
pub fn complete_common(prefix: &str, candidates: &[String], limit: usize) -> Option<String> {
    let mut completion = Completion::new(limit);
    completion.set_all(candidates);
    completion.common_prefix(prefix)
}

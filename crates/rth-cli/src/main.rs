// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! rth CLI - drives worker threads through their lifecycle.

mod commands;
mod output;

use std::env;
use std::process;
use std::time::Duration;

use commands::Options;
use tracing_subscriber::EnvFilter;

fn main() {
    output::init();
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let result = match args[1].as_str() {
        "scenario" => commands::scenario(&options(&args[2..])),
        "pause" => commands::pause(&options(&args[2..])),
        "break" => commands::cooperative_break(&options(&args[2..])),
        "kill" => commands::forced_kill(&options(&args[2..])),
        "caps" => {
            commands::caps();
            return;
        }
        "complete" => {
            cmd_complete(&args[2..]);
            return;
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("rth {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        other => {
            eprintln!("{}: unknown command: {}", output::error_label(), other);
            print_usage();
            process::exit(1);
        }
    };

    let what = args[1].as_str();
    match result {
        Ok(true) => println!("{}", output::banner_ok(what)),
        Ok(false) => {
            println!("{}", output::banner_fail(what, "unexpected behavior"));
            process::exit(1);
        }
        Err(e) => {
            println!("{}", output::banner_fail(what, &e.to_string()));
            process::exit(1);
        }
    }
}

/// Log filter comes from `RTH_LOG`, defaulting to warnings only.
fn init_logging() {
    let filter = EnvFilter::try_from_env("RTH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn options(args: &[String]) -> Options {
    parse_options(args).unwrap_or_else(|msg| {
        eprintln!("{}: {}", output::error_label(), msg);
        process::exit(1);
    })
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !matches!(flag, "--interval" | "--rounds" | "--grace") {
            return Err(format!("unknown argument: {}", flag));
        }
        let raw = args
            .get(i + 1)
            .ok_or_else(|| format!("{} needs a value", flag))?;
        let n: u64 = raw
            .parse()
            .map_err(|_| format!("{} expects a number, got `{}`", flag, raw))?;
        match flag {
            "--interval" => opts.interval = Duration::from_millis(n),
            "--rounds" => opts.rounds = n as usize,
            "--grace" => opts.grace = Duration::from_millis(n),
            _ => unreachable!(),
        }
        i += 2;
    }
    Ok(opts)
}

fn cmd_complete(args: &[String]) {
    let mut limit = rth_line::DEFAULT_LIMIT;
    let mut common = false;
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--common" {
            common = true;
            i += 1;
        } else if args[i] == "--limit" {
            match args.get(i + 1).and_then(|s| s.parse().ok()) {
                Some(n) => limit = n,
                None => {
                    eprintln!("{}: --limit expects a number", output::error_label());
                    process::exit(1);
                }
            }
            i += 2;
        } else if args[i].starts_with("--") {
            eprintln!("{}: unknown argument: {}", output::error_label(), args[i]);
            process::exit(1);
        } else {
            rest.push(args[i].clone());
            i += 1;
        }
    }
    let Some((prefix, candidates)) = rest.split_first() else {
        eprintln!("Usage: rth complete <prefix> [candidates...] [--limit N] [--common]");
        process::exit(1);
    };
    if common {
        if let Some(p) = commands::complete_common(prefix, candidates, limit) {
            println!("{}", p);
        }
        return;
    }
    for m in commands::complete(prefix, candidates, limit) {
        println!("{}", m);
    }
}

fn print_usage() {
    println!("{} - controllable worker threads", output::title("rth"));
    println!();
    println!("Usage: rth <command> [options]");
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {}    Park, grant N rounds, stop on the next grant", output::command("scenario"));
    println!("  {}       Stall a task at its pause checkpoint", output::command("pause"));
    println!("  {}       Cooperative break of a looping task", output::command("break"));
    println!("  {}        Abandon a runaway task after a grace period", output::command("kill"));
    println!("  {}        Show platform capabilities", output::command("caps"));
    println!("  {}    Filter completion candidates by prefix", output::command("complete"));
    println!("  {}        Show this help", output::command("help"));
    println!("  {}     Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {} <ms>  Delay between control steps (default 25)", output::arg("--interval"));
    println!("  {} <n>     Appending rounds in `scenario` (default 3)", output::arg("--rounds"));
    println!("  {} <ms>     Grace period before forced kill (default 200)", output::arg("--grace"));
    println!("  {} <n>      Candidate cap for `complete` (default 4096)", output::arg("--limit"));
    println!("  {}        Print only the shared prefix in `complete`", output::arg("--common"));
    println!();
    println!("Logging is controlled by RTH_LOG (e.g. RTH_LOG=debug).");
}

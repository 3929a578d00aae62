//! Tick-count benchmark across element counts.
//!
//! Within a pass the controller needs two ticks per dispatch (pair check +
//! dispatch), and passes sum to ~2n dispatched elements' worth of pairs, so
//! device ticks grow as ~4·n plus a few ticks of per-pass overhead and the
//! host's polling cadence.
//!
//! Usage:
//!   cargo run --bin bench_ticks
//!   cargo run --bin bench_ticks -- --max 65536

use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use riptide_chip::task;
use riptide_driver::SortExecutor;

const DEFAULT_MAX_N: usize = 16384;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let max_n = parse_arg(&args, "--max", DEFAULT_MAX_N);

    println!("Device tick counts, width-1 engine");
    println!("==================================");
    println!(
        "  {:>7}  {:>6}  {:>8}  {:>9}  {:>9}  {:>8}  {:>9}",
        "n", "passes", "merges", "copy-back", "ticks", "ticks/n", "wall µs"
    );

    let executor = SortExecutor::default();
    let mut n = 4;
    while n <= max_n {
        let mut data = pseudo_random(n);
        let t0 = Instant::now();
        let report = executor.sort(&mut data)?;
        let wall_us = t0.elapsed().as_micros();

        assert_eq!(report.merge_tasks, task::merge_task_count(n as u64));
        println!(
            "  {:>7}  {:>6}  {:>8}  {:>9}  {:>9}  {:>8.2}  {:>9}",
            n,
            report.passes,
            report.merge_tasks,
            if report.copy_back { "yes" } else { "no" },
            report.ticks,
            report.ticks as f64 / n as f64,
            wall_us
        );
        n *= 4;
    }

    Ok(())
}

fn pseudo_random(count: usize) -> Vec<u64> {
    let mut state = 0x9e37_79b9_7f4a_7c15_u64;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect()
}

fn parse_arg(args: &[String], flag: &str, default: usize) -> usize {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

//! Engine-width sweep at a fixed element count.
//!
//! The scheduler dispatches at most one task per two ticks, while a width-w
//! engine retires up to w tasks per tick — so past width 1 the controller,
//! not the engine, is the bottleneck and the tick count barely moves. The
//! sweep makes that visible; it is the reason the RT64 ships a serial
//! engine.
//!
//! Usage:
//!   cargo run --bin bench_engine_width
//!   cargo run --bin bench_engine_width -- --n 16384

use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use riptide_driver::{SortConfig, SortExecutor};

const DEFAULT_N: usize = 4096;
const WIDTHS: [usize; 5] = [1, 2, 4, 8, 16];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let n = parse_arg(&args, "--n", DEFAULT_N);

    println!("Engine width sweep, n = {n}");
    println!("===========================");
    println!("  {:>6}  {:>9}  {:>10}  {:>9}", "width", "ticks", "vs w=1", "wall µs");

    let mut baseline = None;
    for width in WIDTHS {
        let cfg = SortConfig { engine_width: width, ..SortConfig::default() };
        let mut data = pseudo_random(n);
        let t0 = Instant::now();
        let report = SortExecutor::new(cfg).sort(&mut data)?;
        let wall_us = t0.elapsed().as_micros();

        let base = *baseline.get_or_insert(report.ticks);
        println!(
            "  {:>6}  {:>9}  {:>9.3}x  {:>9}",
            width,
            report.ticks,
            base as f64 / report.ticks as f64,
            wall_us
        );
    }

    Ok(())
}

fn pseudo_random(count: usize) -> Vec<u64> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
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

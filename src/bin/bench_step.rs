#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::Instant;

use anyhow::{Context, Result, bail};
use color_life::colorlife::{Universe, UniverseConfig};

const USAGE: &str =
    "usage: bench_step [--size N] [--iters N] [--warmup N] [--toroidal] [--serial | --parallel]";

struct BenchArgs {
    size: usize,
    iters: u64,
    warmup: u64,
    toroidal: bool,
    // Modes to time; both unless one is picked on the command line.
    modes: Vec<bool>,
}

fn next_arg<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("{flag} requires a value"))
}

fn parse_args() -> Result<BenchArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut out = BenchArgs {
        size: 1024,
        iters: 50,
        warmup: 3,
        toroidal: false,
        modes: vec![false, true],
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--size" => {
                i += 1;
                out.size = next_arg(&args, i, "--size")?
                    .parse()
                    .context("--size requires a positive integer")?;
            }
            "--iters" => {
                i += 1;
                out.iters = next_arg(&args, i, "--iters")?
                    .parse::<u64>()
                    .context("--iters requires an integer")?
                    .max(1);
            }
            "--warmup" => {
                i += 1;
                out.warmup = next_arg(&args, i, "--warmup")?
                    .parse()
                    .context("--warmup requires an integer")?;
            }
            "--toroidal" => out.toroidal = true,
            "--serial" => out.modes = vec![false],
            "--parallel" => out.modes = vec![true],
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
        i += 1;
    }
    Ok(out)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    for parallel in args.modes.iter().copied() {
        // Same seed for every mode so each run steps identical worlds.
        let config = UniverseConfig::default()
            .size(args.size, args.size)
            .seed(0x5EED)
            .toroidal(args.toroidal)
            .parallel(parallel);
        let mut universe = Universe::with_config(config);
        universe.initialize_random_universe();
        universe.step_n(args.warmup);

        let start = Instant::now();
        universe.step_n(args.iters);
        let total_ms = start.elapsed().as_secs_f64() * 1000.0;

        println!(
            "{} {}x{}: {:.3} ms/step over {} steps, population {}",
            if parallel { "parallel" } else { "serial  " },
            universe.width(),
            universe.height(),
            total_ms / args.iters as f64,
            args.iters,
            universe.population()
        );
    }
    Ok(())
}

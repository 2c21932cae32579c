#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use color_life::colorlife::{self, AUTOSAVE_FILE_NAME, Pattern, Rgb, Universe, UniverseConfig};
use log::info;
use rand::SeedableRng;

const USAGE: &str = "usage: color-life [--width N] [--height N] [--steps N] [--density F] \
[--seed S] [--toroidal] [--pattern NAME] [--load PATH] [--save PATH] [--autosave] \
[--report-every N]";

const DEFAULT_GRID_LINE_COLOR: Rgb = Rgb::new(128, 128, 128);
const DEFAULT_BACKGROUND_COLOR: Rgb = Rgb::WHITE;
const PATTERN_COLOR: Rgb = Rgb::new(0, 0, 0);

struct MainArgs {
    config: UniverseConfig,
    steps: u64,
    report_every: u64,
    pattern: Option<Pattern>,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    autosave: bool,
}

fn next_arg<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .with_context(|| format!("{flag} requires a value"))
}

fn parse_args() -> Result<MainArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = UniverseConfig::default();
    let mut out = MainArgs {
        config: UniverseConfig::default(),
        steps: 100,
        report_every: 10,
        pattern: None,
        load: None,
        save: None,
        autosave: false,
    };
    let (mut width, mut height) = (config.width, config.height);
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = next_arg(&args, i, "--width")?
                    .parse()
                    .context("--width requires a positive integer")?;
            }
            "--height" => {
                i += 1;
                height = next_arg(&args, i, "--height")?
                    .parse()
                    .context("--height requires a positive integer")?;
            }
            "--steps" => {
                i += 1;
                out.steps = next_arg(&args, i, "--steps")?
                    .parse()
                    .context("--steps requires an integer")?;
            }
            "--report-every" => {
                i += 1;
                out.report_every = next_arg(&args, i, "--report-every")?
                    .parse::<u64>()
                    .context("--report-every requires an integer")?
                    .max(1);
            }
            "--density" => {
                i += 1;
                let density: f64 = next_arg(&args, i, "--density")?
                    .parse()
                    .context("--density requires a number")?;
                config = config.density(density);
            }
            "--seed" => {
                i += 1;
                let v = next_arg(&args, i, "--seed")?;
                let seed = if let Some(hex) = v.strip_prefix("0x") {
                    u64::from_str_radix(hex, 16).context("--seed hex parse failed")?
                } else {
                    v.parse().context("--seed requires an integer")?
                };
                config = config.seed(seed);
            }
            "--toroidal" => {
                config = config.toroidal(true);
            }
            "--pattern" => {
                i += 1;
                let name = next_arg(&args, i, "--pattern")?;
                match Pattern::by_name(name) {
                    Some(pattern) => out.pattern = Some(pattern),
                    None => bail!("unknown pattern: {name} (expected glider, lwss, or pulsar)"),
                }
            }
            "--load" => {
                i += 1;
                out.load = Some(PathBuf::from(next_arg(&args, i, "--load")?));
            }
            "--save" => {
                i += 1;
                out.save = Some(PathBuf::from(next_arg(&args, i, "--save")?));
            }
            "--autosave" => {
                out.autosave = true;
            }
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
        i += 1;
    }
    out.config = config.size(width, height);
    Ok(out)
}

fn run(args: MainArgs) -> Result<()> {
    let restore_path = args.load.clone().or_else(|| {
        let autosave = PathBuf::from(AUTOSAVE_FILE_NAME);
        (args.autosave && autosave.exists()).then_some(autosave)
    });
    let restore = match &restore_path {
        Some(path) => Some(
            colorlife::load_with_config(path, args.config.clone())
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };

    let (mut universe, grid_line_color, background_color) = match restore {
        Some(loaded) => (
            loaded.universe,
            loaded.grid_line_color,
            loaded.background_color,
        ),
        None => {
            let mut universe = Universe::with_config(args.config.clone());
            if let Some(pattern) = &args.pattern {
                let mut rng = match args.config.seed {
                    Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
                    None => rand::rngs::StdRng::from_os_rng(),
                };
                let (x, y) = universe.stamp_pattern_randomly(pattern, PATTERN_COLOR, &mut rng);
                info!("stamped {} at ({x},{y})", pattern.name);
            } else {
                universe.initialize_random_universe();
            }
            (universe, DEFAULT_GRID_LINE_COLOR, DEFAULT_BACKGROUND_COLOR)
        }
    };

    println!(
        "Universe {}x{} ({:?}), population {}",
        universe.width(),
        universe.height(),
        universe.topology(),
        universe.population()
    );

    let start = Instant::now();
    let mut done = 0;
    while done < args.steps {
        let chunk = args.report_every.min(args.steps - done);
        universe.step_n(chunk);
        done += chunk;
        println!(
            "Generation {}: alive = {}, dead = {}",
            universe.generation(),
            universe.population(),
            universe.dead_count()
        );
    }
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    if args.steps > 0 {
        let avg_ms = total_ms / args.steps as f64;
        println!("{} steps: {total_ms:.3} ms total, {avg_ms:.6} ms/step", args.steps);
    }

    if let Some(path) = &args.save {
        universe
            .save(path, grid_line_color, background_color)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    if args.autosave {
        universe
            .save(AUTOSAVE_FILE_NAME, grid_line_color, background_color)
            .context("failed to write autosave")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;
    run(args)
}

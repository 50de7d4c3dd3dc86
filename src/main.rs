use bhquad::{bench_forces, load_input, ConsoleReporter, CsvTrace, EngineConfig, Reporter, Scenario};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Gravitational N-body simulation over a quadtree-partitioned unit square")]
struct Args {
    /// Initial conditions: `G numBodies timeSteps` then one `mass x y z vx vy vz` line per body
    #[arg(default_value = "src.txt")]
    input: PathBuf,

    /// CSV trace output
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Optional engine settings (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the console listing
    #[arg(short, long)]
    quiet: bool,

    /// Time direct vs tree force evaluation and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_engine_config(args: &Args) -> Result<EngineConfig> {
    match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load engine config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_forces(&[200, 400, 800, 1600, 3200]);
        return Ok(());
    }

    let engine_cfg = load_engine_config(&args)?;
    let scenario_cfg = load_input(&args.input)
        .with_context(|| format!("failed to load input {}", args.input.display()))?;

    let mut sim = Scenario::build(scenario_cfg, &engine_cfg).into_simulator()?;
    sim.build_tree()?;

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut trace = CsvTrace::new(BufWriter::new(file));
    let mut console = ConsoleReporter::new(io::stdout().lock());

    let mut reporters: Vec<&mut dyn Reporter> = Vec::new();
    reporters.push(&mut trace);
    if !args.quiet {
        reporters.push(&mut console);
    }
    sim.run(&mut reporters)?;

    log::info!("trace written to {}", args.output.display());
    Ok(())
}

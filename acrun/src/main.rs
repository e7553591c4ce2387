//! acrun: evaluate an arithmetic circuit file and its derivatives.
//!
//! Usage:
//!   acrun circuit.ac
//!   acrun circuit.ac 12000 --strategy flag
//!   acrun circuit.ac --iterations 1000 --format json

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use acengine::prelude::*;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error};

/// Evaluate an arithmetic circuit and differentiate its output
#[derive(Parser, Debug)]
#[command(name = "acrun")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Circuit file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Expected number of nodes, used to size storage
    #[arg(value_name = "SIZE")]
    size: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Product rule: cache or flag
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Number of forward/backward runs over the parsed circuit
    #[arg(short = 'n', long, default_value_t = 1)]
    iterations: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Also print value and derivative of every node
    #[arg(long)]
    nodes: bool,

    /// Finish the run even when the output evaluates to zero
    #[arg(long)]
    tolerate_zero_output: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn engine_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if args.size.is_some() {
        config.size_hint = args.size;
    }
    config.tolerate_zero_output |= args.tolerate_zero_output;
    Ok(config)
}

fn progress_bar(iterations: usize) -> ProgressBar {
    if iterations <= 1 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(iterations as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} runs ({elapsed})") {
        bar.set_style(style);
    }
    bar
}

fn write_text<W: Write>(
    out: &mut W,
    circuit: &Circuit,
    summary: &RunSummary,
    with_nodes: bool,
) -> Result<()> {
    let io_err = |e: io::Error| CircuitError::ReportFailed(e.to_string());
    writeln!(out, "output {:.6} for {} nodes", summary.output, summary.nodes).map_err(io_err)?;
    writeln!(out, "log: {:.6}", summary.log10_output).map_err(io_err)?;
    for (id, derivative) in circuit.variable_sensitivities() {
        writeln!(out, "v{} dr: {:.6}", id, derivative).map_err(io_err)?;
    }
    if with_nodes {
        circuit.report(&mut TextSink::new(&mut *out))?;
    }
    Ok(())
}

fn write_json<W: Write>(
    out: &mut W,
    circuit: &Circuit,
    summary: &RunSummary,
    with_nodes: bool,
) -> Result<()> {
    let mut rows: Vec<NodeReport> = Vec::new();
    if with_nodes {
        circuit.report(&mut rows)?;
    }
    let sensitivities: Vec<serde_json::Value> = circuit
        .variable_sensitivities()
        .into_iter()
        .map(|(id, derivative)| serde_json::json!({ "id": id, "derivative": derivative }))
        .collect();
    let document = serde_json::json!({
        "summary": summary,
        "sensitivities": sensitivities,
        "nodes": rows,
    });
    serde_json::to_writer_pretty(&mut *out, &document)
        .map_err(|e| CircuitError::ReportFailed(e.to_string()))?;
    writeln!(out).map_err(|e| CircuitError::ReportFailed(e.to_string()))
}

fn run(args: &Args) -> Result<()> {
    let config = engine_config(args)?;
    debug!("configuration: {:?}", config);
    let engine = Engine::new(config);
    let mut circuit = engine.load(&args.input)?;

    let iterations = args.iterations.max(1);
    let bar = progress_bar(iterations);
    let start = Instant::now();
    let mut summary = engine.run(&mut circuit)?;
    bar.inc(1);
    for _ in 1..iterations {
        summary = engine.run(&mut circuit)?;
        bar.inc(1);
    }
    bar.finish_and_clear();
    let elapsed = start.elapsed().as_secs_f64();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        Format::Text => write_text(&mut out, &circuit, &summary, args.nodes)?,
        Format::Json => write_json(&mut out, &circuit, &summary, args.nodes)?,
    }
    circuit.release_caches();

    if iterations > 1 {
        eprintln!(
            "{} runs took {:.5} seconds ({:.5} per run)",
            iterations,
            elapsed,
            elapsed / iterations as f64
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("acrun: {}", e);
            ExitCode::FAILURE
        }
    }
}

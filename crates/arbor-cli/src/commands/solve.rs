//! Solve command.

use super::load_model;
use crate::config::CliConfig;
use arbor_bnb::{SolveStatus, SolverStats};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct SolveArgs {
    /// Input problem (JSON)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the node limit
    #[arg(long)]
    pub node_limit: Option<u64>,

    /// Write a JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

/// Outcome of one solve, as written to reports.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub name: String,
    pub status: SolveStatus,
    pub primal_bound: Option<f64>,
    pub dual_bound: f64,
    pub solution: Option<Vec<f64>>,
    pub stats: SolverStats,
    pub time_ms: u128,
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let mut config = CliConfig::load(args.config.as_deref())?;
    if args.node_limit.is_some() {
        config.solver.node_limit = args.node_limit;
    }
    let mut model = load_model(&args.input, &config)?;

    let start = Instant::now();
    let status = model.solve()?;
    let elapsed = start.elapsed();

    println!("status: {:?}", status);
    match model.primal_bound() {
        Some(bound) => println!("primal bound: {}", bound),
        None => println!("primal bound: none"),
    }
    println!("dual bound: {}", model.dual_bound());
    let stats = model.stats();
    println!(
        "nodes: {}, lp iterations: {}, incumbents: {}, max depth: {}",
        stats.nodes, stats.lp_iterations, stats.incumbents, stats.max_depth
    );
    println!("time: {:.3}s", elapsed.as_secs_f64());

    if let Some(path) = &args.report {
        let report = SolveReport {
            name: model.problem().name.clone(),
            status,
            primal_bound: model.primal_bound(),
            dual_bound: model.dual_bound(),
            solution: model.best_solution().map(<[f64]>::to_vec),
            stats: stats.clone(),
            time_ms: elapsed.as_millis(),
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!("Wrote report to {:?}", path);
    }
    Ok(())
}

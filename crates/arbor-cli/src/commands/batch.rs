//! Batch command.

use super::load_model;
use super::solve::SolveReport;
use crate::config::CliConfig;
use clap::Args;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input directory containing problem files
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Output directory for reports (defaults to the configured one)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of parallel workers (0 = auto)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    let config = CliConfig::load(args.config.as_deref())?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("reports"));
    let workers = args.workers.or(config.workers).unwrap_or(0);

    tracing::info!("Starting batch processing from {:?}", args.input_dir);
    fs::create_dir_all(&output_dir)?;

    let files = collect_problems(&args.input_dir)?;
    tracing::info!("Found {} files to process", files.len());

    if workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()?;
    }

    let failures: usize = files
        .par_iter()
        .map(|path| match process_file(path, &output_dir, &config) {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!("Failed to process {:?}: {}", path, e);
                1
            }
        })
        .sum();

    println!(
        "Solved {} of {} problems, reports in {}",
        files.len() - failures,
        files.len(),
        output_dir.display()
    );
    Ok(())
}

/// JSON files under `dir`, sorted by path.
fn collect_problems(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_owned());
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(path: &Path, output_dir: &Path, config: &CliConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut model = load_model(path, config)?;
    let status = model.solve()?;
    let elapsed = start.elapsed();

    let report = SolveReport {
        name: model.problem().name.clone(),
        status,
        primal_bound: model.primal_bound(),
        dual_bound: model.dual_bound(),
        solution: model.best_solution().map(<[f64]>::to_vec),
        stats: model.stats().clone(),
        time_ms: elapsed.as_millis(),
    };
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let report_path = output_dir.join(format!("{stem}.report.json"));
    let file = fs::File::create(report_path)?;
    serde_json::to_writer_pretty(file, &report)?;

    tracing::info!(
        "Finished {} [{:?}] in {}ms",
        report.name,
        status,
        elapsed.as_millis()
    );
    Ok(())
}

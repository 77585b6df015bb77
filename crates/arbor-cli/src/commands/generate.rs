//! Generate command.

use arbor_format::{
    IndependentSetGenerator, IndependentSetParams, InstanceGenerator, MultipleKnapsackGenerator,
    MultipleKnapsackParams,
};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Problem family.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum Family {
    /// Multiple knapsack
    Knapsack,
    /// Maximum independent set
    Indset,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Problem family
    #[arg(value_enum)]
    pub family: Family,

    /// Number of instances
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Output directory
    #[arg(short, long, default_value = "instances")]
    pub out: PathBuf,

    /// Items (knapsack) or graph vertices (indset)
    #[arg(long)]
    pub size: Option<usize>,

    /// Knapsacks per instance
    #[arg(long, default_value_t = 2)]
    pub knapsacks: usize,

    /// Edge probability for indset graphs
    #[arg(long, default_value_t = 0.3)]
    pub edge_probability: f64,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.family == Family::Indset && !(0.0..=1.0).contains(&args.edge_probability) {
        anyhow::bail!("Edge probability {} outside [0, 1]", args.edge_probability);
    }
    fs::create_dir_all(&args.out)?;

    let mut generator: Box<dyn InstanceGenerator> = match args.family {
        Family::Knapsack => {
            let mut params = MultipleKnapsackParams {
                n_knapsacks: args.knapsacks,
                ..Default::default()
            };
            if let Some(size) = args.size {
                params.n_items = size;
            }
            Box::new(MultipleKnapsackGenerator::new(params, args.seed))
        }
        Family::Indset => {
            let mut params = IndependentSetParams {
                edge_probability: args.edge_probability,
                ..Default::default()
            };
            if let Some(size) = args.size {
                params.n_nodes = size;
            }
            Box::new(IndependentSetGenerator::new(params, args.seed))
        }
    };

    for i in 0..args.count {
        let problem = generator.generate();
        let path = args.out.join(format!("{}.json", problem.name));
        problem.to_file(&path)?;
        tracing::info!("Wrote instance {} to {:?}", i, path);
    }
    println!("Generated {} instances in {}", args.count, args.out.display());
    Ok(())
}

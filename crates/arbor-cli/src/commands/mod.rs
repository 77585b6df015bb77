//! Subcommands.

pub mod batch;
pub mod generate;
pub mod run;
pub mod solve;

use crate::config::CliConfig;
use arbor_env::Model;
use std::path::Path;

/// Loads a problem file into a model configured from `config`.
pub(crate) fn load_model(path: &Path, config: &CliConfig) -> anyhow::Result<Model> {
    tracing::info!("Loading problem from {:?}", path);
    let mut model = Model::from_file(path)?;
    model.set_config(config.solver.clone())?;
    tracing::info!(
        "Problem {}: {} variables, {} rows",
        model.problem().name,
        model.problem().num_vars(),
        model.problem().num_rows()
    );
    Ok(model)
}

//! CLI configuration.

use arbor_bnb::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration loaded from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Solver settings applied to every loaded problem.
    pub solver: SolverConfig,
    /// Default number of batch workers.
    pub workers: Option<usize>,
    /// Default directory for reports.
    pub output_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Loads configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        tracing::debug!("Loading configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_bnb::BranchingRule;

    #[test]
    fn test_missing_path_gives_defaults() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbor.json");
        std::fs::write(
            &path,
            r#"{"solver": {"node_limit": 50, "branching_rule": "first_candidate"}, "workers": 2}"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.solver.node_limit, Some(50));
        assert_eq!(config.solver.branching_rule, BranchingRule::FirstCandidate);
        assert!(config.solver.primal_heuristic);
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ solver: ").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }
}

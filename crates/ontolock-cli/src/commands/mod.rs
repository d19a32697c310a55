pub mod approve;
pub mod check;
pub mod diff;
pub mod gate;
pub mod hash;

use clap::Args;
use ontolock_core::definition::ApiDefinition;
use ontolock_engine::config::GateConfig;
use ontolock_engine::loader::load_definition;
use std::path::PathBuf;

pub const EXIT_OK: i32 = 0;
/// Pending changes, rejected review, or any error
pub const EXIT_FAILURE: i32 = 1;
/// The gate failed closed
pub const EXIT_GATE_CLOSED: i32 = 2;

/// Arguments shared by every command
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// API definition file (.json, .yaml or .yml)
    #[arg(short, long)]
    pub definition: PathBuf,

    /// Directory holding ontology.lock.json (default: ONTOLOCK_LOCK_DIR or .)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Everything a command needs, resolved from arguments and environment
pub struct Target {
    pub definition: ApiDefinition,
    pub config: GateConfig,
}

impl TargetArgs {
    /// Load configuration and the definition
    pub fn resolve(self) -> anyhow::Result<Target> {
        let mut config = GateConfig::load()?;
        if let Some(dir) = self.dir {
            config.lock_dir = dir;
        }

        let definition = load_definition(&self.definition)?;
        Ok(Target { definition, config })
    }
}

//! Configuration inspection and scaffolding

use std::path::Path;

use bluetiger::PlatformConfig;

use super::{ConfigCommands, Context};
use crate::error::CliError;
use crate::output;

pub fn execute(cmd: &ConfigCommands, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Check => output::print_config(&ctx.config, ctx.json),
        ConfigCommands::Init { path, force } => init(path, *force, ctx.json),
    }
}

fn init(path: &Path, force: bool, json: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }
    let yaml = PlatformConfig::default().to_yaml()?;
    std::fs::write(path, yaml)?;
    output::print_success(&format!("Wrote {}", path.display()), json);
    Ok(())
}

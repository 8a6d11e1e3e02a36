use crate::cli::{Cli, Commands};
use crate::Settings;
use anyhow::Result;

mod apply;
mod apply_all;
mod config;
mod restore;
mod store;

pub fn execute(cli: Cli) -> Result<()> {
    // Settings are resolved once and handed to every command
    let settings = Settings::new(cli.store_path.as_deref())?;

    match cli.command {
        Commands::Store { target_path, name } => {
            store::execute(&settings, &target_path, name.as_deref())
        }

        Commands::Apply { name, force } => apply::execute(&settings, &name, force),

        Commands::ApplyAll { force } => apply_all::execute(&settings, force),

        Commands::Restore { name, force } => restore::execute(&settings, &name, force),

        Commands::Config(action) => config::execute(&settings, action),
    }
}

use crate::{ui, Settings};
use anyhow::Result;

pub fn execute(settings: &Settings, name: &str, force: bool) -> Result<()> {
    let mut transpose = settings.open()?;
    let original = transpose.registry().get(name)?.path().to_path_buf();

    transpose.restore(name, force)?;

    ui::success("Restored", format!("{name} -> {}", original.display()));
    Ok(())
}

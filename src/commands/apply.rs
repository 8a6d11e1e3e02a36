use crate::{ui, Settings};
use anyhow::Result;

pub fn execute(settings: &Settings, name: &str, force: bool) -> Result<()> {
    let transpose = settings.open()?;
    transpose.apply(name, force)?;

    let entry = transpose.registry().get(name)?;
    ui::success("Applied", format!("{} -> {name}", entry.path().display()));
    Ok(())
}

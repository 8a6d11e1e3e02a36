use crate::util::expand_path;
use crate::{ui, Settings};
use anyhow::{Context, Result};

pub fn execute(settings: &Settings, target_path: &str, name: Option<&str>) -> Result<()> {
    let target = expand_path(target_path)?;
    let name = match name {
        Some(name) => name.to_string(),
        None => target
            .file_name()
            .map(|part| part.to_string_lossy().into_owned())
            .with_context(|| format!("Cannot derive an entry name from {:?}", target))?,
    };

    let mut transpose = settings.open()?;
    transpose.store(&name, &target)?;

    ui::success(
        "Stored",
        format!("{name} -> {}", transpose.stored_path(&name).display()),
    );
    Ok(())
}

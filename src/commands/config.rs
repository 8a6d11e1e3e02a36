use crate::cli::ConfigAction;
use crate::legacy::upgrade_registry;
use crate::registry::EntryField;
use crate::util::expand_path;
use crate::{ui, Settings};
use anyhow::{Context, Result};

/// Registry-only edits; nothing on disk moves except `transpose.json`.
pub fn execute(settings: &Settings, action: ConfigAction) -> Result<()> {
    // Old registries do not load, so upgrade works on the raw file
    if let ConfigAction::Upgrade = action {
        return upgrade(settings);
    }

    let mut transpose = settings.open()?;

    match action {
        ConfigAction::Add { name, path } => {
            let path = expand_path(&path)?;
            transpose.registry_mut().add(name.as_str(), &path, None)?;
            transpose.save()?;
            ui::success("Added", format!("{name} -> {}", path.display()));
        }

        ConfigAction::Get { name } => {
            let entry = transpose.registry().get(&name)?;
            let rendered =
                serde_json::to_string_pretty(entry).context("Failed to render entry")?;
            println!("{rendered}");
        }

        ConfigAction::List => {
            let registry = transpose.registry();
            if registry.is_empty() {
                ui::info(format!(
                    "No entries in {}",
                    transpose.config_path().display()
                ));
            }
            for entry in registry.entries() {
                let marker = if entry.is_enabled() { "" } else { " (disabled)" };
                println!(
                    "\t{:<30} -> {}{marker}",
                    entry.name(),
                    entry.path().display()
                );
            }
        }

        ConfigAction::Remove { name } => {
            transpose.registry_mut().remove(&name)?;
            transpose.save()?;
            ui::success("Removed", &name);
        }

        ConfigAction::Update {
            name,
            field_key,
            field_value,
        } => {
            let field: EntryField = field_key.parse()?;
            let value = match field {
                EntryField::Path => expand_path(&field_value)?.to_string_lossy().into_owned(),
                EntryField::Enabled => field_value,
            };
            transpose.registry_mut().update(&name, field, &value)?;
            transpose.save()?;
            ui::success("Updated", format!("{name}.{} = {value}", field.as_str()));
        }

        ConfigAction::Enable { name } => {
            transpose.registry_mut().enable(&name)?;
            transpose.save()?;
            ui::success("Enabled", &name);
        }

        ConfigAction::Disable { name } => {
            transpose.registry_mut().disable(&name)?;
            transpose.save()?;
            ui::success("Disabled", &name);
        }

        ConfigAction::ImportLegacy { cache_filename } => {
            let imported = transpose.import_legacy(&cache_filename)?;
            if imported.is_empty() {
                ui::info(format!(
                    "No unregistered '{cache_filename}' cache files found in {}",
                    transpose.store_path().display()
                ));
            }
            for name in &imported {
                ui::status("Imported", name);
            }
        }

        ConfigAction::Upgrade => return upgrade(settings),
    }

    Ok(())
}

fn upgrade(settings: &Settings) -> Result<()> {
    let config_path = settings.config_path();
    let upgraded = upgrade_registry(&config_path, settings.version())
        .with_context(|| format!("Failed to upgrade {}", config_path.display()))?;

    if upgraded.is_empty() {
        ui::info(format!(
            "No entries needed upgrading in {}",
            config_path.display()
        ));
    }
    for name in &upgraded {
        ui::status("Upgraded", name);
    }
    Ok(())
}

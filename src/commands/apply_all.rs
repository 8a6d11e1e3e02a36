use crate::{ui, Settings};
use anyhow::Result;

/// Apply every entry, printing one status line each. Individual failures
/// are reported, never returned.
pub fn execute(settings: &Settings, force: bool) -> Result<()> {
    let transpose = settings.open()?;
    let reports = transpose.apply_all(force);

    for report in &reports {
        match &report.result {
            Ok(()) => println!("\t{:<30}: success", report.name),
            Err(err) => println!("\t{:<30}: {err}", report.name),
        }
    }

    let failed = reports.iter().filter(|report| !report.is_success()).count();
    if failed > 0 {
        ui::warn(format!("{failed} of {} entries could not be applied", reports.len()));
    }

    Ok(())
}

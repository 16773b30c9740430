use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lets spreadsheet apps detect UTF-8.
pub const BOM: &str = "\u{FEFF}";

/// `prefix.csv`, or `prefix_YYYY-MM-DD_HH-MM-SS.csv` when timestamped.
pub fn export_filename(prefix: &str, timestamped: bool, now: NaiveDateTime) -> String {
    if timestamped {
        format!("{}_{}.csv", prefix, now.format("%Y-%m-%d_%H-%M-%S"))
    } else {
        format!("{}.csv", prefix)
    }
}

/// Write BOM + `csv` to `dir/filename`.
///
/// The data goes to a `.part` file first and is renamed into place, so a
/// failed write never leaves a truncated CSV behind.
pub fn save_csv(csv: &str, dir: &Path, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let target = dir.join(filename);
    let partial = dir.join(format!("{}.part", filename));

    let written = std::fs::write(&partial, format!("{}{}", BOM, csv))
        .with_context(|| format!("Failed to write {:?}", partial))
        .and_then(|_| {
            std::fs::rename(&partial, &target)
                .with_context(|| format!("Failed to move {:?} to {:?}", partial, target))
        });

    if let Err(e) = written {
        let _ = std::fs::remove_file(&partial);
        return Err(e);
    }

    debug!("Saved {} bytes to {:?}", csv.len() + BOM.len(), target);
    Ok(target)
}

use std::path::Path;

use chrono::{DateTime, Local};
use engine_logging::{engine_info, engine_warn};
use migration_core::{MigrationStats, RunReport};

use crate::persist::{parent_dir, AtomicFileWriter, PersistError};

/// Log the run summary and write it as pretty JSON to `report_path`.
pub fn generate_report(
    stats: &MigrationStats,
    report_path: &Path,
    finished_at: DateTime<Local>,
) -> Result<RunReport, PersistError> {
    let report = RunReport::from_stats(stats, finished_at);

    for line in report.summary_lines() {
        engine_info!("{}", line);
    }
    for line in report.error_lines() {
        engine_warn!("{}", line);
    }

    let filename = report_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            PersistError::OutputDir(format!("not a file path: {}", report_path.display()))
        })?;
    let json = serde_json::to_string_pretty(&report)?;
    let written = AtomicFileWriter::new(parent_dir(report_path)).write(&filename, json)?;
    engine_info!("Report saved to: {}", written.display());
    Ok(report)
}

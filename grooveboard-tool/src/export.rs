//! JSON/YAML layout reports.

use std::path::{Path, PathBuf};

use grooveboard_core::{BoardSize, BucketId, Item, PlacementState};
use serde::Serialize;

use crate::error::ToolError;

/// Export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

#[derive(Serialize)]
struct LayoutReport<'a> {
    board: &'a BoardSize,
    rows: Vec<RowReport<'a>>,
    available: &'a [Item],
}

#[derive(Serialize)]
struct RowReport<'a> {
    bucket: BucketId,
    title: &'static str,
    used: u64,
    capacity: u32,
    remaining: i64,
    items: &'a [Item],
}

fn report(state: &PlacementState) -> LayoutReport<'_> {
    let rows = state
        .row_usage()
        .into_iter()
        .map(|usage| RowReport {
            bucket: usage.bucket,
            title: usage.bucket.title(),
            used: usage.used,
            capacity: usage.capacity,
            remaining: usage.remaining,
            items: state.items(usage.bucket),
        })
        .collect();

    LayoutReport {
        board: state.active_board(),
        rows,
        available: state.items(BucketId::Available),
    }
}

/// Render the current layout as JSON or YAML.
pub fn export(state: &PlacementState, format: ExportFormat) -> Result<String, ToolError> {
    let report = report(state);
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
    }
}

/// Write the layout report into `dir`, returning the file written.
pub fn export_to_dir(
    state: &PlacementState,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ToolError> {
    let content = export(state, format)?;
    let path = dir.join(format!("grooveboard_layout.{}", format.extension()));
    std::fs::write(&path, content)?;
    Ok(path)
}

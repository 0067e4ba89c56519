use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::store::{Metadata, Store, Touchpoint, TouchpointFilter};

/// Export format — everything the data directory holds except report bodies.
#[derive(Debug, Serialize)]
struct ExportData {
    touchpoints: Vec<Touchpoint>,
    metadata: Metadata,
    reports: Vec<String>,
}

/// Export touchpoints, metadata and report names as JSON to stdout.
pub fn export(data_dir: &Path) -> Result<()> {
    let store = Store::open(data_dir)?;

    let data = ExportData {
        touchpoints: store.list_touchpoints(&TouchpointFilter::default())?,
        metadata: store.get_metadata()?,
        reports: store.list_reports()?,
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} touchpoints and {} report names.",
        data.touchpoints.len(),
        data.reports.len()
    );

    Ok(())
}

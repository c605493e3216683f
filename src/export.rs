use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::dashboard::Dashboard;

/// Write the dashboard's render specs as pretty-printed JSON.
pub fn write_dashboard(path: &Path, dashboard: &Dashboard) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dashboard)
        .with_context(|| format!("writing dashboard to {}", path.display()))?;
    writer.flush()?;

    log::info!(
        "Exported dashboard ({} of {} records) to {}",
        dashboard.visible_records,
        dashboard.total_records,
        path.display()
    );
    Ok(())
}

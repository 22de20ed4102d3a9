use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::context::{Context, done};
use crate::render::pluralize;

pub fn run(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let session = ctx.session()?;
    let rows = session.export_rows();

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!("schedule-{}.csv", ctx.today.format("%Y-%m-%d")))
    });

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Could not create {}", path.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    done(format!(
        "Exported {} {} to {}",
        rows.len(),
        pluralize("event", rows.len()),
        path.display()
    ));
    Ok(())
}

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use log::debug;

use crate::common::{Catalog, Destination};

/// Write one block per video, in catalog order
pub fn write_report<W: Write>(catalog: &Catalog, out: &mut W) -> std::io::Result<()> {
    for v in catalog.iter() {
        writeln!(out, "Video title: {}", v.title)?;
        writeln!(
            out,
            "Video published on: {}",
            v.published_at.format("%Y-%m-%d %H:%M:%S%:z")
        )?;
        writeln!(out, "Video description: {}", v.description)?;
        writeln!(out, "Video view count: {}", v.view_count)?;
        writeln!(out, "---\n")?;
    }
    out.flush()
}

/// Print the catalog as text to a file or stdout
pub fn show(catalog: &Catalog, destination: &Destination) -> Result<()> {
    debug!("Writing report of {} videos to {}", catalog.len(), destination);
    match destination {
        Destination::Stdout => {
            let stdout = std::io::stdout();
            write_report(catalog, &mut stdout.lock()).context("Failed to write report to stdout")?;
        }
        Destination::File(path) => {
            let f = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut w = BufWriter::new(f);
            write_report(catalog, &mut w)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
        }
    };
    Ok(())
}

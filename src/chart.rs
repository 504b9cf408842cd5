use std::io::Write;
use std::ops::Range;

use chrono::{TimeZone, Utc};
use log::debug;
use plotters::prelude::*;
use plotters::style::FontTransform;
use thiserror::Error;

use crate::common::{Catalog, Destination};

const DAY_SECS: i64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No videos to plot")]
    Empty,

    #[error("Chart rendering failed: {0}")]
    Backend(String),

    #[error("Failed to write chart to {destination}")]
    Io {
        destination: String,
        #[source]
        source: std::io::Error,
    },
}

fn backend_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// Text decorations of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabels {
    pub title: &'static str,
    pub x: &'static str,
    pub y: &'static str,
}

pub const VIEW_COUNT_LABELS: ChartLabels = ChartLabels {
    title: "View count versus date of publishing",
    x: "Date",
    y: "View count",
};

/// Something which can draw a single (epoch seconds, view count) series
pub trait ChartBackend {
    /// `points` is sorted by time and never empty
    fn render_series(
        &self,
        points: &[(i64, u64)],
        labels: &ChartLabels,
        destination: &Destination,
    ) -> Result<(), RenderError>;
}

/// Project the catalog to `(id, epoch seconds, view count)`, oldest first.
/// The sort is stable, so videos published at the same second keep their
/// catalog order.
pub fn time_series(catalog: &Catalog) -> Vec<(String, i64, u64)> {
    let mut series: Vec<(String, i64, u64)> = catalog
        .iter()
        .map(|v| (v.id.clone(), v.epoch_seconds(), v.view_count))
        .collect();
    series.sort_by_key(|p| p.1);
    series
}

/// Plot view count over publish date
pub fn plot(
    catalog: &Catalog,
    destination: &Destination,
    backend: &dyn ChartBackend,
) -> Result<(), RenderError> {
    if catalog.is_empty() {
        return Err(RenderError::Empty);
    }

    let series = time_series(catalog);
    let points: Vec<(i64, u64)> = series.iter().map(|p| (p.1, p.2)).collect();
    debug!("Plotting {} points to {}", points.len(), destination);

    backend.render_series(&points, &VIEW_COUNT_LABELS, destination)
}

/// Renders PNG images with `plotters`
pub struct PlottersBackend {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersBackend {
    fn default() -> Self {
        PlottersBackend {
            width: 1024,
            height: 768,
        }
    }
}

fn format_date(epoch: &i64) -> String {
    match Utc.timestamp_opt(*epoch, 0).single() {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => epoch.to_string(),
    }
}

/// X range spanning the series (padded by a day either side when it is a
/// single instant) and a Y range from zero to a little above the peak
fn axis_ranges(points: &[(i64, u64)]) -> (Range<i64>, Range<u64>) {
    let first = points.first().map(|p| p.0).unwrap_or(0);
    let last = points.last().map(|p| p.0).unwrap_or(first);
    let x = if first == last {
        (first - DAY_SECS)..(last + DAY_SECS)
    } else {
        first..last
    };

    let peak = points.iter().map(|p| p.1).max().unwrap_or(0);
    let top = peak.saturating_add(peak / 10);
    (x, 0..top.max(1))
}

impl PlottersBackend {
    fn draw_png(&self, points: &[(i64, u64)], labels: &ChartLabels) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (self.width as usize) * (self.height as usize) * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(backend_err)?;

            let (x_range, y_range) = axis_ranges(points);
            let mut chart = ChartBuilder::on(&root)
                .caption(labels.title, ("sans-serif", 24).into_font())
                .margin(16)
                .x_label_area_size(100)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range, y_range)
                .map_err(backend_err)?;

            chart
                .configure_mesh()
                .x_desc(labels.x)
                .y_desc(labels.y)
                .x_label_formatter(&format_date)
                .x_label_style(
                    ("sans-serif", 12)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .draw()
                .map_err(backend_err)?;

            chart
                .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
                .map_err(backend_err)?;
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))
                .map_err(backend_err)?;

            root.present().map_err(backend_err)?;
        }

        let img = image::RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| RenderError::Backend("Rendered buffer has unexpected size".into()))?;
        let mut png: Vec<u8> = vec![];
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(backend_err)?;
        Ok(png)
    }
}

impl ChartBackend for PlottersBackend {
    fn render_series(
        &self,
        points: &[(i64, u64)],
        labels: &ChartLabels,
        destination: &Destination,
    ) -> Result<(), RenderError> {
        let png = self.draw_png(points, labels)?;

        let io_err = |source: std::io::Error| RenderError::Io {
            destination: destination.to_string(),
            source,
        };
        match destination {
            Destination::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(&png).map_err(io_err)?;
                lock.flush().map_err(io_err)?;
            }
            Destination::File(path) => std::fs::write(path, &png).map_err(io_err)?,
        }
        Ok(())
    }
}

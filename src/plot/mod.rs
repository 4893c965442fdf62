//! Figures
//!
//! All the figures are written to PNG files with the `plotters` bitmap backend.

use plotters::{coord::Shift, prelude::*};
use std::ops::Range;

mod catalog;
mod diagrams;
mod heatmaps;
mod toy;

pub use catalog::{
    extinction_hexbin, extinction_histogram, extinction_scatter, median_redshift_trend,
    spatial_3d,
};
pub use diagrams::{persistence_barcode, persistence_diagram};
pub use heatmaps::betti_heatmaps;
pub use toy::{toy_complex, toy_epsilon_balls, toy_point_cloud};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("Failed to draw the figure: {0}")]
    Drawing(String),
    #[error("No data to plot in {0}")]
    NoData(String),
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(error: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(error.to_string())
    }
}
type Result<T> = std::result::Result<T, PlotError>;

/// Font family
const FONT: &str = "sans-serif";

fn rgb(color: colorous::Color) -> RGBColor {
    let (r, g, b) = color.as_tuple();
    RGBColor(r, g, b)
}

/// Color of the k-th series
fn series_color(k: usize) -> RGBColor {
    rgb(colorous::TABLEAU10[k % colorous::TABLEAU10.len()])
}

/// Maps `value` within `range` to [0,1]
fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    if max > min {
        ((value - min) / (max - min)).clamp(0., 1.)
    } else {
        0.5
    }
}

/// Range padded by a fraction of its width, or by ±0.5 if empty
fn padded_range((min, max): (f64, f64), padding: f64) -> Range<f64> {
    if max > min {
        let pad = padding * (max - min);
        min - pad..max + pad
    } else {
        min - 0.5..max + 0.5
    }
}

/// Draws a vertical color bar for values within `range`
fn colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    gradient: colorous::Gradient,
    range: (f64, f64),
    label: &str,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (min, max) = range;
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, min..max)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .draw()?;
    let n = 100;
    let step = (max - min) / n as f64;
    chart.draw_series((0..n).map(|k| {
        let y = min + k as f64 * step;
        let color = rgb(gradient.eval_continuous(k as f64 / (n - 1) as f64));
        Rectangle::new([(0., y), (1., y + step)], color.filled())
    }))?;
    Ok(())
}

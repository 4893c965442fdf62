//! Catalog exploration figures

use super::{colorbar, normalize, padded_range, rgb, PlotError, Result, FONT};
use crate::{
    binning::{binned_median, finite_range, histogram, linspace, HexBins},
    features::PointCloud,
};
use plotters::prelude::*;
use std::path::Path;

/// Number of hexagons along the right ascension axis
pub const HEXBIN_GRIDSIZE: usize = 80;
/// Number of bins of the extinction histogram
pub const HISTOGRAM_BINS: usize = 50;
/// Number of extinction bin edges for the median redshift trend
pub const TREND_EDGES: usize = 25;

fn no_data(path: &Path) -> PlotError {
    PlotError::NoData(format!("{:?}", path))
}

/// Range of the base 10 logarithm of the positive values
fn log_range(values: &[f64]) -> Option<(f64, f64)> {
    let logs: Vec<f64> = values
        .iter()
        .filter(|&&x| x > 0.)
        .map(|x| x.log10())
        .collect();
    finite_range(&logs)
}

/// Right ascension and declination scatter plot colored by the log-scaled extinction
pub fn extinction_scatter<P: AsRef<Path>>(
    ra: &[f64],
    dec: &[f64],
    extinction: &[f64],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let (Some(ra_range), Some(dec_range), Some(log_extinction)) =
        (finite_range(ra), finite_range(dec), log_range(extinction))
    else {
        return Err(no_data(path));
    };

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (map, bar) = root.split_horizontally(900);
    let mut chart = ChartBuilder::on(&map)
        .caption(
            "Log-Scaled Spatial Variation of Extinction_r in RA-Dec Region",
            (FONT, 20),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded_range(ra_range, 0.02), padded_range(dec_range, 0.02))?;
    chart
        .configure_mesh()
        .x_desc("Right Ascension (degrees)")
        .y_desc("Declination (degrees)")
        .draw()?;
    chart.draw_series(
        ra.iter()
            .zip(dec)
            .zip(extinction)
            .filter(|((ra, dec), _)| ra.is_finite() && dec.is_finite())
            .map(|((&ra, &dec), &e)| {
                let u = if e > 0. {
                    normalize(e.log10(), log_extinction)
                } else {
                    0.
                };
                let color = rgb(colorous::INFERNO.eval_continuous(u));
                Circle::new((ra, dec), 2, color.mix(0.6).filled())
            }),
    )?;
    colorbar(
        &bar,
        colorous::INFERNO,
        log_extinction,
        "log10 Extinction (r-band)",
    )?;
    root.present()?;
    log::info!("Extinction scatter plot written to {:?}", path);
    Ok(())
}

/// Mean extinction within hexagonal bins of right ascension and declination
pub fn extinction_hexbin<P: AsRef<Path>>(
    ra: &[f64],
    dec: &[f64],
    extinction: &[f64],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let hex = HexBins::new(ra, dec, extinction, HEXBIN_GRIDSIZE);
    let means: Vec<f64> = hex.cells.iter().map(|cell| cell.mean).collect();
    let (Some(ra_range), Some(dec_range), Some(mean_range)) =
        (finite_range(ra), finite_range(dec), finite_range(&means))
    else {
        return Err(no_data(path));
    };

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let (map, bar) = root.split_horizontally(900);
    let mut chart = ChartBuilder::on(&map)
        .caption("Hexbin Plot of Extinction_r across RA-Dec", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded_range(ra_range, 0.02), padded_range(dec_range, 0.02))?;
    chart
        .configure_mesh()
        .x_desc("Right Ascension (degrees)")
        .y_desc("Declination (degrees)")
        .draw()?;
    chart.draw_series(hex.cells.iter().map(|cell| {
        let color = rgb(colorous::INFERNO.eval_continuous(normalize(cell.mean, mean_range)));
        Polygon::new(hex.hexagon(cell.center), color.filled())
    }))?;
    colorbar(&bar, colorous::INFERNO, mean_range, "Mean Extinction (r-band)")?;
    root.present()?;
    log::info!("Extinction hexbin plot written to {:?}", path);
    Ok(())
}

/// Distribution of the extinction values
pub fn extinction_histogram<P: AsRef<Path>>(extinction: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    let bins = histogram(extinction, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(no_data(path));
    };
    let max_count = bins.iter().map(|bin| bin.count).max().unwrap_or_default();

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Extinction_r Values", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range((first.start, last.end), 0.02),
            0f64..1.05 * max_count.max(1) as f64,
        )?;
    chart
        .configure_mesh()
        .x_desc("Extinction (r-band)")
        .y_desc("Number of Objects")
        .draw()?;
    let grey = RGBColor(128, 128, 128);
    chart.draw_series(
        bins.iter()
            .map(|bin| Rectangle::new([(bin.start, 0.), (bin.end, bin.count as f64)], grey.filled())),
    )?;
    chart.draw_series(
        bins.iter()
            .map(|bin| Rectangle::new([(bin.start, 0.), (bin.end, bin.count as f64)], &BLACK)),
    )?;
    root.present()?;
    log::info!("Extinction histogram written to {:?}", path);
    Ok(())
}

/// Median redshift within evenly spaced extinction bins
pub fn median_redshift_trend<P: AsRef<Path>>(
    extinction: &[f64],
    redshift: &[f64],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let Some((min, max)) = finite_range(extinction) else {
        return Err(no_data(path));
    };
    let edges = linspace(min, max, TREND_EDGES);
    let trend: Vec<(f64, f64)> = binned_median(extinction, redshift, &edges)
        .into_iter()
        .filter_map(|(center, median)| median.map(|median| (center, median)))
        .collect();
    let medians: Vec<f64> = trend.iter().map(|(_, median)| *median).collect();
    let Some(median_range) = finite_range(&medians) else {
        return Err(no_data(path));
    };

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Median Redshift per Extinction Bin", (FONT, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded_range((min, max), 0.02), padded_range(median_range, 0.1))?;
    chart
        .configure_mesh()
        .x_desc("Extinction (r-band)")
        .y_desc("Median Redshift")
        .draw()?;
    let dark_red = RGBColor(139, 0, 0);
    chart.draw_series(LineSeries::new(trend.iter().copied(), &dark_red))?;
    chart.draw_series(
        trend
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, dark_red.filled())),
    )?;
    root.present()?;
    log::info!("Median redshift trend written to {:?}", path);
    Ok(())
}

/// 3D scatter plot of the (ra,dec,redshift) point cloud colored by redshift
pub fn spatial_3d<P: AsRef<Path>>(points: &PointCloud, path: P) -> Result<()> {
    let path = path.as_ref();
    if points.is_empty() {
        return Err(no_data(path));
    }
    let [ra_range, dec_range, z_range] = [0, 1, 2].map(|axis| points.axis_range(axis));

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("3D Spatial Distribution of Galaxies", (FONT, 22))
        .margin(20)
        .build_cartesian_3d(
            padded_range(ra_range, 0.),
            padded_range(z_range, 0.),
            padded_range(dec_range, 0.),
        )?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.3;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart.configure_axes().draw()?;
    chart.draw_series(points.iter().map(|&[ra, dec, z]| {
        let color = rgb(colorous::VIRIDIS.eval_continuous(normalize(z, z_range)));
        Circle::new((ra, z, dec), 2, color.mix(0.5).filled())
    }))?;
    root.present()?;
    log::info!("3D point cloud written to {:?}", path);
    Ok(())
}

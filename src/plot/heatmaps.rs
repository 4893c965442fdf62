use super::{colorbar, normalize, rgb, Result, FONT};
use crate::{binning::finite_range, sweep::BettiGrid, topology::HomologyDimension};
use plotters::prelude::*;
use std::path::Path;
use strum::IntoEnumIterator;

/// Grey of the cells where the homology computation failed
const UNDEFINED: RGBColor = RGBColor(160, 160, 160);

/// Boundaries of the cells centered on the thresholds
fn cell_edges(thresholds: &[f64]) -> Vec<f64> {
    match thresholds {
        [] => vec![],
        [t] => vec![t - 0.5, t + 0.5],
        _ => {
            let n = thresholds.len();
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(thresholds[0] - 0.5 * (thresholds[1] - thresholds[0]));
            edges.extend(thresholds.windows(2).map(|t| 0.5 * (t[0] + t[1])));
            edges.push(thresholds[n - 1] + 0.5 * (thresholds[n - 1] - thresholds[n - 2]));
            edges
        }
    }
}

/// Heatmaps of the Betti numbers in dimensions 0, 1 and 2
///
/// The x axis is the nearest neighbor distance threshold and the y axis the extinction
/// threshold.
pub fn betti_heatmaps<P: AsRef<Path>>(grid: &BettiGrid, path: P) -> Result<()> {
    let thresholds = grid.thresholds();
    let x_edges = cell_edges(&thresholds.second);
    let y_edges = cell_edges(&thresholds.first);
    let (Some(&x_min), Some(&x_max), Some(&y_min), Some(&y_max)) =
        (x_edges.first(), x_edges.last(), y_edges.first(), y_edges.last())
    else {
        return Err(super::PlotError::NoData(format!("{:?}", path.as_ref())));
    };
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_max + 0.5)
    };
    let (y_min, y_max) = if y_max > y_min {
        (y_min, y_max)
    } else {
        (y_min - 0.5, y_max + 0.5)
    };

    let root = BitMapBackend::new(path.as_ref(), (1800, 560)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "Betti Numbers over the Extinction x Nearest Neighbor Distance Bifiltration",
        (FONT, 24),
    )?;
    let panels = root.split_evenly((1, 3));
    for (panel, dimension) in panels.iter().zip(HomologyDimension::iter()) {
        let betti = grid.betti(dimension);
        let range = finite_range(betti.as_slice()).unwrap_or((0., 1.));

        let (width, _) = panel.dim_in_pixel();
        let (map, bar) = panel.split_horizontally(width as i32 - 90);
        let mut chart = ChartBuilder::on(&map)
            .caption(dimension.to_string(), (FONT, 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Nearest neighbor distance threshold")
            .y_desc("Extinction threshold")
            .draw()?;
        chart.draw_series(betti.row_iter().enumerate().flat_map(|(i, row)| {
            let (y_edges, x_edges) = (&y_edges, &x_edges);
            row.iter()
                .enumerate()
                .map(move |(j, &value)| {
                    let color = if value.is_nan() {
                        UNDEFINED
                    } else {
                        rgb(colorous::VIRIDIS.eval_continuous(normalize(value, range)))
                    };
                    Rectangle::new(
                        [(x_edges[j], y_edges[i]), (x_edges[j + 1], y_edges[i + 1])],
                        color.filled(),
                    )
                })
                .collect::<Vec<_>>()
        }))?;
        colorbar(&bar, colorous::VIRIDIS, range, "Betti number")?;
    }
    root.present()?;
    log::info!("Betti heatmaps written to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_around_thresholds() {
        assert!(cell_edges(&[]).is_empty());
        assert_eq!(cell_edges(&[2.]), vec![1.5, 2.5]);
        assert_eq!(cell_edges(&[0., 1., 2.]), vec![-0.5, 0.5, 1.5, 2.5]);
    }
}

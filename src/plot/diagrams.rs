use super::{series_color, PlotError, Result, FONT};
use crate::topology::{PersistenceDiagram, PersistenceInterval};
use itertools::Itertools;
use plotters::prelude::*;
use std::path::Path;

/// Value standing for the death of the essential classes
fn infinity(diagram: &PersistenceDiagram) -> f64 {
    let max = diagram.max_finite_value();
    if max > 0. {
        1.1 * max
    } else {
        1.
    }
}

fn death_or(interval: &PersistenceInterval, infinity: f64) -> f64 {
    if interval.is_essential() {
        infinity
    } else {
        interval.death
    }
}

/// Birth versus death scatter plot of the persistence intervals
///
/// The essential classes are drawn on the "∞" line.
pub fn persistence_diagram<P: AsRef<Path>>(
    diagram: &PersistenceDiagram,
    path: P,
    title: &str,
) -> Result<()> {
    if diagram.intervals().is_empty() {
        return Err(PlotError::NoData(format!("{:?}", path.as_ref())));
    }
    let inf = infinity(diagram);
    let upper = 1.05 * inf;

    let root = BitMapBackend::new(path.as_ref(), (768, 768)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.02 * upper..upper, -0.02 * upper..upper)?;
    chart
        .configure_mesh()
        .x_desc("Birth")
        .y_desc("Death")
        .draw()?;
    chart.draw_series(LineSeries::new(
        [(0., 0.), (upper, upper)],
        BLACK.mix(0.5).stroke_width(1),
    ))?;
    chart
        .draw_series(LineSeries::new(
            [(0., inf), (upper, inf)],
            BLACK.mix(0.4).stroke_width(1),
        ))?
        .label("∞")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));

    for dimension in 0..=diagram.max_homology_dim() {
        let color = series_color(dimension);
        chart
            .draw_series(
                diagram
                    .dim(dimension)
                    .map(|i| Circle::new((i.birth, death_or(i, inf)), 4, color.mix(0.7).filled())),
            )?
            .label(format!("H{dimension}"))
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;
    root.present()?;
    log::info!("Persistence diagram written to {:?}", path.as_ref());
    Ok(())
}

/// One horizontal bar per persistence interval, grouped by homology dimension
pub fn persistence_barcode<P: AsRef<Path>>(
    diagram: &PersistenceDiagram,
    path: P,
    title: &str,
) -> Result<()> {
    if diagram.intervals().is_empty() {
        return Err(PlotError::NoData(format!("{:?}", path.as_ref())));
    }
    let inf = infinity(diagram);
    let bars: Vec<_> = diagram
        .intervals()
        .iter()
        .sorted_by(|a, b| {
            a.dimension
                .cmp(&b.dimension)
                .then(a.birth.total_cmp(&b.birth))
                .then(death_or(b, inf).total_cmp(&death_or(a, inf)))
        })
        .collect();
    let n = bars.len() as f64;

    let root = BitMapBackend::new(path.as_ref(), (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(20)
        .build_cartesian_2d(0f64..1.05 * inf, -0.5..n - 0.5)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("Filtration value")
        .draw()?;
    for (dimension, group) in &bars.iter().enumerate().chunk_by(|(_, i)| i.dimension) {
        let color = series_color(dimension);
        chart
            .draw_series(group.map(|(k, i)| {
                let y = k as f64;
                Rectangle::new(
                    [(i.birth, y - 0.35), (death_or(i, inf), y + 0.35)],
                    color.filled(),
                )
            }))?
            .label(format!("H{dimension}"))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;
    root.present()?;
    log::info!("Persistence barcode written to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::RipsComplex;

    #[test]
    fn essential_classes_above_the_finite_values(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let complex = RipsComplex::new(&points).max_edge_length(2.0).build()?;
        let diagram = PersistenceDiagram::compute(&complex);
        let inf = infinity(&diagram);
        assert!((inf - 1.1 * 2f64.sqrt()).abs() < 1e-12);
        assert!(diagram
            .intervals()
            .iter()
            .all(|i| death_or(i, inf) <= inf));
        Ok(())
    }
}

use super::{padded_range, Result, FONT};
use crate::{binning::finite_range, topology::SimplicialComplex};
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};
use std::{f64::consts::PI, ops::Range, path::Path};

/// Blue of the ε balls
const BALL: RGBColor = RGBColor(31, 119, 180);
/// Brown of the triangles
const TRIANGLE: RGBColor = RGBColor(165, 42, 42);

/// Square axes with the same range along x and y
fn square_axes(points: &[[f64; 2]], margin: f64) -> (Range<f64>, Range<f64>) {
    let x: Vec<f64> = points.iter().map(|p| p[0]).collect();
    let y: Vec<f64> = points.iter().map(|p| p[1]).collect();
    let (x_min, x_max) = finite_range(&x).unwrap_or((-1., 1.));
    let (y_min, y_max) = finite_range(&y).unwrap_or((-1., 1.));
    let half = 0.5 * (x_max - x_min).max(y_max - y_min) + margin;
    let (xc, yc) = (0.5 * (x_min + x_max), 0.5 * (y_min + y_max));
    (
        padded_range((xc - half, xc + half), 0.),
        padded_range((yc - half, yc + half), 0.),
    )
}

/// Polygon approximation of a circle
fn disk(center: [f64; 2], radius: f64) -> Vec<(f64, f64)> {
    (0..64)
        .map(|k| {
            let (s, c) = (2. * PI * k as f64 / 64.).sin_cos();
            (center[0] + radius * c, center[1] + radius * s)
        })
        .collect()
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Chart without axes
fn figure<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    title: &str,
    points: &[[f64; 2]],
    margin: f64,
) -> std::result::Result<Chart<'a, DB>, DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (x_range, y_range) = square_axes(points, margin);
    ChartBuilder::on(root)
        .caption(title, (FONT, 18))
        .margin(10)
        .build_cartesian_2d(x_range, y_range)
}

fn draw_points<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    points: &[[f64; 2]],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p[0], p[1]), 3, BLACK.filled())),
    )?;
    Ok(())
}

/// Scatter plot of the toy point cloud
pub fn toy_point_cloud<P: AsRef<Path>>(points: &[[f64; 2]], path: P) -> Result<()> {
    let root = BitMapBackend::new(path.as_ref(), (512, 512)).into_drawing_area();
    let mut chart = figure(&root, "Figure 1: Point Set Data Cloud (Wavy Curve)", points, 0.1)?;
    draw_points(&mut chart, points)?;
    root.present()?;
    log::info!("Toy point cloud written to {:?}", path.as_ref());
    Ok(())
}

/// Toy point cloud with the balls of radius `epsilon` around the points
pub fn toy_epsilon_balls<P: AsRef<Path>>(points: &[[f64; 2]], epsilon: f64, path: P) -> Result<()> {
    let root = BitMapBackend::new(path.as_ref(), (512, 512)).into_drawing_area();
    let mut chart = figure(&root, "Figure 2: Data Cloud with Radius ε", points, epsilon + 0.05)?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Polygon::new(disk(p, epsilon), BALL.mix(0.3).filled())),
    )?;
    draw_points(&mut chart, points)?;
    root.present()?;
    log::info!("Toy ε balls written to {:?}", path.as_ref());
    Ok(())
}

/// Edges and filled triangles of the toy Vietoris-Rips complex
pub fn toy_complex<P: AsRef<Path>>(
    points: &[[f64; 2]],
    complex: &SimplicialComplex,
    path: P,
) -> Result<()> {
    let root = BitMapBackend::new(path.as_ref(), (512, 512)).into_drawing_area();
    let mut chart = figure(&root, "Figure 3: Vietoris–Rips Complex (with tol)", points, 0.1)?;
    let xy = |i: usize| (points[i][0], points[i][1]);
    chart.draw_series(complex.triangles().map(|[a, b, c]| {
        Polygon::new(vec![xy(a), xy(b), xy(c)], TRIANGLE.mix(0.5).filled())
    }))?;
    chart.draw_series(
        complex
            .edges()
            .map(|(a, b)| PathElement::new(vec![xy(a), xy(b)], &BLACK)),
    )?;
    draw_points(&mut chart, points)?;
    root.present()?;
    log::info!("Toy complex written to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_aspect() {
        let (x, y) = square_axes(&[[0., 0.], [4., 1.]], 0.5);
        assert_eq!(x, -0.5..4.5);
        assert_eq!(y, -2.0..3.0);
        assert_eq!(disk([1., 1.], 2.)[0], (3., 1.));
    }
}

//! Binning statistics
//!
//! Evenly spaced values, histograms, per-bin medians and hexagonal binning used to
//! explore the catalog extinction before the topological analysis.

use itertools::Itertools;
use std::collections::HashMap;

/// `n` evenly spaced values from `start` to `stop`, both included
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Returns the (min,max) of the finite values
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .minmax_by(f64::total_cmp)
        .into_option()
}

/// Histogram bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Histogram with `n_bins` of equal width between the min and max values
///
/// The bins are half-open but for the last one that includes the max value.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<Bin> {
    let Some((min, max)) = finite_range(values) else {
        return vec![];
    };
    if n_bins == 0 {
        return vec![];
    }
    let (min, max) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let edges = linspace(min, max, n_bins + 1);
    let width = (max - min) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &x in values.iter().filter(|x| x.is_finite()) {
        let k = (((x - min) / width) as usize).min(n_bins - 1);
        counts[k] += 1;
    }
    edges
        .iter()
        .tuple_windows()
        .zip(counts)
        .map(|((&start, &end), count)| Bin { start, end, count })
        .collect()
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    Some(if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    })
}

/// Median of `y` for the `x` values within each of the bins `(edges[k],edges[k+1]]`
///
/// Returns the bin centers and the medians, `None` for empty bins.
/// Values equal to the lowest edge are left out as they fall outside of the first bin.
pub fn binned_median(x: &[f64], y: &[f64], edges: &[f64]) -> Vec<(f64, Option<f64>)> {
    let mut groups: Vec<Vec<f64>> = vec![vec![]; edges.len().saturating_sub(1)];
    for (&x, &y) in x.iter().zip(y) {
        if let Some(k) = edges
            .iter()
            .tuple_windows()
            .position(|(&lower, &upper)| x > lower && x <= upper)
        {
            groups[k].push(y);
        }
    }
    edges
        .iter()
        .tuple_windows()
        .zip(groups.iter_mut())
        .map(|((&lower, &upper), group)| (0.5 * (lower + upper), median(group)))
        .collect()
}

/// Hexagonal bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexCell {
    pub center: (f64, f64),
    pub count: usize,
    pub mean: f64,
}

/// Hexagonal binning of `c` values located at (`x`,`y`)
#[derive(Debug, Clone, Default)]
pub struct HexBins {
    /// Horizontal hexagon spacing
    pub sx: f64,
    /// Vertical hexagon spacing
    pub sy: f64,
    pub cells: Vec<HexCell>,
}
impl HexBins {
    /// Bins the data into `gridsize` hexagons along the x axis
    ///
    /// The hexagons are centered on 2 interleaved rectangular lattices, each point is
    /// assigned to the closest center.
    pub fn new(x: &[f64], y: &[f64], c: &[f64], gridsize: usize) -> Self {
        let (Some((xmin, xmax)), Some((ymin, ymax))) = (finite_range(x), finite_range(y)) else {
            return Self::default();
        };
        let nx = gridsize.max(1) as f64;
        let ny = (nx / 3f64.sqrt()).floor().max(1.);
        let padding = |min: f64, max: f64| {
            let pad = 1e-9 * (max - min).abs().max(1.);
            (min - pad, max + pad)
        };
        let (xmin, xmax) = padding(xmin, xmax);
        let (ymin, ymax) = padding(ymin, ymax);
        let sx = (xmax - xmin) / nx;
        let sy = (ymax - ymin) / ny;

        let mut bins: HashMap<(bool, i64, i64), (usize, f64)> = HashMap::new();
        for ((&x, &y), &c) in x.iter().zip(y).zip(c) {
            if !(x.is_finite() && y.is_finite() && c.is_finite()) {
                continue;
            }
            let ix = (x - xmin) / sx;
            let iy = (y - ymin) / sy;
            let (ix1, iy1) = (ix.round(), iy.round());
            let (ix2, iy2) = (ix.floor(), iy.floor());
            let d1 = (ix - ix1).powi(2) + 3. * (iy - iy1).powi(2);
            let d2 = (ix - ix2 - 0.5).powi(2) + 3. * (iy - iy2 - 0.5).powi(2);
            let key = if d1 < d2 {
                (true, ix1 as i64, iy1 as i64)
            } else {
                (false, ix2 as i64, iy2 as i64)
            };
            let entry = bins.entry(key).or_insert((0, 0.));
            entry.0 += 1;
            entry.1 += c;
        }
        let cells = bins
            .into_iter()
            .sorted_by_key(|(key, _)| *key)
            .map(|((first_lattice, i, j), (count, sum))| {
                let offset = if first_lattice { 0. } else { 0.5 };
                HexCell {
                    center: (
                        xmin + (i as f64 + offset) * sx,
                        ymin + (j as f64 + offset) * sy,
                    ),
                    count,
                    mean: sum / count as f64,
                }
            })
            .collect();
        Self { sx, sy, cells }
    }
    /// Hexagon vertices around a center
    pub fn hexagon(&self, center: (f64, f64)) -> Vec<(f64, f64)> {
        [
            (0.5, -0.5),
            (0.5, 0.5),
            (0., 1.),
            (-0.5, 0.5),
            (-0.5, -0.5),
            (0., -1.),
        ]
        .into_iter()
        .map(|(u, v)| (center.0 + u * self.sx, center.1 + v * self.sy / 3.))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evenly_spaced() {
        assert_eq!(linspace(0., 1., 5), vec![0., 0.25, 0.5, 0.75, 1.]);
        assert_eq!(linspace(2., 3., 1), vec![2.]);
        assert!(linspace(2., 3., 0).is_empty());
        assert_eq!(linspace(0.3, 0.3, 3), vec![0.3, 0.3, 0.3]);
    }

    #[test]
    fn histogram_includes_the_max_value() {
        let bins = histogram(&[0., 0.5, 1., 1.5, 2., 2.], 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(
            bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 3]
        );
        assert_eq!(bins[0].start, 0.);
        assert_eq!(bins[3].end, 2.);
    }

    #[test]
    fn medians_per_bin() {
        let x = [0., 0.2, 0.4, 0.6, 0.8, 1.];
        let y = [9., 1., 2., 3., 5., 7.];
        let medians = binned_median(&x, &y, &linspace(0., 1., 3));
        assert_eq!(medians.len(), 2);
        assert_eq!(medians[0], (0.25, Some(1.5)));
        assert_eq!(medians[1], (0.75, Some(5.)));
        let medians = binned_median(&x, &y, &[0., 0.1, 0.15, 1.]);
        assert_eq!(medians[1].1, None);
    }

    #[test]
    fn hexagonal_binning_conserves_counts() {
        let x: Vec<f64> = (0..100).map(|i| (i % 10) as f64).collect();
        let y: Vec<f64> = (0..100).map(|i| (i / 10) as f64).collect();
        let c = vec![2.; 100];
        let hex = HexBins::new(&x, &y, &c, 5);
        assert_eq!(hex.cells.iter().map(|cell| cell.count).sum::<usize>(), 100);
        assert!(hex.cells.iter().all(|cell| cell.mean == 2.));
        assert_eq!(hex.hexagon((0., 0.)).len(), 6);
    }
}

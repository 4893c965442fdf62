//! Bifiltration sweep
//!
//! For each pair of thresholds (t1,t2) of a grid, the points with their first filtration
//! value below or at t1 and their second filtration value below or at t2 are kept, the
//! Vietoris-Rips complex of these points is built with t2 as the maximum edge length and
//! the Betti numbers of the complex are computed.
//!
//! ```no_run
//! use galaxy_tda::{catalog::CatalogLoader, features::Features, sweep::{Sweep, SweepConfig, ThresholdGrid}};
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = CatalogLoader::default().sample(1000, 42).load()?;
//! let features = Features::extinction_nn(&catalog)?;
//! let config = SweepConfig::default().resolution(10, 10);
//! let grid = ThresholdGrid::linspace(&features, config.resolution);
//! let betti = Sweep::new(config).run(&features, &grid);
//! # Ok(())
//! # }
//! ```

use crate::{
    binning::{finite_range, linspace},
    features::Features,
    topology::{betti_numbers, BettiNumbers, HomologyDimension, RipsComplex, TopologyError},
};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path, time::Instant};

/// Sweep settings
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of thresholds along the first and second filtration axis
    pub resolution: (usize, usize),
    /// Largest homology dimension
    pub max_homology_dim: usize,
    /// Maximum number of simplices of a cell complex
    pub max_simplices: Option<usize>,
    /// Shows a progress bar
    pub progress: bool,
}
impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            resolution: (10, 10),
            max_homology_dim: 2,
            max_simplices: None,
            progress: false,
        }
    }
}
impl SweepConfig {
    pub fn resolution(self, n_first: usize, n_second: usize) -> Self {
        Self {
            resolution: (n_first, n_second),
            ..self
        }
    }
    pub fn max_homology_dim(self, max_homology_dim: usize) -> Self {
        Self {
            max_homology_dim,
            ..self
        }
    }
    pub fn max_simplices(self, max_simplices: usize) -> Self {
        Self {
            max_simplices: Some(max_simplices),
            ..self
        }
    }
    pub fn progress(self) -> Self {
        Self {
            progress: true,
            ..self
        }
    }
}

/// Thresholds of the first and second filtration values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdGrid {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}
impl ThresholdGrid {
    pub fn new(first: Vec<f64>, second: Vec<f64>) -> Self {
        Self { first, second }
    }
    /// Evenly spaced thresholds from the minimum to the maximum of the filtration values
    pub fn linspace(features: &Features, resolution: (usize, usize)) -> Self {
        let axis = |values: &[f64], n: usize| {
            finite_range(values)
                .map(|(min, max)| linspace(min, max, n))
                .unwrap_or_default()
        };
        Self {
            first: axis(features.first(), resolution.0),
            second: axis(features.second(), resolution.1),
        }
    }
    /// Grid shape
    pub fn shape(&self) -> (usize, usize) {
        (self.first.len(), self.second.len())
    }
    /// Number of cells
    pub fn len(&self) -> usize {
        self.first.len() * self.second.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Grid indices and thresholds of the k-th cell in row-major order
    pub fn cell(&self, k: usize) -> (usize, usize, f64, f64) {
        let n = self.second.len();
        let (i, j) = (k / n, k % n);
        (i, j, self.first[i], self.second[j])
    }
}

/// Betti numbers of a grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
    pub first_threshold: f64,
    pub second_threshold: f64,
    /// Number of points within the thresholds
    pub n_points: usize,
    /// `None` if the homology computation failed
    pub betti: Option<BettiNumbers>,
}

/// Cell where the homology computation failed
#[derive(Debug, Clone, PartialEq)]
pub struct CellFailure {
    pub i: usize,
    pub j: usize,
    pub first_threshold: f64,
    pub second_threshold: f64,
    pub error: TopologyError,
}

#[derive(Serialize)]
struct CellRecord {
    i: usize,
    j: usize,
    first_threshold: f64,
    second_threshold: f64,
    n_points: usize,
    betti_0: Option<usize>,
    betti_1: Option<usize>,
    betti_2: Option<usize>,
}
impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        Self {
            i: cell.i,
            j: cell.j,
            first_threshold: cell.first_threshold,
            second_threshold: cell.second_threshold,
            n_points: cell.n_points,
            betti_0: cell.betti.map(|b| b.beta_0),
            betti_1: cell.betti.map(|b| b.beta_1),
            betti_2: cell.betti.map(|b| b.beta_2),
        }
    }
}

/// Betti numbers over the threshold grid
#[derive(Debug, Clone, Default)]
pub struct BettiGrid {
    thresholds: ThresholdGrid,
    cells: Vec<Cell>,
    failures: Vec<CellFailure>,
}
impl BettiGrid {
    pub fn thresholds(&self) -> &ThresholdGrid {
        &self.thresholds
    }
    /// Cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        let (n_first, n_second) = self.thresholds.shape();
        if i < n_first && j < n_second {
            self.cells.get(i * n_second + j)
        } else {
            None
        }
    }
    pub fn failures(&self) -> &[CellFailure] {
        &self.failures
    }
    /// Betti numbers of a given dimension, the rows follow the first filtration thresholds
    ///
    /// Failed cells are set to NaN.
    pub fn betti(&self, dimension: HomologyDimension) -> DMatrix<f64> {
        let (n_first, n_second) = self.thresholds.shape();
        DMatrix::from_fn(n_first, n_second, |i, j| {
            self.cells[i * n_second + j]
                .betti
                .map_or(f64::NAN, |b| b.get(dimension) as f64)
        })
    }
    /// Writes the cells as CSV records
    pub fn to_writer<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for cell in &self.cells {
            wtr.serialize(CellRecord::from(cell))?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Writes the cells to a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> csv::Result<()> {
        let path = path.as_ref();
        self.to_writer(File::create(path)?)?;
        log::info!("Betti grid written to {:?}", path);
        Ok(())
    }
}

/// Betti numbers sweep over a grid of thresholds
#[derive(Debug, Clone, Default)]
pub struct Sweep {
    config: SweepConfig,
}
impl Sweep {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }
    /// Homology of the points within the thresholds
    fn cell(
        &self,
        features: &Features,
        first_threshold: f64,
        second_threshold: f64,
    ) -> (usize, Result<BettiNumbers, TopologyError>) {
        let survivors = features.survivors(first_threshold, second_threshold);
        let n_points = survivors.len();
        if n_points < 2 {
            return (n_points, Ok(BettiNumbers::new(n_points, 0, 0)));
        }
        let points = features.points().select(&survivors);
        let betti = RipsComplex::new(points.as_slice())
            .max_edge_length(second_threshold)
            .max_dimension(self.config.max_homology_dim + 1)
            .max_simplices(self.config.max_simplices)
            .build()
            .map(|complex| BettiNumbers::from_slice(&betti_numbers(&complex)));
        (n_points, betti)
    }
    /// Computes the Betti numbers of each cell of the grid
    ///
    /// The cells are processed in parallel, a cell that fails is reported in
    /// [BettiGrid::failures] and does not interrupt the sweep.
    pub fn run(&self, features: &Features, thresholds: &ThresholdGrid) -> BettiGrid {
        let (n_first, n_second) = thresholds.shape();
        log::info!(
            "Sweeping {}x{} thresholds over {} points...",
            n_first,
            n_second,
            features.len()
        );
        let now = Instant::now();

        let pb = if self.config.progress {
            let pb = ProgressBar::new(thresholds.len() as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "[{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            ) {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };
        let outcomes: Vec<_> = (0..thresholds.len())
            .into_par_iter()
            .progress_with(pb)
            .map(|k| {
                let (i, j, t1, t2) = thresholds.cell(k);
                let (n_points, betti) = self.cell(features, t1, t2);
                ((i, j, t1, t2, n_points), betti)
            })
            .collect();

        let mut cells = Vec::with_capacity(outcomes.len());
        let mut failures = vec![];
        for ((i, j, first_threshold, second_threshold, n_points), betti) in outcomes {
            let betti = match betti {
                Ok(betti) => {
                    log::debug!(
                        "cell ({},{}) @ ({:.4},{:.4}): {} points, {:?}",
                        i,
                        j,
                        first_threshold,
                        second_threshold,
                        n_points,
                        betti
                    );
                    Some(betti)
                }
                Err(error) => {
                    log::warn!(
                        "cell ({},{}) @ ({:.4},{:.4}) with {} points failed: {}",
                        i,
                        j,
                        first_threshold,
                        second_threshold,
                        n_points,
                        error
                    );
                    failures.push(CellFailure {
                        i,
                        j,
                        first_threshold,
                        second_threshold,
                        error,
                    });
                    None
                }
            };
            cells.push(Cell {
                i,
                j,
                first_threshold,
                second_threshold,
                n_points,
                betti,
            });
        }
        log::info!(
            "... swept in {:.3}s ({} failed cells)",
            now.elapsed().as_secs_f64(),
            failures.len()
        );
        BettiGrid {
            thresholds: thresholds.clone(),
            cells,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureError, PointCloud};

    type Result<T> = std::result::Result<T, FeatureError>;

    fn features(points: Vec<[f64; 3]>, first: Vec<f64>, second: Vec<f64>) -> Result<Features> {
        Features::new(PointCloud::from(points), first, second)
    }

    fn square() -> Vec<[f64; 3]> {
        vec![[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]]
    }

    #[test]
    fn filled_triangle() -> Result<()> {
        let points = vec![[0., 0., 0.], [1., 0., 0.], [0.5, 0.75f64.sqrt(), 0.]];
        let features = features(points, vec![0.; 3], vec![0.; 3])?;
        let grid = ThresholdGrid::new(vec![1.5], vec![1.5]);
        let betti = Sweep::default().run(&features, &grid);
        let cell = betti.cell(0, 0).unwrap();
        assert_eq!(cell.n_points, 3);
        assert_eq!(cell.betti, Some(BettiNumbers::new(1, 0, 0)));
        assert!(betti.failures().is_empty());
        Ok(())
    }

    #[test]
    fn square_cycle() -> Result<()> {
        let features = features(square(), vec![0.; 4], vec![1.; 4])?;
        let grid = ThresholdGrid::new(vec![0.], vec![1.2]);
        let betti = Sweep::default().run(&features, &grid);
        let b = betti.cell(0, 0).and_then(|cell| cell.betti).unwrap();
        assert_eq!(b.beta_0, 1);
        assert_eq!(b.beta_1, 1);
        assert_eq!(betti.betti(HomologyDimension::Loops)[(0, 0)], 1.);
        Ok(())
    }

    #[test]
    fn empty_cells() -> Result<()> {
        let features = features(square(), vec![0.5; 4], vec![1.; 4])?;
        let grid = ThresholdGrid::new(vec![0.1, 0.2], vec![0.1, 2.0]);
        let betti = Sweep::default().run(&features, &grid);
        for cell in betti.cells() {
            assert_eq!(cell.n_points, 0);
            assert_eq!(cell.betti, Some(BettiNumbers::default()));
        }
        Ok(())
    }

    #[test]
    fn single_survivor() -> Result<()> {
        let features = features(square(), vec![0.1, 0.5, 0.5, 0.5], vec![1.; 4])?;
        let grid = ThresholdGrid::new(vec![0.2], vec![1.5]);
        let betti = Sweep::default().run(&features, &grid);
        assert_eq!(
            betti.cell(0, 0).and_then(|cell| cell.betti),
            Some(BettiNumbers::new(1, 0, 0))
        );
        Ok(())
    }

    #[test]
    fn row_major_order() -> Result<()> {
        let features = features(square(), vec![0., 1., 2., 3.], vec![1.; 4])?;
        let grid = ThresholdGrid::new(vec![0., 1., 2., 3.], vec![0.5, 1.5]);
        let betti = Sweep::default().run(&features, &grid);
        assert_eq!(betti.cells().len(), 8);
        for (k, cell) in betti.cells().iter().enumerate() {
            assert_eq!((cell.i, cell.j), (k / 2, k % 2));
            assert_eq!(cell.first_threshold, grid.first[k / 2]);
            assert_eq!(cell.second_threshold, grid.second[k % 2]);
        }
        let betti_0 = betti.betti(HomologyDimension::Components);
        assert_eq!(betti_0.shape(), (4, 2));
        // no point within the lowest second threshold
        assert_eq!(betti_0.column(0).iter().copied().collect::<Vec<_>>(), vec![0., 0., 0., 0.]);
        assert_eq!(betti_0.column(1).iter().copied().collect::<Vec<_>>(), vec![1., 1., 1., 1.]);
        Ok(())
    }

    #[test]
    fn betti_numbers_are_consistent() -> Result<()> {
        let points: Vec<[f64; 3]> = (0..20)
            .map(|i| {
                let t = i as f64;
                [(0.7 * t).cos() * 2., (1.3 * t).sin() * 2., 0.1 * t]
            })
            .collect();
        let first: Vec<f64> = (0..20).map(|i| ((i * 7) % 20) as f64 / 20.).collect();
        let nn = PointCloud::from(points.clone()).nearest_neighbor_distances()?;
        let features = features(points, first, nn)?;
        let grid = ThresholdGrid::linspace(&features, (5, 5));
        let betti = Sweep::default().run(&features, &grid);
        assert!(betti.failures().is_empty());
        for cell in betti.cells() {
            let b = cell.betti.unwrap();
            assert!(b.beta_0 <= cell.n_points);
            if cell.n_points > 0 {
                assert!(b.beta_0 >= 1);
            }
        }
        Ok(())
    }

    #[test]
    fn evenly_spaced_thresholds() -> Result<()> {
        let features = features(
            vec![[0., 0., 0.], [1., 0., 0.], [2., 0., 0.]],
            vec![2., 0., 1.],
            vec![0.5, 2.5, 1.5],
        )?;
        let grid = ThresholdGrid::linspace(&features, (3, 2));
        assert_eq!(grid.first, vec![0., 1., 2.]);
        assert_eq!(grid.second, vec![0.5, 2.5]);
        assert_eq!(grid.shape(), (3, 2));
        Ok(())
    }

    #[test]
    fn failed_cells_are_isolated() -> Result<()> {
        let points = vec![[0., 0., 0.], [1., 0., 0.], [0.5, 0.75f64.sqrt(), 0.]];
        let features = features(points, vec![0., 0.5, 0.5], vec![0.; 3])?;
        let grid = ThresholdGrid::new(vec![0., 1.], vec![1.5]);
        let betti = Sweep::new(SweepConfig::default().max_simplices(5)).run(&features, &grid);
        assert_eq!(
            betti.cell(0, 0).and_then(|cell| cell.betti),
            Some(BettiNumbers::new(1, 0, 0))
        );
        assert_eq!(betti.cell(1, 0).and_then(|cell| cell.betti), None);
        assert_eq!(betti.failures().len(), 1);
        assert_eq!(betti.failures()[0].error, TopologyError::TooManySimplices(5));
        assert!(betti.betti(HomologyDimension::Components)[(1, 0)].is_nan());
        Ok(())
    }

    #[test]
    fn csv_table() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = vec![[0., 0., 0.], [f64::INFINITY, 0., 0.]];
        let features = features(points, vec![0.; 2], vec![0.; 2])?;
        let grid = ThresholdGrid::new(vec![0.], vec![0., 1.]);
        let betti = Sweep::default().run(&features, &grid);
        let mut buffer = vec![];
        betti.to_writer(&mut buffer)?;
        let table = String::from_utf8(buffer)?;
        let mut lines = table.lines();
        assert_eq!(
            lines.next(),
            Some("i,j,first_threshold,second_threshold,n_points,betti_0,betti_1,betti_2")
        );
        assert_eq!(lines.next(), Some("0,0,0.0,0.0,2,,,"));
        assert_eq!(lines.next(), Some("0,1,0.0,1.0,2,,,"));
        assert_eq!(betti.failures().len(), 2);
        Ok(())
    }
}

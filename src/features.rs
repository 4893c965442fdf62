//! Point cloud and filtration values
//!
//! The point cloud is made of the (ra,dec,redshift) coordinates of the galaxies and each
//! galaxy is given a pair of filtration values, by default its r-band extinction and the
//! distance to its nearest neighbor in the point cloud.

use crate::{
    catalog::{Catalog, CatalogError, EXTINCTION_COLUMN, SPATIAL_COLUMNS},
    rivet::Bifiltration,
    topology::euclidean,
};
use rayon::prelude::*;
use std::ops::Deref;

#[derive(thiserror::Error, Debug)]
pub enum FeatureError {
    #[error("Failed to extract features from the catalog")]
    Catalog(#[from] CatalogError),
    #[error(
        "Features length mismatch: {points} points but {first} and {second} filtration values"
    )]
    LengthMismatch {
        points: usize,
        first: usize,
        second: usize,
    },
    #[error("Nearest neighbor distances require at least 2 points, found {0}")]
    TooFewPoints(usize),
}
type Result<T> = std::result::Result<T, FeatureError>;

/// Galaxies 3D coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud(Vec<[f64; 3]>);
impl Deref for PointCloud {
    type Target = Vec<[f64; 3]>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl From<Vec<[f64; 3]>> for PointCloud {
    fn from(points: Vec<[f64; 3]>) -> Self {
        Self(points)
    }
}
impl PointCloud {
    /// Builds the point cloud from 3 catalog columns
    pub fn from_catalog(catalog: &Catalog, columns: [&str; 3]) -> Result<Self> {
        let x = catalog.values(columns[0])?;
        let y = catalog.values(columns[1])?;
        let z = catalog.values(columns[2])?;
        Ok(Self(
            x.into_iter()
                .zip(y)
                .zip(z)
                .map(|((x, y), z)| [x, y, z])
                .collect(),
        ))
    }
    /// Returns the points at the given indices
    pub fn select(&self, indices: &[usize]) -> Self {
        Self(indices.iter().map(|&i| self.0[i]).collect())
    }
    /// Iterator over the coordinates along a given axis
    pub fn axis_iter(&self, axis: usize) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(move |p| p[axis])
    }
    /// Returns the (min,max) range of the coordinates along a given axis
    pub fn axis_range(&self, axis: usize) -> (f64, f64) {
        (
            self.axis_iter(axis).fold(f64::INFINITY, f64::min),
            self.axis_iter(axis).fold(f64::NEG_INFINITY, f64::max),
        )
    }
    /// Returns, for each point, the Euclidean distance to its closest neighbor
    ///
    /// Coincident points are 0 distance apart.
    pub fn nearest_neighbor_distances(&self) -> Result<Vec<f64>> {
        if self.len() < 2 {
            return Err(FeatureError::TooFewPoints(self.len()));
        }
        Ok(self
            .0
            .par_iter()
            .enumerate()
            .map(|(i, p)| {
                self.0
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, q)| euclidean(p, q))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect())
    }
}

/// Point cloud and the 2 filtration values of each point
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    points: PointCloud,
    first: Vec<f64>,
    second: Vec<f64>,
}
impl Features {
    /// Creates the features, checking that there is a pair of filtration values per point
    pub fn new(points: PointCloud, first: Vec<f64>, second: Vec<f64>) -> Result<Self> {
        if first.len() != points.len() || second.len() != points.len() {
            return Err(FeatureError::LengthMismatch {
                points: points.len(),
                first: first.len(),
                second: second.len(),
            });
        }
        Ok(Self {
            points,
            first,
            second,
        })
    }
    /// Extinction and nearest neighbor distance filtrations of the (ra,dec,redshift) point cloud
    pub fn extinction_nn(catalog: &Catalog) -> Result<Self> {
        let points = PointCloud::from_catalog(catalog, SPATIAL_COLUMNS)?;
        let extinction = catalog.values(EXTINCTION_COLUMN)?;
        let nn = points.nearest_neighbor_distances()?;
        Self::new(points, extinction, nn)
    }
    /// Point cloud with filtration values read from a RIVET bifiltration file
    pub fn from_bifiltration(points: PointCloud, bifiltration: &Bifiltration) -> Result<Self> {
        let (first, second) = bifiltration.iter().cloned().unzip();
        Self::new(points, first, second)
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn points(&self) -> &PointCloud {
        &self.points
    }
    /// First filtration values
    pub fn first(&self) -> &[f64] {
        &self.first
    }
    /// Second filtration values
    pub fn second(&self) -> &[f64] {
        &self.second
    }
    /// Indices of the points with both filtration values below or at the thresholds
    pub fn survivors(&self, first_threshold: f64, second_threshold: f64) -> Vec<usize> {
        self.first
            .iter()
            .zip(&self.second)
            .enumerate()
            .filter_map(|(i, (&f, &s))| (f <= first_threshold && s <= second_threshold).then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogLoader;

    #[test]
    fn nearest_neighbors() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = PointCloud::from(vec![[0., 0., 0.], [1., 0., 0.], [3., 0., 0.], [3., 4., 0.]]);
        assert_eq!(points.nearest_neighbor_distances()?, vec![1., 1., 2., 4.]);
        Ok(())
    }

    #[test]
    fn coincident_points() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = PointCloud::from(vec![[1., 2., 3.], [1., 2., 3.], [5., 2., 3.]]);
        assert_eq!(points.nearest_neighbor_distances()?, vec![0., 0., 4.]);
        Ok(())
    }

    #[test]
    fn single_point_has_no_neighbor() {
        let points = PointCloud::from(vec![[1., 2., 3.]]);
        assert!(matches!(
            points.nearest_neighbor_distances(),
            Err(FeatureError::TooFewPoints(1))
        ));
    }

    #[test]
    fn length_mismatch() {
        let points = PointCloud::from(vec![[0., 0., 0.], [1., 0., 0.]]);
        assert!(matches!(
            Features::new(points, vec![0.1, 0.2], vec![1.]),
            Err(FeatureError::LengthMismatch {
                points: 2,
                first: 2,
                second: 1
            })
        ));
    }

    #[test]
    fn extinction_and_nearest_neighbor() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let csv = "ra,dec,redshift,extinction_r\n0,0,0,0.3\n0,2,0,0.1\n0,2,1,0.2\n";
        let catalog = CatalogLoader::default().from_reader(csv.as_bytes())?;
        let features = Features::extinction_nn(&catalog)?;
        assert_eq!(features.len(), 3);
        assert_eq!(features.first(), &[0.3, 0.1, 0.2]);
        assert_eq!(features.second(), &[2., 1., 1.]);
        Ok(())
    }

    #[test]
    fn survivors_grow_with_thresholds() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let points = PointCloud::from((0..6).map(|i| [i as f64, 0., 0.]).collect::<Vec<_>>());
        let features = Features::new(
            points,
            vec![0.5, 0.1, 0.3, 0.9, 0.2, 0.7],
            vec![1.0, 3.0, 2.0, 0.5, 1.5, 2.5],
        )?;
        let thresholds = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
        for &t2 in &thresholds {
            let mut previous: Vec<usize> = vec![];
            for &t1 in &thresholds {
                let current = features.survivors(t1, t2 * 3.);
                assert!(previous.iter().all(|i| current.contains(i)));
                previous = current;
            }
        }
        assert!(features.survivors(0.05, 10.).is_empty());
        assert_eq!(features.survivors(1., 10.).len(), 6);
        Ok(())
    }
}

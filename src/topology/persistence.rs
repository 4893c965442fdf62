//! Persistent homology via the standard algorithm
//!
//! 1. sort the simplices by (filtration value, dimension, vertices)
//! 2. reduce the boundary matrix with left-to-right column additions over GF(2)
//! 3. a reduced column with lowest row `l` kills the class born with simplex `l`,
//!    a zero column that is never a pivot creates an essential class

use super::SimplicialComplex;
use std::collections::HashMap;

/// Birth and death of an homology class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceInterval {
    pub dimension: usize,
    pub birth: f64,
    /// [f64::INFINITY] for essential classes
    pub death: f64,
}
impl PersistenceInterval {
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }
    /// Returns true if the class never dies
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Sparse boundary matrix column as sorted row indices
#[derive(Debug, Clone, Default)]
struct Column(Vec<usize>);
impl Column {
    fn low(&self) -> Option<usize> {
        self.0.last().copied()
    }
    /// Addition in GF(2): symmetric difference of the row indices
    fn add_assign(&mut self, other: &Column) {
        let (a, b) = (&self.0, &other.0);
        let mut sum = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    sum.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    sum.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        sum.extend_from_slice(&a[i..]);
        sum.extend_from_slice(&b[j..]);
        self.0 = sum;
    }
}

/// Persistence diagram of a filtered simplicial complex
#[derive(Debug, Clone, Default)]
pub struct PersistenceDiagram {
    intervals: Vec<PersistenceInterval>,
    max_homology_dim: usize,
}
impl PersistenceDiagram {
    /// Computes the persistence diagram of the Rips filtration of the complex
    ///
    /// Intervals of zero persistence are discarded.
    pub fn compute(complex: &SimplicialComplex) -> Self {
        let max_homology_dim = complex.max_dimension().saturating_sub(1);
        let simplices = complex.simplices();

        let mut order: Vec<usize> = (0..simplices.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&simplices[a], &simplices[b]);
            a.filtration
                .total_cmp(&b.filtration)
                .then(a.dimension().cmp(&b.dimension()))
                .then_with(|| a.vertices.cmp(&b.vertices))
        });
        let position: HashMap<&[usize], usize> = order
            .iter()
            .enumerate()
            .map(|(k, &s)| (simplices[s].vertices.as_slice(), k))
            .collect();

        let m = order.len();
        let mut columns: Vec<Column> = Vec::with_capacity(m);
        let mut pivots: Vec<Option<usize>> = vec![None; m];
        for (k, &s) in order.iter().enumerate() {
            let vertices = &simplices[s].vertices;
            let mut boundary: Vec<usize> = if vertices.len() > 1 {
                (0..vertices.len())
                    .filter_map(|i| {
                        let mut face = vertices.clone();
                        face.remove(i);
                        position.get(face.as_slice()).copied()
                    })
                    .collect()
            } else {
                vec![]
            };
            boundary.sort_unstable();
            let mut column = Column(boundary);
            while let Some(low) = column.low() {
                match pivots[low] {
                    Some(pivot) => column.add_assign(&columns[pivot]),
                    None => break,
                }
            }
            if let Some(low) = column.low() {
                pivots[low] = Some(k);
            }
            columns.push(column);
        }

        let filtration = |k: usize| simplices[order[k]].filtration;
        let dimension = |k: usize| simplices[order[k]].dimension();
        let mut intervals = vec![];
        for (k, column) in columns.iter().enumerate() {
            if let Some(low) = column.low() {
                let (birth, death) = (filtration(low), filtration(k));
                if death > birth && dimension(low) <= max_homology_dim {
                    intervals.push(PersistenceInterval {
                        dimension: dimension(low),
                        birth,
                        death,
                    });
                }
            } else if pivots[k].is_none() && dimension(k) <= max_homology_dim {
                intervals.push(PersistenceInterval {
                    dimension: dimension(k),
                    birth: filtration(k),
                    death: f64::INFINITY,
                });
            }
        }
        Self {
            intervals,
            max_homology_dim,
        }
    }
    pub fn intervals(&self) -> &[PersistenceInterval] {
        &self.intervals
    }
    /// Largest homology dimension in the diagram
    pub fn max_homology_dim(&self) -> usize {
        self.max_homology_dim
    }
    /// Iterator over the intervals of a given dimension
    pub fn dim(&self, dimension: usize) -> impl Iterator<Item = &PersistenceInterval> + '_ {
        self.intervals
            .iter()
            .filter(move |i| i.dimension == dimension)
    }
    /// Largest finite birth or death value
    pub fn max_finite_value(&self) -> f64 {
        self.intervals
            .iter()
            .flat_map(|i| [i.birth, i.death])
            .filter(|x| x.is_finite())
            .fold(0f64, f64::max)
    }
    /// Number of essential classes in dimensions 0 to the largest homology dimension
    pub fn betti_numbers(&self) -> Vec<usize> {
        (0..=self.max_homology_dim)
            .map(|d| self.dim(d).filter(|i| i.is_essential()).count())
            .collect()
    }
}

/// Betti numbers of the complex, from dimension 0 up to one below the complex maximum dimension
pub fn betti_numbers(complex: &SimplicialComplex) -> Vec<usize> {
    PersistenceDiagram::compute(complex).betti_numbers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{RipsComplex, TopologyError};

    type Result<T> = std::result::Result<T, TopologyError>;

    const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    #[test]
    fn two_points() -> Result<()> {
        let points = [[0.0], [1.0]];
        let complex = RipsComplex::new(&points).max_edge_length(2.0).build()?;
        let pd = PersistenceDiagram::compute(&complex);
        let h0: Vec<_> = pd.dim(0).collect();
        assert_eq!(h0.len(), 2);
        let finite: Vec<_> = h0.iter().filter(|i| !i.is_essential()).collect();
        assert_eq!(finite.len(), 1);
        assert_eq!(finite[0].birth, 0.0);
        assert_eq!(finite[0].death, 1.0);
        assert_eq!(pd.betti_numbers(), vec![1, 0]);
        Ok(())
    }

    #[test]
    fn square_cycle() -> Result<()> {
        let s2 = 2f64.sqrt();
        let complex = RipsComplex::new(&SQUARE).max_edge_length(2.0).build()?;
        let pd = PersistenceDiagram::compute(&complex);
        let h1: Vec<_> = pd.dim(1).collect();
        assert_eq!(h1.len(), 1);
        assert_eq!(h1[0].birth, 1.0);
        assert!((h1[0].death - s2).abs() < 1e-12);
        assert_eq!(pd.dim(0).filter(|i| !i.is_essential()).count(), 3);
        assert_eq!(pd.betti_numbers(), vec![1, 0]);
        Ok(())
    }

    #[test]
    fn square_below_the_diagonal() -> Result<()> {
        let complex = RipsComplex::new(&SQUARE).max_edge_length(1.2).build()?;
        assert_eq!(betti_numbers(&complex), vec![1, 1]);
        Ok(())
    }

    #[test]
    fn filled_triangle() -> Result<()> {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 0.75f64.sqrt(), 0.0]];
        let complex = RipsComplex::new(&points)
            .max_edge_length(1.5)
            .max_dimension(3)
            .build()?;
        assert_eq!(betti_numbers(&complex), vec![1, 0, 0]);
        Ok(())
    }

    #[test]
    fn two_clusters() -> Result<()> {
        let points = [[0.0, 0.0], [0.1, 0.0], [5.0, 0.0], [5.0, 0.1]];
        let complex = RipsComplex::new(&points).max_edge_length(0.5).build()?;
        assert_eq!(betti_numbers(&complex), vec![2, 0]);
        Ok(())
    }

    #[test]
    fn octahedron_void() -> Result<()> {
        let points = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let complex = RipsComplex::new(&points)
            .max_edge_length(1.5)
            .max_dimension(3)
            .build()?;
        assert_eq!(complex.dimension(), 2);
        assert_eq!(betti_numbers(&complex), vec![1, 0, 1]);
        let complex = RipsComplex::new(&points)
            .max_edge_length(2.5)
            .max_dimension(3)
            .build()?;
        assert_eq!(betti_numbers(&complex), vec![1, 0, 0]);
        Ok(())
    }

    #[test]
    fn vertices_only() -> Result<()> {
        let points = [[0.0], [1.0], [2.0]];
        let complex = RipsComplex::new(&points).max_dimension(0).build()?;
        assert_eq!(betti_numbers(&complex), vec![3]);
        Ok(())
    }
}

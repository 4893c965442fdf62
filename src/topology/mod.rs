//! Simplicial complexes and homology
//!
//! The Vietoris-Rips complex of a point cloud includes a simplex whenever all the pairwise
//! distances between its vertices are less or equal to the maximum edge length.
//! Each simplex enters the filtration at the length of its longest edge and the persistent
//! homology of the filtration is obtained with the standard reduction of the boundary matrix
//! over GF(2) (Edelsbrunner, Letscher & Zomorodian, 2002).
//!
//! Homology is computed up to one dimension below the dimension the complex has been expanded
//! to, the top-dimensional cycles having no cofaces to bound them.

mod betti;
mod persistence;
mod rips;

pub use betti::{BettiNumbers, HomologyDimension};
pub use persistence::{betti_numbers, PersistenceDiagram, PersistenceInterval};
pub use rips::{euclidean, RipsComplex, Simplex, SimplicialComplex};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TopologyError {
    #[error("Non-finite distance between points #{0} and #{1}")]
    NonFiniteDistance(usize, usize),
    #[error("The complex exceeds the budget of {0} simplices")]
    TooManySimplices(usize),
}

//! # Galaxy survey topological data analysis
//!
//! Persistent homology of galaxy survey catalogs with columns `ra`, `dec`, `redshift`
//! and `extinction_r`.
//!
//! The main analysis is a two-parameter sweep: each galaxy gets a pair of filtration values,
//! its r-band extinction and the distance to its nearest neighbor, and for every pair of
//! thresholds of a grid the Betti numbers of the Vietoris-Rips complex of the galaxies within
//! the thresholds are computed.
//!
//! ```no_run
//! use galaxy_tda::{
//!     catalog::CatalogLoader,
//!     features::Features,
//!     sweep::{Sweep, SweepConfig, ThresholdGrid},
//!     topology::HomologyDimension,
//! };
//!
//! # fn main() -> Result<(), galaxy_tda::Error> {
//! let catalog = CatalogLoader::default()
//!     .path("catalog.csv")
//!     .sample(1000, 42)
//!     .load()?;
//! let features = Features::extinction_nn(&catalog)?;
//! let grid = ThresholdGrid::linspace(&features, (10, 10));
//! let betti = Sweep::new(SweepConfig::default()).run(&features, &grid);
//! println!("{}", betti.betti(HomologyDimension::Loops));
//! # Ok(())
//! # }
//! ```

pub mod binning;
pub mod catalog;
mod error;
pub mod features;
#[cfg(feature = "plot")]
pub mod plot;
pub mod rivet;
pub mod sweep;
pub mod topology;
pub mod toy;

pub use error::Error;

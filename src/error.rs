#[cfg(feature = "plot")]
use crate::plot::PlotError;
use crate::{
    catalog::CatalogError, features::FeatureError, rivet::RivetError, topology::TopologyError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `catalog` module")]
    Catalog(#[from] CatalogError),
    #[error("Error in the `features` module")]
    Features(#[from] FeatureError),
    #[error("Error in the `rivet` module")]
    Rivet(#[from] RivetError),
    #[error("Error in the `topology` module")]
    Topology(#[from] TopologyError),
    #[error("Failed to write the Betti grid table")]
    Table(#[from] csv::Error),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module")]
    Plot(#[from] PlotError),
}

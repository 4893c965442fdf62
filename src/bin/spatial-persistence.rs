use galaxy_tda::{
    catalog::{CatalogLoader, SPATIAL_COLUMNS},
    features::PointCloud,
    plot,
    topology::{PersistenceDiagram, RipsComplex},
};
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "spatial-persistence",
    about = "Persistent homology of the (ra,dec,redshift) point cloud"
)]
struct Opt {
    /// Galaxy catalog CSV file
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "Skyserver_SQL3_16_2025 8_52_53 PM.csv"
    )]
    catalog: PathBuf,
    /// Number of galaxies in the Rips complex
    #[structopt(short, long, default_value = "1000")]
    n_points: usize,
    /// Maximum edge length
    #[structopt(short, long, default_value = "5.0")]
    edge_length: f64,
    /// Maximum simplex dimension
    #[structopt(short, long, default_value = "2")]
    max_dim: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let catalog = CatalogLoader::default()
        .path(&opt.catalog)
        .required_columns(SPATIAL_COLUMNS)
        .shuffle()
        .load()?;
    let cloud = PointCloud::from_catalog(&catalog, SPATIAL_COLUMNS)?;
    let n = opt.n_points.min(cloud.len());
    let points = cloud.select(&(0..n).collect::<Vec<_>>());

    let now = Instant::now();
    let complex = RipsComplex::new(points.as_slice())
        .max_edge_length(opt.edge_length)
        .max_dimension(opt.max_dim)
        .build()?;
    log::info!("Rips complex built in {}ms", now.elapsed().as_millis());
    println!("Rips complex dimension: {}", complex.dimension());
    println!("Number of simplices: {}", complex.num_simplices());
    println!("Number of vertices: {}", complex.num_vertices());

    let now = Instant::now();
    let diagram = PersistenceDiagram::compute(&complex);
    log::info!("Persistence computed in {}ms", now.elapsed().as_millis());

    let title = "Spatial Persistence (RA, DEC, Redshift)";
    plot::persistence_diagram(&diagram, "persistence_diagram.png", title)?;
    plot::persistence_barcode(&diagram, "persistence_barcode.png", title)?;
    plot::spatial_3d(&cloud, "3D_Spatial_Distribution.png")?;
    Ok(())
}

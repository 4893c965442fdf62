use galaxy_tda::{
    catalog::{CatalogLoader, SPATIAL_COLUMNS},
    features::{Features, PointCloud},
    plot,
    rivet::Bifiltration,
    sweep::{Sweep, SweepConfig, ThresholdGrid},
    topology::HomologyDimension,
};
use std::path::PathBuf;
use strum::IntoEnumIterator;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "bifiltration",
    about = "Betti numbers over the extinction x nearest neighbor distance bifiltration"
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
    /// Number of galaxies randomly sampled from the catalog
    #[structopt(short, long, default_value = "10000")]
    sample: usize,
    /// Sampling seed
    #[structopt(long, default_value = "42")]
    seed: u64,
    /// RIVET file with the filtration values of the sampled galaxies
    #[structopt(short, long, parse(from_os_str), default_value = "rivet_input.txt")]
    rivet: PathBuf,
    /// Computes the filtration values from the catalog instead of reading the RIVET file
    #[structopt(long)]
    derive: bool,
    /// Number of extinction thresholds
    #[structopt(long, default_value = "10")]
    n_extinction: usize,
    /// Number of nearest neighbor distance thresholds
    #[structopt(long, default_value = "10")]
    n_distance: usize,
    /// Largest homology dimension
    #[structopt(long, default_value = "2")]
    max_dim: usize,
    /// Maximum number of simplices of a cell complex
    #[structopt(long)]
    max_simplices: Option<usize>,
    /// Heatmaps image file
    #[structopt(short, long, parse(from_os_str), default_value = "Betti-heatmaps.png")]
    output: PathBuf,
    /// Writes the Betti numbers of each cell to a CSV file
    #[structopt(long, parse(from_os_str))]
    csv: Option<PathBuf>,
    /// Shows a progress bar
    #[structopt(short, long)]
    progress: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let catalog = CatalogLoader::default()
        .path(&opt.catalog)
        .sample(opt.sample, opt.seed)
        .load()?;
    let features = if opt.derive {
        Features::extinction_nn(&catalog)?
    } else {
        let points = PointCloud::from_catalog(&catalog, SPATIAL_COLUMNS)?;
        let bifiltration = Bifiltration::from_path(&opt.rivet)?;
        Features::from_bifiltration(points, &bifiltration)?
    };

    let mut config = SweepConfig::default()
        .resolution(opt.n_extinction, opt.n_distance)
        .max_homology_dim(opt.max_dim);
    if let Some(max_simplices) = opt.max_simplices {
        config = config.max_simplices(max_simplices);
    }
    if opt.progress {
        config = config.progress();
    }
    let grid = ThresholdGrid::linspace(&features, config.resolution);
    let betti = Sweep::new(config).run(&features, &grid);

    for dimension in HomologyDimension::iter() {
        println!("{}:{}", dimension, betti.betti(dimension));
    }
    if !betti.failures().is_empty() {
        println!("{} cells failed", betti.failures().len());
    }
    if let Some(path) = &opt.csv {
        betti.to_csv(path)?;
    }
    plot::betti_heatmaps(&betti, &opt.output)?;
    Ok(())
}

use galaxy_tda::{catalog::CatalogLoader, features::Features, rivet::Bifiltration};
use std::{path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "rivet-input",
    about = "Extinction and nearest neighbor distance bifiltration in the RIVET format"
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
    /// RIVET output file
    #[structopt(short, long, parse(from_os_str), default_value = "rivet_input.txt")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let catalog = CatalogLoader::default()
        .path(&opt.catalog)
        .sample(opt.sample, opt.seed)
        .load()?;
    let now = Instant::now();
    let features = Features::extinction_nn(&catalog)?;
    log::info!(
        "Nearest neighbor distances of {} galaxies computed in {}ms",
        features.len(),
        now.elapsed().as_millis()
    );

    Bifiltration::from_features(&features).to_path(&opt.output)?;
    println!("RIVET input file {:?} created.", opt.output);
    Ok(())
}

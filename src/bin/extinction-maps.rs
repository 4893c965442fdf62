use galaxy_tda::{catalog::CatalogLoader, plot};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "extinction-maps",
    about = "Spatial variation of the r-band extinction across the catalog"
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
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let catalog = CatalogLoader::default().path(&opt.catalog).load()?;
    let ra = catalog.values("ra")?;
    let dec = catalog.values("dec")?;
    let redshift = catalog.values("redshift")?;
    let extinction = catalog.values("extinction_r")?;

    plot::extinction_scatter(&ra, &dec, &extinction, "Log-Scaled_Spatial_Variation.png")?;
    plot::extinction_hexbin(&ra, &dec, &extinction, "Hexbin_Plot.png")?;
    plot::extinction_histogram(&extinction, "Distribution_of_Extinction_r.png")?;
    plot::median_redshift_trend(&extinction, &redshift, "Median_Redshift.png")?;
    Ok(())
}

use galaxy_tda::{
    plot,
    topology::betti_numbers,
    toy::{epsilon_complex, wavy_ring, EPSILON, TOLERANCE},
};

const N_POINTS: usize = 30;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let points = wavy_ring(N_POINTS, 0.3, 5);
    plot::toy_point_cloud(&points, "figure1_non_circle.png")?;
    plot::toy_epsilon_balls(&points, EPSILON, "figure2.png")?;

    let complex = epsilon_complex(&points, EPSILON, TOLERANCE)?;
    log::info!(
        "ε={}: {} edges, {} triangles, Betti numbers {:?}",
        EPSILON,
        complex.edges().count(),
        complex.triangles().count(),
        betti_numbers(&complex)
    );
    plot::toy_complex(&points, &complex, "figure3.png")?;
    Ok(())
}

//! Non-equilibrium heat transport through a silicon bar.
//!
//! The bar is cut into slabs along x. After equilibration at 300 K, slab 1 is
//! heated and slab 7 cooled with two Nose-Hoover chains, and the energy
//! pumped through the bar is reported together with the slab temperature
//! profile and the thermal conductance.
//!
//! Run with `RUST_LOG=info cargo run --release --example heat_transport [potential file]`
use tmd::prelude::*;
use tmd::compute;

const POTENTIAL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/Si_Tersoff_1988.txt");
const NUM_SLABS: usize = 12;

fn run(path: &str) -> tmd::Result<()> {
    let parameters = TersoffParameters::from_file(path)?;

    let lattice = Diamond::new(5.432);
    let (rect, coords) = lattice.replicate([12, 3, 3]);
    let container = Container::from_rect_periodic(rect.clone());
    let mut atoms = Atoms::new(vec![Species::new("Si", 28.085)]);
    atoms.add_atoms(0, coords);
    atoms.set_temperature(300.0, 12345);

    let [xlo, xhi] = rect.get_bounds(Axis::X);
    let slabs = Grouping::from_slabs(atoms.positions(), Axis::X, xlo, xhi, NUM_SLABS);
    let config = SimulationConfig::new()
        .timestep(1.0)
        .skin(1.0)
        .neighbor_update(NeighborUpdate::Every(10))
        .thermo_every(500);

    let mut equilibration = Simulation::new(
        atoms,
        container.clone(),
        Tersoff::new(parameters.clone()).into(),
        vec![slabs.clone()],
        &EnsembleConfig::nvt(300.0, 100.0),
        config.clone(),
    )?;
    equilibration.run(2000)?;

    let mut production = Simulation::new(
        equilibration.atoms,
        container,
        Tersoff::new(parameters).into(),
        vec![slabs],
        &EnsembleConfig::heat(300.0, 20.0, 100.0, 0, 1, 7),
        config,
    )?;
    let num_steps = 5000;
    let sample_every = 100;
    // the temperature profile is averaged over the second half of the run
    production.run(num_steps / 2)?;
    let mut profile = vec![0.0; NUM_SLABS];
    let mut num_samples = 0;
    for _ in 0..num_steps / 2 / sample_every {
        production.run(sample_every)?;
        let temperatures =
            compute::group_temperatures(&production.atoms, &production.groupings()[0]);
        for (sum, t) in profile.iter_mut().zip(temperatures) {
            *sum += t;
        }
        num_samples += 1;
    }
    profile.iter_mut().for_each(|t| *t /= num_samples as f64);
    for (slab, t) in profile.iter().enumerate() {
        println!("slab {:>2}: {:8.2} K", slab, t);
    }
    let delta_t = profile[1] - profile[7];

    if let Ensemble::HeatNhc(heat) = production.ensemble() {
        let [source, sink] = heat.energy_transferred();
        let time = num_steps as f64 * production.timestep();
        let current = -source / time;
        let [ly, lz] = [rect.length(Axis::Y), rect.length(Axis::Z)];
        println!("energy removed from source: {:.6} eV", source);
        println!("energy removed from sink:   {:.6} eV", sink);
        println!("mean heat current: {:.6e} eV/fs", current);
        println!("temperature difference: {:.3} K", delta_t);
        // heat flows both ways through the periodic bar
        println!(
            "conductance: {:.6e} eV/(fs A^2 K)",
            current / (delta_t * 2.0 * ly * lz)
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let path = std::env::args().nth(1).unwrap_or_else(|| POTENTIAL.to_string());
    if let Err(err) = run(&path) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

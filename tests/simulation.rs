use approx::assert_relative_eq;
use tmd::prelude::*;

const SILICON: &str = "\
tersoff_1988 1 Si
1830.8 471.18 2.4799 1.7322 1.1e-6 0.78734 1.0039e5 16.217 -0.59825 2.7 3.0 3 0 1
";

fn tersoff() -> AtomicPotential {
    Tersoff::new(SILICON.parse().unwrap()).into()
}

/// 216-atom silicon crystal with thermal velocities
fn crystal(temperature: f64) -> (Atoms, Container) {
    let (rect, coords) = Diamond::new(5.432).replicate([3, 3, 3]);
    let mut atoms = Atoms::new(vec![Species::new("Si", 28.085)]);
    atoms.add_atoms(0, coords);
    atoms.set_temperature(temperature, 2024);
    (atoms, Container::from_rect_periodic(rect))
}

fn slabs(atoms: &Atoms, container: &Container, num_slabs: usize) -> Grouping {
    let [lo, hi] = container.rect().get_bounds(Axis::X);
    Grouping::from_slabs(atoms.positions(), Axis::X, lo, hi, num_slabs)
}

#[test]
fn nve_conserves_energy() {
    let (atoms, container) = crystal(300.0);
    let mut sim = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![],
        &EnsembleConfig::Nve,
        SimulationConfig::new().timestep(1.0).thermo_every(0),
    )
    .unwrap();
    let start = sim.thermo().total_energy();
    assert_relative_eq!(start / 216.0, -4.63 + 1.5 * 8.617343e-5 * 300.0, epsilon = 0.02);
    for _ in 0..200 {
        sim.step().unwrap();
        let now = sim.thermo().total_energy();
        assert!((now - start).abs() < 0.05, "energy drifted from {} to {}", start, now);
    }
    assert_eq!(sim.current_step(), 200);
    assert_eq!(sim.neighbor_list().num_builds(), 201);
}

#[test]
fn nvt_conserves_extended_energy_and_heats() {
    let (atoms, container) = crystal(100.0);
    let mut sim = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![],
        &EnsembleConfig::nvt(600.0, 50.0),
        SimulationConfig::new().timestep(1.0).thermo_every(0),
    )
    .unwrap();
    let extended = |sim: &Simulation| match sim.ensemble() {
        Ensemble::NvtNhc(nvt) => sim.thermo().total_energy() + nvt.thermostat_energy(),
        _ => unreachable!(),
    };
    let start = extended(&sim);
    let cold = sim.thermo().kinetic_energy;
    sim.run(300).unwrap();
    assert!((extended(&sim) - start).abs() < 0.05);
    assert!(sim.thermo().kinetic_energy > cold);
}

#[test]
fn heat_baths_account_for_energy_change() {
    let (atoms, container) = crystal(300.0);
    let groups = slabs(&atoms, &container, 3);
    let mut sim = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![groups],
        &EnsembleConfig::heat(300.0, 50.0, 50.0, 0, 0, 2),
        SimulationConfig::new().timestep(1.0).thermo_every(0),
    )
    .unwrap();
    let start = sim.thermo().total_energy();
    sim.run(200).unwrap();
    let ledger = match sim.ensemble() {
        Ensemble::HeatNhc(heat) => heat.energy_transferred(),
        _ => unreachable!(),
    };
    let change = sim.thermo().total_energy() - start;
    assert_relative_eq!(change, -(ledger[0] + ledger[1]), epsilon = 0.05);
    assert!(ledger.iter().all(|e| *e != 0.0));
}

#[test]
fn fixed_group_does_not_move() {
    let (atoms, container) = crystal(300.0);
    let groups = slabs(&atoms, &container, 3);
    let frozen: Vec<usize> = groups.members(1).to_vec();
    let start: Vec<[f64; 3]> = frozen.iter().map(|&n| atoms.positions[n]).collect();
    let mut sim = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![groups],
        &EnsembleConfig::Nve,
        SimulationConfig::new().fixed_group(0, 1).thermo_every(0),
    )
    .unwrap();
    sim.run(20).unwrap();
    for (&n, p) in frozen.iter().zip(&start) {
        assert_eq!(sim.atoms.positions[n], *p);
        assert_eq!(sim.atoms.velocities[n], [0.0; 3]);
    }
}

#[test]
fn neighbor_policy_controls_rebuilds() {
    let (atoms, container) = crystal(50.0);
    let mut sim = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![],
        &EnsembleConfig::Nve,
        SimulationConfig::new()
            .neighbor_update(NeighborUpdate::Every(5))
            .thermo_every(0),
    )
    .unwrap();
    sim.run(20).unwrap();
    // initial build plus steps 5, 10, 15 and 20
    assert_eq!(sim.neighbor_list().num_builds(), 5);
}

#[test]
fn ideal_gas_moves_freely() {
    let mut atoms = Atoms::new(vec![Species::new("Ar", 39.948)]);
    atoms.add_atoms(0, vec![[1.0, 1.0, 1.0], [5.0, 5.0, 5.0]]);
    atoms.velocities = vec![[0.1, 0.0, 0.0], [0.0, -0.2, 0.0]];
    let container = Container::from_rect_periodic(Rect::new(0.0, 10.0, 0.0, 10.0, 0.0, 10.0));
    let mut sim = Simulation::new(
        atoms,
        container,
        None_::new().into(),
        vec![],
        &EnsembleConfig::Nve,
        SimulationConfig::new().timestep(10.18051).thermo_every(0),
    )
    .unwrap();
    sim.run(10).unwrap();
    assert_relative_eq!(sim.atoms.positions[0][0], 2.0, epsilon = 1e-12);
    assert_relative_eq!(sim.atoms.positions[1][1], 3.0, epsilon = 1e-12);
    assert_eq!(sim.thermo().potential_energy, 0.0);
}

#[test]
fn mismatched_species_are_rejected() {
    let mut atoms = Atoms::new(vec![Species::new("C", 12.011)]);
    atoms.add_atoms(0, vec![[1.0, 1.0, 1.0]]);
    let container = Container::from_rect_periodic(Rect::new(0.0, 10.0, 0.0, 10.0, 0.0, 10.0));
    let result = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![],
        &EnsembleConfig::Nve,
        SimulationConfig::new(),
    );
    assert!(matches!(result, Err(tmd::Error::InvalidConfig(_))));
}

#[test]
fn neighbor_overflow_is_fatal() {
    let (atoms, container) = crystal(0.0);
    let result = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![],
        &EnsembleConfig::Nve,
        SimulationConfig::new().max_neighbors(2),
    );
    assert!(matches!(
        result,
        Err(tmd::Error::NeighborOverflow { capacity: 2, .. })
    ));
}

#[test]
fn fixed_group_cannot_be_a_heat_bath() {
    let (atoms, container) = crystal(300.0);
    let groups = slabs(&atoms, &container, 3);
    let result = Simulation::new(
        atoms,
        container,
        tersoff(),
        vec![groups],
        &EnsembleConfig::heat(300.0, 50.0, 50.0, 0, 0, 2),
        SimulationConfig::new().fixed_group(0, 2),
    );
    assert!(matches!(result, Err(tmd::Error::InvalidGroup(_))));
}

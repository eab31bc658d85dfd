use rayon::prelude::*;

use crate::{
    group::GroupScheme,
    units::{DIM, K_B},
    Atoms,
};

/// Center-of-mass velocity of the given atoms and their twice kinetic energy
/// relative to it
///
/// Drift of the group as a whole is not thermal energy, so the heat baths
/// only see the second value.
pub fn group_com_and_ek2(atoms: &Atoms, members: &[usize]) -> ([f64; 3], f64) {
    let (mass, momentum, ek2) = members
        .par_iter()
        .map(|&n| {
            let m = atoms.masses[n];
            let v = atoms.velocities[n];
            (
                m,
                [m * v[0], m * v[1], m * v[2]],
                m * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]),
            )
        })
        .reduce(
            || (0.0, [0.0; 3], 0.0),
            |a, b| {
                (
                    a.0 + b.0,
                    [a.1[0] + b.1[0], a.1[1] + b.1[1], a.1[2] + b.1[2]],
                    a.2 + b.2,
                )
            },
        );
    if mass == 0.0 {
        return ([0.0; 3], 0.0);
    }
    let vc = momentum.map(|p| p / mass);
    let com_ek2 = mass * (vc[0] * vc[0] + vc[1] * vc[1] + vc[2] * vc[2]);
    (vc, ek2 - com_ek2)
}

/// Temperature of every group in K, from the kinetic energy relative to the
/// group's center of mass. Empty groups read 0.
pub fn group_temperatures(atoms: &Atoms, scheme: &impl GroupScheme) -> Vec<f64> {
    (0..scheme.num_groups())
        .map(|group| {
            let members = scheme.members(group);
            if members.is_empty() {
                return 0.0;
            }
            let (_, ek2) = group_com_and_ek2(atoms, members);
            ek2 / ((DIM * members.len()) as f64 * K_B)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{atom_type::Species, group::Grouping};
    use approx::assert_relative_eq;

    #[test]
    fn uniform_drift_has_no_thermal_energy() {
        let mut atoms = Atoms::new(vec![Species::new("Si", 28.085)]);
        atoms.add_atoms(0, vec![[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        atoms.velocities.iter_mut().for_each(|v| *v = [0.1, -0.2, 0.3]);
        let (vc, ek2) = group_com_and_ek2(&atoms, &[0, 1, 2]);
        assert_relative_eq!(vc[0], 0.1, epsilon = 1e-14);
        assert_relative_eq!(vc[1], -0.2, epsilon = 1e-14);
        assert_relative_eq!(vc[2], 0.3, epsilon = 1e-14);
        assert!(ek2.abs() < 1e-12);
    }

    #[test]
    fn relative_motion_is_counted() {
        let mut atoms = Atoms::new(vec![Species::new("X", 2.0)]);
        atoms.add_atoms(0, vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        atoms.velocities = vec![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]];
        let (vc, ek2) = group_com_and_ek2(&atoms, &[0, 1]);
        assert_eq!(vc, [0.0; 3]);
        assert_relative_eq!(ek2, 4.0, epsilon = 1e-14);
    }

    #[test]
    fn temperature_profile_per_group() {
        let mut atoms = Atoms::new(vec![Species::new("X", 2.0)]);
        atoms.add_atoms(0, vec![[0.0; 3], [1.0, 0.0, 0.0], [5.0, 0.0, 0.0], [6.0, 0.0, 0.0]]);
        atoms.velocities = vec![
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.5, 0.0],
        ];
        let grouping = Grouping::from_labels(vec![0, 0, 2, 2]);
        let temperatures = group_temperatures(&atoms, &grouping);
        assert_eq!(temperatures.len(), 3);
        assert_relative_eq!(temperatures[0], 4.0 / (6.0 * K_B), max_relative = 1e-12);
        assert_eq!(temperatures[1], 0.0);
        // pure drift is not heat
        assert!(temperatures[2].abs() < 1e-9);
    }
}

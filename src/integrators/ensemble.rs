//! Ensembles realize one timestep as two calls around the force evaluation:
//! `compute1` before it and `compute2` after it.
use enum_dispatch::enum_dispatch;
use log::info;
use rayon::prelude::*;

use super::{nhc::DEFAULT_CHAIN_LENGTH, NoseHooverChain, Verlet};
use crate::{
    compute::{group_com_and_ek2, twice_kinetic_energy},
    error::{Error, Result},
    group::{GroupScheme, Grouping},
    units::{DIM, K_B},
    Atoms,
};

/// Which ensemble to run, with temperatures in K and couplings in timesteps
#[derive(Clone, Debug, PartialEq)]
pub enum EnsembleConfig {
    Nve,
    /// Canonical ensemble with one bath for all atoms
    NvtNhc {
        temperature: f64,
        coupling: f64,
        chain_length: usize,
    },
    /// Source group held at `temperature + delta_temperature` and sink group
    /// at `temperature - delta_temperature`, groups taken from grouping
    /// scheme `grouping`
    HeatNhc {
        temperature: f64,
        delta_temperature: f64,
        coupling: f64,
        chain_length: usize,
        grouping: usize,
        source: usize,
        sink: usize,
    },
}
impl EnsembleConfig {
    pub fn nvt(temperature: f64, coupling: f64) -> Self {
        Self::NvtNhc {
            temperature,
            coupling,
            chain_length: DEFAULT_CHAIN_LENGTH,
        }
    }
    pub fn heat(
        temperature: f64,
        delta_temperature: f64,
        coupling: f64,
        grouping: usize,
        source: usize,
        sink: usize,
    ) -> Self {
        Self::HeatNhc {
            temperature,
            delta_temperature,
            coupling,
            chain_length: DEFAULT_CHAIN_LENGTH,
            grouping,
            source,
            sink,
        }
    }
}

#[enum_dispatch]
pub trait EnsembleTrait {
    /// First half of a step, before forces are recomputed
    fn compute1(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], groupings: &[Grouping]);
    /// Second half of a step, with the new forces
    fn compute2(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], groupings: &[Grouping]);
}

#[enum_dispatch(EnsembleTrait)]
#[derive(Clone, Debug)]
pub enum Ensemble {
    Nve,
    NvtNhc,
    HeatNhc,
}
impl Ensemble {
    /// `dt` is the timestep in natural units
    pub fn from_config(
        config: &EnsembleConfig,
        dt: f64,
        atoms: &Atoms,
        groupings: &[Grouping],
        verlet: Verlet,
    ) -> Result<Self> {
        let ensemble: Ensemble = match *config {
            EnsembleConfig::Nve => Nve::new(verlet).into(),
            EnsembleConfig::NvtNhc {
                temperature,
                coupling,
                chain_length,
            } => NvtNhc::new(
                temperature,
                coupling * dt,
                chain_length,
                atoms.num_atoms(),
                verlet,
            )?
            .into(),
            EnsembleConfig::HeatNhc {
                temperature,
                delta_temperature,
                coupling,
                chain_length,
                grouping,
                source,
                sink,
            } => {
                let scheme = groupings.get(grouping).ok_or_else(|| {
                    Error::InvalidGroup(format!(
                        "grouping scheme {} does not exist, {} defined",
                        grouping,
                        groupings.len()
                    ))
                })?;
                HeatNhc::new(
                    [temperature + delta_temperature, temperature - delta_temperature],
                    coupling * dt,
                    chain_length,
                    scheme,
                    grouping,
                    [source, sink],
                    verlet,
                )?
                .into()
            }
        };
        info!("Ensemble: {:?}", config);
        Ok(ensemble)
    }
}

fn check_temperature(temperature: f64) -> Result<f64> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(Error::InvalidThermostat(format!(
            "bath temperature must be positive, found {} K",
            temperature
        )));
    }
    Ok(K_B * temperature)
}

/// v <- vc + factor (v - vc) for the given atoms
fn scale_velocities(atoms: &mut Atoms, members: &[usize], vc: [f64; 3], factor: f64) {
    for &n in members {
        let v = &mut atoms.velocities[n];
        for d in 0..3 {
            v[d] = vc[d] + factor * (v[d] - vc[d]);
        }
    }
}

/// Plain velocity verlet
#[derive(Clone, Debug)]
pub struct Nve {
    verlet: Verlet,
}
impl Nve {
    pub fn new(verlet: Verlet) -> Self {
        Self { verlet }
    }
}
impl EnsembleTrait for Nve {
    fn compute1(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], _: &[Grouping]) {
        self.verlet.first_half(dt, atoms, forces);
    }
    fn compute2(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], _: &[Grouping]) {
        self.verlet.second_half(dt, atoms, forces);
    }
}

/// All mobile atoms coupled to one Nose-Hoover chain
#[derive(Clone, Debug)]
pub struct NvtNhc {
    chain: NoseHooverChain,
    kt: f64,
    dof: f64,
    verlet: Verlet,
}
impl NvtNhc {
    /// `tau` is the chain relaxation time in natural units
    pub fn new(
        temperature: f64,
        tau: f64,
        chain_length: usize,
        num_atoms: usize,
        verlet: Verlet,
    ) -> Result<Self> {
        let kt = check_temperature(temperature)?;
        let num_mobile = num_atoms.saturating_sub(verlet.num_fixed());
        if num_mobile == 0 {
            return Err(Error::InvalidThermostat(
                "every atom is fixed, nothing to thermostat".to_string(),
            ));
        }
        // fixed atoms carry no kinetic energy
        let dof = (DIM * num_mobile) as f64;
        let chain = NoseHooverChain::new(chain_length, kt, dof, tau)?;
        Ok(Self {
            chain,
            kt,
            dof,
            verlet,
        })
    }
    pub fn chain(&self) -> &NoseHooverChain {
        &self.chain
    }
    pub fn degrees_of_freedom(&self) -> f64 {
        self.dof
    }
    /// Energy held by the chain, to be added to the particle energy for the
    /// conserved quantity
    pub fn thermostat_energy(&self) -> f64 {
        self.chain.energy(self.kt, self.dof)
    }

    fn rescale(&mut self, dt: f64, atoms: &mut Atoms) {
        let ek2 = twice_kinetic_energy(atoms);
        let factor = self.chain.integrate(ek2, self.kt, self.dof, dt * 0.5);
        atoms.velocities.par_iter_mut().for_each(|v| {
            v[0] *= factor;
            v[1] *= factor;
            v[2] *= factor;
        });
    }
}
impl EnsembleTrait for NvtNhc {
    fn compute1(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], _: &[Grouping]) {
        self.rescale(dt, atoms);
        self.verlet.first_half(dt, atoms, forces);
    }
    fn compute2(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], _: &[Grouping]) {
        self.verlet.second_half(dt, atoms, forces);
        self.rescale(dt, atoms);
    }
}

/// Source and sink groups coupled to two chains at different temperatures
///
/// Each group is rescaled about its own center-of-mass velocity, so a
/// drifting group does not exchange energy with its bath. The energy taken
/// out of each group by its bath is accumulated for the whole run.
#[derive(Clone, Debug)]
pub struct HeatNhc {
    chains: [NoseHooverChain; 2],
    kt: [f64; 2],
    dof: [f64; 2],
    grouping: usize,
    groups: [usize; 2],
    energy_transferred: [f64; 2],
    verlet: Verlet,
}
impl HeatNhc {
    /// Index 0 is the source, index 1 the sink
    pub fn new(
        temperatures: [f64; 2],
        tau: f64,
        chain_length: usize,
        scheme: &impl GroupScheme,
        grouping: usize,
        groups: [usize; 2],
        verlet: Verlet,
    ) -> Result<Self> {
        let [source, sink] = groups;
        if source == sink {
            return Err(Error::InvalidGroup(format!(
                "source and sink are both group {}",
                source
            )));
        }
        let mut kt = [0.0; 2];
        let mut dof = [0.0; 2];
        for bath in 0..2 {
            let group = groups[bath];
            if group >= scheme.num_groups() {
                return Err(Error::InvalidGroup(format!(
                    "group {} does not exist in grouping {}, which has {} groups",
                    group,
                    grouping,
                    scheme.num_groups()
                )));
            }
            if scheme.group_size(group) == 0 {
                return Err(Error::InvalidGroup(format!(
                    "group {} of grouping {} is empty",
                    group, grouping
                )));
            }
            if let Some(&atom) = scheme.members(group).iter().find(|&&n| verlet.is_fixed(n)) {
                return Err(Error::InvalidGroup(format!(
                    "group {} of grouping {} contains fixed atom {}",
                    group, grouping, atom
                )));
            }
            kt[bath] = check_temperature(temperatures[bath])?;
            dof[bath] = (DIM * scheme.group_size(group)) as f64;
        }
        let chains = [
            NoseHooverChain::new(chain_length, kt[0], dof[0], tau)?,
            NoseHooverChain::new(chain_length, kt[1], dof[1], tau)?,
        ];
        Ok(Self {
            chains,
            kt,
            dof,
            grouping,
            groups,
            energy_transferred: [0.0; 2],
            verlet,
        })
    }

    pub fn grouping(&self) -> usize {
        self.grouping
    }
    pub fn source(&self) -> usize {
        self.groups[0]
    }
    pub fn sink(&self) -> usize {
        self.groups[1]
    }
    /// Cumulative kinetic energy removed from the source and the sink group
    pub fn energy_transferred(&self) -> [f64; 2] {
        self.energy_transferred
    }
    pub fn chains(&self) -> &[NoseHooverChain; 2] {
        &self.chains
    }

    fn rescale(&mut self, dt: f64, atoms: &mut Atoms, groupings: &[Grouping]) {
        let scheme = &groupings[self.grouping];
        for bath in 0..2 {
            let members = scheme.members(self.groups[bath]);
            let (vc, ek2) = group_com_and_ek2(atoms, members);
            let factor =
                self.chains[bath].integrate(ek2, self.kt[bath], self.dof[bath], dt * 0.5);
            scale_velocities(atoms, members, vc, factor);
            self.energy_transferred[bath] += 0.5 * ek2 * (1.0 - factor * factor);
        }
    }
}
impl EnsembleTrait for HeatNhc {
    fn compute1(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], groupings: &[Grouping]) {
        self.rescale(dt, atoms, groupings);
        self.verlet.first_half(dt, atoms, forces);
    }
    fn compute2(&mut self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]], groupings: &[Grouping]) {
        self.verlet.second_half(dt, atoms, forces);
        self.rescale(dt, atoms, groupings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{atom_type::Species, compute::kinetic_energy};
    use approx::assert_relative_eq;

    /// Twenty free atoms in four groups of five, with random velocities
    fn gas() -> (Atoms, Vec<Grouping>) {
        let mut atoms = Atoms::new(vec![Species::new("Ar", 39.948)]);
        atoms.add_atoms(0, (0..20).map(|i| [i as f64, 0.0, 0.0]).collect());
        atoms.set_temperature(300.0, 42);
        let labels = (0..20).map(|i| i / 5).collect();
        (atoms, vec![Grouping::from_labels(labels)])
    }

    fn group_energy(atoms: &Atoms, members: &[usize]) -> f64 {
        members
            .iter()
            .map(|&n| {
                let v = atoms.velocities[n];
                0.5 * atoms.masses[n] * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2])
            })
            .sum()
    }

    #[test]
    fn heat_ledger_balances_kinetic_energy() {
        let (mut atoms, groupings) = gas();
        let config = EnsembleConfig::heat(300.0, 30.0, 100.0, 0, 1, 3);
        let mut ensemble =
            Ensemble::from_config(&config, 0.1, &atoms, &groupings, Verlet::new()).unwrap();
        let forces = vec![[0.0; 3]; 20];
        let source = groupings[0].members(1).to_vec();
        let sink = groupings[0].members(3).to_vec();

        for _ in 0..50 {
            let before = group_energy(&atoms, &source) + group_energy(&atoms, &sink);
            let ledger_before = match &ensemble {
                Ensemble::HeatNhc(h) => h.energy_transferred(),
                _ => unreachable!(),
            };
            ensemble.compute1(0.1, &mut atoms, &forces, &groupings);
            ensemble.compute2(0.1, &mut atoms, &forces, &groupings);
            let after = group_energy(&atoms, &source) + group_energy(&atoms, &sink);
            let ledger_after = match &ensemble {
                Ensemble::HeatNhc(h) => h.energy_transferred(),
                _ => unreachable!(),
            };
            let transferred = (ledger_after[0] - ledger_before[0]) + (ledger_after[1] - ledger_before[1]);
            assert_relative_eq!(after - before, -transferred, epsilon = 1e-12);
        }
    }

    #[test]
    fn heat_baths_leave_other_groups_alone() {
        let (mut atoms, groupings) = gas();
        let mut heat = HeatNhc::new(
            [330.0, 270.0],
            1.0,
            4,
            &groupings[0],
            0,
            [0, 2],
            Verlet::new(),
        )
        .unwrap();
        let untouched: Vec<[f64; 3]> = atoms.velocities[5..10].to_vec();
        heat.rescale(0.1, &mut atoms, &groupings);
        assert_eq!(&atoms.velocities[5..10], &untouched[..]);
        assert!(heat.energy_transferred().iter().all(|e| *e != 0.0));
    }

    #[test]
    fn group_drift_is_preserved() {
        let (mut atoms, groupings) = gas();
        for v in atoms.velocities[0..5].iter_mut() {
            v[0] += 0.01;
        }
        let (vc_before, _) = group_com_and_ek2(&atoms, groupings[0].members(0));
        let mut heat =
            HeatNhc::new([400.0, 200.0], 1.0, 4, &groupings[0], 0, [0, 1], Verlet::new()).unwrap();
        heat.rescale(0.1, &mut atoms, &groupings);
        let (vc_after, _) = group_com_and_ek2(&atoms, groupings[0].members(0));
        for d in 0..3 {
            assert_relative_eq!(vc_after[d], vc_before[d], epsilon = 1e-12);
        }
    }

    #[test]
    fn invalid_heat_setups() {
        let (atoms, groupings) = gas();
        let cases = [
            EnsembleConfig::heat(300.0, 10.0, 10.0, 1, 0, 1),
            EnsembleConfig::heat(300.0, 10.0, 10.0, 0, 2, 2),
            EnsembleConfig::heat(300.0, 10.0, 10.0, 0, 0, 7),
        ];
        for config in &cases {
            let result = Ensemble::from_config(config, 0.1, &atoms, &groupings, Verlet::new());
            assert!(matches!(result, Err(Error::InvalidGroup(_))), "{:?}", config);
        }
        let cold = EnsembleConfig::heat(10.0, 20.0, 10.0, 0, 0, 1);
        let result = Ensemble::from_config(&cold, 0.1, &atoms, &groupings, Verlet::new());
        assert!(matches!(result, Err(Error::InvalidThermostat(_))));
    }

    #[test]
    fn empty_group_is_rejected() {
        let scheme = Grouping::from_labels((0..20).map(|i| if i < 10 { 0 } else { 2 }).collect());
        let result = HeatNhc::new([310.0, 290.0], 1.0, 4, &scheme, 0, [0, 1], Verlet::new());
        assert!(matches!(result, Err(Error::InvalidGroup(_))));
    }

    #[test]
    fn nvt_moves_temperature_toward_target() {
        let (mut atoms, groupings) = gas();
        let forces = vec![[0.0; 3]; 20];
        let mut ensemble = Ensemble::from_config(
            &EnsembleConfig::nvt(600.0, 100.0),
            0.1,
            &atoms,
            &groupings,
            Verlet::new(),
        )
        .unwrap();
        let start = kinetic_energy(&atoms);
        for _ in 0..100 {
            ensemble.compute1(0.1, &mut atoms, &forces, &groupings);
            ensemble.compute2(0.1, &mut atoms, &forces, &groupings);
        }
        assert!(kinetic_energy(&atoms) > start);
    }

    #[test]
    fn nvt_rejects_bad_temperature() {
        let (atoms, groupings) = gas();
        let result = Ensemble::from_config(
            &EnsembleConfig::nvt(-5.0, 10.0),
            0.1,
            &atoms,
            &groupings,
            Verlet::new(),
        );
        assert!(matches!(result, Err(Error::InvalidThermostat(_))));
    }

    #[test]
    fn nvt_counts_only_mobile_atoms() {
        let (atoms, groupings) = gas();
        let verlet = Verlet::with_fixed_atoms(20, groupings[0].members(2));
        let ensemble = Ensemble::from_config(
            &EnsembleConfig::nvt(300.0, 100.0),
            0.1,
            &atoms,
            &groupings,
            verlet,
        )
        .unwrap();
        match ensemble {
            Ensemble::NvtNhc(nvt) => assert_eq!(nvt.degrees_of_freedom(), 45.0),
            _ => unreachable!(),
        }

        let all: Vec<usize> = (0..20).collect();
        let result = Ensemble::from_config(
            &EnsembleConfig::nvt(300.0, 100.0),
            0.1,
            &atoms,
            &groupings,
            Verlet::with_fixed_atoms(20, &all),
        );
        assert!(matches!(result, Err(Error::InvalidThermostat(_))));
    }

    #[test]
    fn heat_bath_cannot_hold_fixed_atoms() {
        let (atoms, groupings) = gas();
        let verlet = Verlet::with_fixed_atoms(20, &[7]);
        let config = EnsembleConfig::heat(300.0, 10.0, 100.0, 0, 1, 3);
        let result = Ensemble::from_config(&config, 0.1, &atoms, &groupings, verlet.clone());
        assert!(matches!(result, Err(Error::InvalidGroup(_))));
        let config = EnsembleConfig::heat(300.0, 10.0, 100.0, 0, 0, 3);
        assert!(Ensemble::from_config(&config, 0.1, &atoms, &groupings, verlet).is_ok());
    }
}

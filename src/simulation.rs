use log::info;

use crate::{
    atomic::{AtomicPotential, AtomicPotentialTrait, ForceBuffers},
    compute,
    error::{Error, Result},
    group::{GroupScheme, Grouping},
    integrators::{Ensemble, EnsembleConfig, EnsembleTrait, Verlet},
    neighbor::NeighborUpdate,
    units::fs_to_natural,
    Atoms, Container, NeighborList,
};

/// Run settings that are not part of the physical model
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    timestep: f64,
    skin: f64,
    max_neighbors: usize,
    neighbor_update: NeighborUpdate,
    thermo_every: usize,
    fixed_group: Option<(usize, usize)>,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0,
            skin: 1.0,
            max_neighbors: 50,
            neighbor_update: NeighborUpdate::EveryStep,
            thermo_every: 100,
            fixed_group: None,
        }
    }
}
impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestep in fs
    pub fn timestep(mut self, timestep: f64) -> Self {
        assert!(
            timestep > 0.0,
            "Timestep should be positive, found {}",
            timestep,
        );
        self.timestep = timestep;
        self
    }
    pub fn skin(mut self, skin: f64) -> Self {
        assert!(skin >= 0.0, "Skin should not be negative, found {}", skin);
        self.skin = skin;
        self
    }
    pub fn max_neighbors(mut self, max_neighbors: usize) -> Self {
        assert!(max_neighbors > 0, "Neighbor capacity should be positive");
        self.max_neighbors = max_neighbors;
        self
    }
    pub fn neighbor_update(mut self, update: NeighborUpdate) -> Self {
        self.neighbor_update = update;
        self
    }
    /// Log thermodynamic output every `every` steps, 0 to disable
    pub fn thermo_every(mut self, every: usize) -> Self {
        self.thermo_every = every;
        self
    }
    /// Freeze the atoms of `group` in grouping scheme `grouping`
    pub fn fixed_group(mut self, grouping: usize, group: usize) -> Self {
        self.fixed_group = Some((grouping, group));
        self
    }
}

/// Thermodynamic state at one step
#[derive(Clone, Copy, Debug)]
pub struct Thermo {
    pub step: usize,
    pub temperature: f64,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub pressure: f64,
}
impl Thermo {
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

/// The main simulation class, owning the whole state of a run
pub struct Simulation {
    pub atoms: Atoms,
    container: Container,
    potential: AtomicPotential,
    neighbor_list: NeighborList,
    ensemble: Ensemble,
    groupings: Vec<Grouping>,
    buffers: ForceBuffers,
    config: SimulationConfig,
    step: usize,
}
impl Simulation {
    /// Set up a run and evaluate the initial forces
    pub fn new(
        mut atoms: Atoms,
        container: Container,
        potential: AtomicPotential,
        groupings: Vec<Grouping>,
        ensemble: &EnsembleConfig,
        config: SimulationConfig,
    ) -> Result<Self> {
        let num_atoms = atoms.num_atoms();
        for (index, grouping) in groupings.iter().enumerate() {
            if grouping.labels().len() != num_atoms {
                return Err(Error::InvalidGroup(format!(
                    "grouping {} labels {} atoms, but there are {}",
                    index,
                    grouping.labels().len(),
                    num_atoms
                )));
            }
        }
        if let AtomicPotential::Tersoff(tersoff) = &potential {
            tersoff.parameters().check_species(atoms.species())?;
        }

        let verlet = match config.fixed_group {
            None => Verlet::new(),
            Some((grouping, group)) => {
                let scheme = groupings.get(grouping).ok_or_else(|| {
                    Error::InvalidGroup(format!("fixed grouping {} does not exist", grouping))
                })?;
                if group >= scheme.num_groups() {
                    return Err(Error::InvalidGroup(format!(
                        "fixed group {} does not exist in grouping {}",
                        group, grouping
                    )));
                }
                Verlet::with_fixed_atoms(num_atoms, scheme.members(group))
            }
        };
        let dt = fs_to_natural(config.timestep);
        let ensemble = Ensemble::from_config(ensemble, dt, &atoms, &groupings, verlet)?;

        container.wrap(&mut atoms.positions);
        let neighbor_list = NeighborList::new(
            potential.cutoff_distance(),
            config.skin,
            config.max_neighbors,
            config.neighbor_update,
        );
        info!(
            "Simulation of {} atoms, timestep {} fs, box {:?}",
            num_atoms,
            config.timestep,
            container.rect().lengths()
        );

        let mut simulation = Self {
            atoms,
            container,
            potential,
            neighbor_list,
            ensemble,
            groupings,
            buffers: ForceBuffers::new(num_atoms),
            config,
            step: 0,
        };
        simulation.compute_forces()?;
        Ok(simulation)
    }

    // Getters
    pub fn container(&self) -> &Container {
        &self.container
    }
    pub fn potential(&self) -> &AtomicPotential {
        &self.potential
    }
    pub fn neighbor_list(&self) -> &NeighborList {
        &self.neighbor_list
    }
    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }
    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }
    pub fn buffers(&self) -> &ForceBuffers {
        &self.buffers
    }
    pub fn forces(&self) -> &[[f64; 3]] {
        &self.buffers.force
    }
    /// Timestep in fs
    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }
    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn thermo(&self) -> Thermo {
        Thermo {
            step: self.step,
            temperature: compute::temperature(&self.atoms),
            kinetic_energy: compute::kinetic_energy(&self.atoms),
            potential_energy: compute::potential_energy(&self.buffers),
            pressure: compute::pressure(&self.atoms, &self.buffers, &self.container),
        }
    }

    /// Advance by one timestep
    pub fn step(&mut self) -> Result<()> {
        let dt = fs_to_natural(self.config.timestep);
        self.ensemble
            .compute1(dt, &mut self.atoms, &self.buffers.force, &self.groupings);
        self.container.wrap(&mut self.atoms.positions);
        self.step += 1;
        self.compute_forces()?;
        self.ensemble
            .compute2(dt, &mut self.atoms, &self.buffers.force, &self.groupings);
        Ok(())
    }

    pub fn run(&mut self, num_steps: usize) -> Result<()> {
        info!("Running {} steps from step {}", num_steps, self.step);
        self.log_thermo();
        for _ in 0..num_steps {
            self.step()?;
            let every = self.config.thermo_every;
            if every > 0 && self.step % every == 0 {
                self.log_thermo();
            }
        }
        info!(
            "Finished at step {}, {} neighbor list builds",
            self.step,
            self.neighbor_list.num_builds()
        );
        Ok(())
    }

    fn compute_forces(&mut self) -> Result<()> {
        let num_atoms = self.atoms.num_atoms();
        if self.potential.cutoff_distance() > 0.0 {
            self.neighbor_list
                .update(self.step, self.atoms.positions(), &self.container)?;
        }
        self.buffers.reset(num_atoms);
        if self.neighbor_list.num_atoms() == num_atoms {
            self.potential.compute(
                &self.atoms,
                &self.container,
                &self.neighbor_list,
                &mut self.buffers,
            );
        }
        Ok(())
    }

    fn log_thermo(&self) {
        let thermo = self.thermo();
        info!(
            "step {:>8}  T {:>10.3} K  PE {:>14.6} eV  KE {:>12.6} eV  E {:>14.6} eV  P {:>12.6e} eV/A^3",
            thermo.step,
            thermo.temperature,
            thermo.potential_energy,
            thermo.kinetic_energy,
            thermo.total_energy(),
            thermo.pressure
        );
    }
}

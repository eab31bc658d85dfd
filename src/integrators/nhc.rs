//! Nose-Hoover chain thermostat
//!
//! The chain is propagated with a 7-term Suzuki-Yoshida factorization, each
//! term split into `NUM_RESPA` sub-steps. One call to
//! [`NoseHooverChain::integrate`] covers half a particle timestep and returns
//! the factor by which the coupled velocities must be scaled.
use crate::error::{Error, Result};

pub const DEFAULT_CHAIN_LENGTH: usize = 4;
pub const NUM_RESPA: usize = 4;

/// Suzuki-Yoshida weights of the 6th-order scheme
const SUZUKI_YOSHIDA: [f64; 7] = [
    0.784513610477560,
    0.235573213359357,
    -1.17767998417887,
    1.31518632068391,
    -1.17767998417887,
    0.235573213359357,
    0.784513610477560,
];

/// State of one chain of thermostat oscillators
///
/// Index 0 couples to the particles, index `M - 1` is the outermost.
#[derive(Clone, Debug)]
pub struct NoseHooverChain {
    pos: Vec<f64>,
    vel: Vec<f64>,
    mass: Vec<f64>,
}
impl NoseHooverChain {
    /// Chain for a bath at `kt` coupled to `dof` degrees of freedom with
    /// relaxation time `tau`, all in natural units
    pub fn new(chain_length: usize, kt: f64, dof: f64, tau: f64) -> Result<Self> {
        if chain_length < 2 {
            return Err(Error::InvalidThermostat(format!(
                "chain length must be at least 2, found {}",
                chain_length
            )));
        }
        for (name, value) in [("kT", kt), ("degrees of freedom", dof), ("tau", tau)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidThermostat(format!(
                    "{} must be positive, found {}",
                    name, value
                )));
            }
        }
        let mut mass = vec![kt * tau * tau; chain_length];
        mass[0] *= dof;
        if let Some(bad) = mass.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
            return Err(Error::InvalidThermostat(format!(
                "chain mass {} is not positive",
                bad
            )));
        }
        let vel = (0..chain_length)
            .map(|m| if m % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        Ok(Self {
            pos: vec![0.0; chain_length],
            vel,
            mass,
        })
    }

    // Getters
    pub fn chain_length(&self) -> usize {
        self.mass.len()
    }
    pub fn positions(&self) -> &[f64] {
        &self.pos
    }
    pub fn velocities(&self) -> &[f64] {
        &self.vel
    }
    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    /// Energy stored in the chain
    ///
    /// Together with the energy of the coupled particles this is conserved
    /// by the thermostatted dynamics.
    pub fn energy(&self, kt: f64, dof: f64) -> f64 {
        let kinetic: f64 = self
            .vel
            .iter()
            .zip(&self.mass)
            .map(|(v, m)| 0.5 * v * v / m)
            .sum();
        let potential = dof * kt * self.pos[0] + kt * self.pos[1..].iter().sum::<f64>();
        kinetic + potential
    }

    /// Advance the chain by `dt2`, half a particle timestep, against the twice
    /// kinetic energy `ek2` of the coupled particles. Returns the velocity
    /// scaling factor.
    pub fn integrate(&mut self, mut ek2: f64, kt: f64, dof: f64, dt2: f64) -> f64 {
        let m_last = self.chain_length() - 1;
        let mut factor = 1.0;
        for weight in SUZUKI_YOSHIDA {
            let dt2 = dt2 * weight / NUM_RESPA as f64;
            let dt4 = dt2 * 0.5;
            let dt8 = dt4 * 0.5;
            for _ in 0..NUM_RESPA {
                self.kick_outer(kt, dt4);
                for m in (0..m_last).rev() {
                    self.kick_inner(m, ek2, kt, dof, dt4, dt8);
                }

                for m in (0..=m_last).rev() {
                    self.pos[m] += dt2 * self.vel[m] / self.mass[m];
                }
                let local = (-dt2 * self.vel[0] / self.mass[0]).exp();
                ek2 *= local * local;
                factor *= local;

                for m in 0..m_last {
                    self.kick_inner(m, ek2, kt, dof, dt4, dt8);
                }
                self.kick_outer(kt, dt4);
            }
        }
        factor
    }

    #[inline]
    fn kick_outer(&mut self, kt: f64, dt4: f64) {
        let m = self.chain_length() - 1;
        let g = self.vel[m - 1] * self.vel[m - 1] / self.mass[m - 1] - kt;
        self.vel[m] += dt4 * g;
    }

    /// Exact update of `vel[m]` under friction from `vel[m + 1]`
    #[inline]
    fn kick_inner(&mut self, m: usize, ek2: f64, kt: f64, dof: f64, dt4: f64, dt8: f64) {
        let tmp = (-dt8 * self.vel[m + 1] / self.mass[m + 1]).exp();
        let g = if m == 0 {
            ek2 - dof * kt
        } else {
            self.vel[m - 1] * self.vel[m - 1] / self.mass[m - 1] - kt
        };
        self.vel[m] = tmp * (tmp * self.vel[m] + dt4 * g);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn initial_state() {
        let chain = NoseHooverChain::new(4, 0.5, 30.0, 2.0).unwrap();
        assert_eq!(chain.velocities(), &[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(chain.positions(), &[0.0; 4]);
        assert_eq!(chain.masses(), &[60.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn invalid_chains_are_rejected() {
        assert!(matches!(
            NoseHooverChain::new(1, 1.0, 3.0, 1.0),
            Err(Error::InvalidThermostat(_))
        ));
        assert!(NoseHooverChain::new(4, 0.0, 3.0, 1.0).is_err());
        assert!(NoseHooverChain::new(4, 1.0, 0.0, 1.0).is_err());
        assert!(NoseHooverChain::new(4, 1.0, 3.0, -1.0).is_err());
        assert!(NoseHooverChain::new(4, f64::NAN, 3.0, 1.0).is_err());
    }

    #[test]
    fn positive_chain_velocity_cools() {
        let mut chain = NoseHooverChain::new(2, 1.0, 10.0, 1.0).unwrap();
        // no force on either oscillator: ek2 = dof kT and vel[0]^2 = mass[0] kT
        chain.vel = vec![chain.mass[0].sqrt(), 0.0];
        let factor = chain.integrate(10.0, 1.0, 10.0, 0.01);
        assert!(factor < 1.0);
        assert!(chain.positions()[0] > 0.0);
    }

    #[test]
    fn integration_is_time_reversible() {
        let (kt, dof) = (0.8, 60.0);
        let mut chain = NoseHooverChain::new(4, kt, dof, 1.5).unwrap();
        let ek2 = 1.7 * dof * kt;
        for _ in 0..10 {
            chain.integrate(ek2, kt, dof, 0.05);
        }
        let saved = chain.clone();

        let forward = chain.integrate(ek2, kt, dof, 0.05);
        let backward = chain.integrate(ek2 * forward * forward, kt, dof, -0.05);
        assert_relative_eq!(forward * backward, 1.0, epsilon = 1e-12);
        for m in 0..4 {
            assert_relative_eq!(chain.pos[m], saved.pos[m], epsilon = 1e-12);
            assert_relative_eq!(chain.vel[m], saved.vel[m], epsilon = 1e-10);
        }
    }

    /// Particles with kinetic energy only, scaled by the chain
    fn run_ideal(chain: &mut NoseHooverChain, mut ek2: f64, kt: f64, dof: f64, calls: usize) -> Vec<f64> {
        let mut history = Vec::with_capacity(calls);
        for _ in 0..calls {
            let factor = chain.integrate(ek2, kt, dof, 0.01);
            ek2 *= factor * factor;
            history.push(ek2);
        }
        history
    }

    #[test]
    fn extended_energy_is_conserved() {
        let (kt, dof) = (1.0, 100.0);
        let mut chain = NoseHooverChain::new(4, kt, dof, 1.0).unwrap();
        let ek2 = 2.0 * dof * kt;
        let initial = 0.5 * ek2 + chain.energy(kt, dof);
        let history = run_ideal(&mut chain, ek2, kt, dof, 2000);
        let last = *history.last().unwrap();
        let final_energy = 0.5 * last + chain.energy(kt, dof);
        assert_relative_eq!(final_energy, initial, max_relative = 1e-8);
        assert!((last - ek2).abs() > 1e-3);
    }

    #[test]
    fn kinetic_energy_is_driven_to_target() {
        let (kt, dof) = (1.0, 100.0);
        let mut chain = NoseHooverChain::new(4, kt, dof, 1.0).unwrap();
        let history = run_ideal(&mut chain, 2.0 * dof * kt, kt, dof, 40_000);
        let tail = &history[history.len() / 2..];
        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        assert_relative_eq!(mean / dof, kt, max_relative = 0.2);
    }
}

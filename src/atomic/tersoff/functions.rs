//! Radial, angular and screening functions of one parameter entry, each
//! with its analytic derivative.

use super::TersoffEntry;

/// Screening coefficients below this switch the exponential off
pub const EPSILON: f64 = 1.0e-15;

impl TersoffEntry {
    /// Repulsive pair term A exp(-lambda d)
    #[inline]
    pub fn fr_and_frp(&self, d12: f64) -> (f64, f64) {
        let fr = self.a * (-self.lambda * d12).exp();
        (fr, -self.lambda * fr)
    }

    /// Attractive pair term B exp(-mu d)
    #[inline]
    pub fn fa(&self, d12: f64) -> f64 {
        self.b * (-self.mu * d12).exp()
    }

    #[inline]
    pub fn fa_and_fap(&self, d12: f64) -> (f64, f64) {
        let fa = self.fa(d12);
        (fa, -self.mu * fa)
    }

    /// Cutoff function: 1 below R1, raised cosine up to R2, 0 beyond
    #[inline]
    pub fn fc(&self, d12: f64) -> f64 {
        if d12 < self.r1 {
            1.0
        } else if d12 < self.r2 {
            (self.pi_factor * (d12 - self.r1)).cos() * 0.5 + 0.5
        } else {
            0.0
        }
    }

    #[inline]
    pub fn fc_and_fcp(&self, d12: f64) -> (f64, f64) {
        if d12 < self.r1 {
            (1.0, 0.0)
        } else if d12 < self.r2 {
            let arg = self.pi_factor * (d12 - self.r1);
            (arg.cos() * 0.5 + 0.5, -arg.sin() * self.pi_factor * 0.5)
        } else {
            (0.0, 0.0)
        }
    }

    /// Angular function, a bump centered at cos = h
    #[inline]
    pub fn g(&self, cos: f64) -> f64 {
        let temp = self.d2 + (cos - self.h) * (cos - self.h);
        self.gamma * (self.one_plus_c2_over_d2 - self.c2 / temp)
    }

    #[inline]
    pub fn g_and_gp(&self, cos: f64) -> (f64, f64) {
        let temp = self.d2 + (cos - self.h) * (cos - self.h);
        let g = self.gamma * (self.one_plus_c2_over_d2 - self.c2 / temp);
        let gp = self.gamma * (2.0 * self.c2 * (cos - self.h) / (temp * temp));
        (g, gp)
    }

    #[inline]
    fn cubic(&self) -> bool {
        self.m.round() as i32 == 3
    }

    /// Exponential screening exp(alpha (d12 - d13)^m)
    #[inline]
    pub fn e(&self, d12: f64, d13: f64) -> f64 {
        if self.alpha < EPSILON {
            return 1.0;
        }
        let r = d12 - d13;
        if self.cubic() {
            (self.alpha * r * r * r).exp()
        } else {
            (self.alpha * r).exp()
        }
    }

    /// Screening and its derivative with respect to d12
    #[inline]
    pub fn e_and_ep(&self, d12: f64, d13: f64) -> (f64, f64) {
        if self.alpha < EPSILON {
            return (1.0, 0.0);
        }
        let r = d12 - d13;
        if self.cubic() {
            let e = (self.alpha * r * r * r).exp();
            (e, 3.0 * self.alpha * r * r * e)
        } else {
            let e = (self.alpha * r).exp();
            (e, self.alpha * e)
        }
    }
}

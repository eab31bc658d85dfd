/// A chemical species: the symbol used in potential files and its mass in amu
#[derive(Clone, Debug, PartialEq)]
pub struct Species {
    symbol: String,
    mass: f64,
}
impl Species {
    pub fn new(symbol: &str, mass: f64) -> Self {
        assert!(mass > 0.0, "Mass should be positive, found {}", mass);
        Self {
            symbol: symbol.to_string(),
            mass,
        }
    }
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
}

use std::{f64::consts::PI, fs, path::Path, str::FromStr};

use log::info;

use crate::{
    atom_type::Species,
    error::{Error, Result},
};

/// The 14 coefficients of one Tersoff (1988) entry, as written in a potential file
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TersoffCoefficients {
    pub a: f64,
    pub b: f64,
    pub lambda: f64,
    pub mu: f64,
    pub beta: f64,
    pub n: f64,
    pub c: f64,
    pub d: f64,
    pub h: f64,
    pub r1: f64,
    pub r2: f64,
    pub m: f64,
    pub alpha: f64,
    pub gamma: f64,
}
impl TersoffCoefficients {
    fn from_slice(v: &[f64; 14]) -> Self {
        Self {
            a: v[0],
            b: v[1],
            lambda: v[2],
            mu: v[3],
            beta: v[4],
            n: v[5],
            c: v[6],
            d: v[7],
            h: v[8],
            r1: v[9],
            r2: v[10],
            m: v[11],
            alpha: v[12],
            gamma: v[13],
        }
    }
    fn named(&self) -> [(&'static str, f64); 14] {
        [
            ("A", self.a),
            ("B", self.b),
            ("lambda", self.lambda),
            ("mu", self.mu),
            ("beta", self.beta),
            ("n", self.n),
            ("c", self.c),
            ("d", self.d),
            ("h", self.h),
            ("R1", self.r1),
            ("R2", self.r2),
            ("m", self.m),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
        ]
    }
}

/// One validated parameter entry with its cached derived values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TersoffEntry {
    pub a: f64,
    pub b: f64,
    pub lambda: f64,
    pub mu: f64,
    pub beta: f64,
    pub n: f64,
    pub c: f64,
    pub d: f64,
    pub h: f64,
    pub r1: f64,
    pub r2: f64,
    pub m: f64,
    pub alpha: f64,
    pub gamma: f64,
    pub c2: f64,
    pub d2: f64,
    pub one_plus_c2_over_d2: f64,
    pub pi_factor: f64,
    pub minus_half_over_n: f64,
}
impl TersoffEntry {
    pub fn new(coeffs: TersoffCoefficients, entry: usize) -> Result<Self> {
        let invalid = |name, value, requirement| Error::InvalidParameter {
            name,
            entry,
            value,
            requirement,
        };
        for (name, value) in coeffs.named() {
            if !value.is_finite() {
                return Err(invalid(name, value, "finite"));
            }
        }
        let non_negative = [
            ("A", coeffs.a),
            ("B", coeffs.b),
            ("lambda", coeffs.lambda),
            ("mu", coeffs.mu),
            ("beta", coeffs.beta),
            ("c", coeffs.c),
            ("R1", coeffs.r1),
            ("alpha", coeffs.alpha),
            ("gamma", coeffs.gamma),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(invalid(name, value, ">= 0"));
            }
        }
        if coeffs.n <= 0.0 {
            return Err(invalid("n", coeffs.n, "> 0"));
        }
        if coeffs.d <= 0.0 {
            return Err(invalid("d", coeffs.d, "> 0"));
        }
        if coeffs.r2 < coeffs.r1 {
            return Err(invalid("R2", coeffs.r2, ">= R1"));
        }
        if coeffs.m != 1.0 && coeffs.m != 3.0 {
            return Err(invalid("m", coeffs.m, "1 or 3"));
        }

        let TersoffCoefficients {
            a,
            b,
            lambda,
            mu,
            beta,
            n,
            c,
            d,
            h,
            r1,
            r2,
            m,
            alpha,
            gamma,
        } = coeffs;
        Ok(Self {
            a,
            b,
            lambda,
            mu,
            beta,
            n,
            c,
            d,
            h,
            r1,
            r2,
            m,
            alpha,
            gamma,
            c2: c * c,
            d2: d * d,
            one_plus_c2_over_d2: 1.0 + c * c / (d * d),
            pi_factor: PI / (r2 - r1),
            minus_half_over_n: -0.5 / n,
        })
    }
}

/// Parameter table over ordered species triples
#[derive(Clone, Debug)]
pub struct TersoffParameters {
    symbols: Vec<String>,
    entries: Vec<TersoffEntry>,
    cutoff: f64,
}
impl TersoffParameters {
    /// `coeffs` are ordered by (i, j, k) with k running fastest
    pub fn new(symbols: Vec<String>, coeffs: &[TersoffCoefficients]) -> Result<Self> {
        let num_types = symbols.len();
        if num_types == 0 {
            return Err(Error::InvalidConfig(
                "Tersoff potential needs at least one species".to_string(),
            ));
        }
        let expected = num_types * num_types * num_types;
        if coeffs.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "Tersoff potential with {} species needs {} entries, found {}",
                num_types,
                expected,
                coeffs.len()
            )));
        }
        let entries = coeffs
            .iter()
            .enumerate()
            .map(|(i, &c)| TersoffEntry::new(c, i))
            .collect::<Result<Vec<_>>>()?;
        let cutoff = entries.iter().map(|e| e.r2).fold(0.0, f64::max);
        info!(
            "Tersoff potential for {:?}, cutoff {} A",
            symbols, cutoff
        );
        Ok(Self {
            symbols,
            entries,
            cutoff,
        })
    }

    /// Table for a single species
    pub fn single(symbol: &str, coeffs: TersoffCoefficients) -> Result<Self> {
        Self::new(vec![symbol.to_string()], &[coeffs])
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        text.parse()
    }

    pub fn num_types(&self) -> usize {
        self.symbols.len()
    }
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
    /// Largest R2 over all entries
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
    #[inline]
    pub fn entry(&self, i: usize, j: usize, k: usize) -> &TersoffEntry {
        let nt = self.symbols.len();
        &self.entries[(i * nt + j) * nt + k]
    }

    /// Atom type `t` is taken to be potential type `t`, so the species must
    /// appear in the same order as in the potential file
    pub fn check_species(&self, species: &[Species]) -> Result<()> {
        let symbols: Vec<&str> = species.iter().map(|s| s.symbol()).collect();
        if symbols.len() != self.symbols.len()
            || symbols.iter().zip(&self.symbols).any(|(a, b)| *a != b.as_str())
        {
            return Err(Error::InvalidConfig(format!(
                "atom species {:?} do not match Tersoff species {:?}",
                symbols, self.symbols
            )));
        }
        Ok(())
    }
}

/// Whitespace-separated tokens with their 1-based line numbers, `#` starts a comment
struct Tokens<'a> {
    iter: std::vec::IntoIter<(usize, &'a str)>,
    last_line: usize,
}
impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens: Vec<(usize, &'a str)> = text
            .lines()
            .enumerate()
            .flat_map(|(n, line)| {
                let content = line.split('#').next().unwrap_or("");
                content.split_whitespace().map(move |t| (n + 1, t))
            })
            .collect();
        Self {
            iter: tokens.into_iter(),
            last_line: 1,
        }
    }
    fn next(&mut self, what: &str) -> Result<(usize, &'a str)> {
        match self.iter.next() {
            Some((line, token)) => {
                self.last_line = line;
                Ok((line, token))
            }
            None => Err(Error::Parse {
                line: self.last_line,
                message: format!("unexpected end of file, expected {}", what),
            }),
        }
    }
}

impl FromStr for TersoffParameters {
    type Err = Error;

    /// Reads `tersoff_1988 <num_types> <symbols...>` followed by
    /// `num_types^3` records of `A B lambda mu beta n c d h R1 R2 m alpha gamma`
    fn from_str(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);

        let (line, keyword) = tokens.next("potential name")?;
        if keyword != "tersoff_1988" {
            return Err(Error::Parse {
                line,
                message: format!("expected 'tersoff_1988', found '{}'", keyword),
            });
        }
        let (line, token) = tokens.next("number of types")?;
        let num_types: usize = token.parse().map_err(|_| Error::Parse {
            line,
            message: format!("invalid number of types '{}'", token),
        })?;
        if num_types == 0 {
            return Err(Error::Parse {
                line,
                message: "number of types should be positive".to_string(),
            });
        }
        let mut symbols = Vec::with_capacity(num_types);
        for _ in 0..num_types {
            symbols.push(tokens.next("species symbol")?.1.to_string());
        }

        let num_entries = num_types * num_types * num_types;
        let mut coeffs = Vec::with_capacity(num_entries);
        for _ in 0..num_entries {
            let mut values = [0.0; 14];
            for value in values.iter_mut() {
                let (line, token) = tokens.next("Tersoff coefficient")?;
                *value = token.parse().map_err(|_| Error::Parse {
                    line,
                    message: format!("invalid number '{}'", token),
                })?;
            }
            coeffs.push(TersoffCoefficients::from_slice(&values));
        }
        if let Ok((line, token)) = tokens.next("") {
            return Err(Error::Parse {
                line,
                message: format!("unexpected trailing token '{}'", token),
            });
        }
        Self::new(symbols, &coeffs)
    }
}

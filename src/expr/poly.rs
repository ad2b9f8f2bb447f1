//! Generalised polynomials in `s` with complex coefficients and real exponents.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

use num_complex::Complex64;

/// Two exponents closer than this are the same power of `s`.
pub const POWER_TOLERANCE: f64 = 1e-12;

/// Coefficients that cancel to this fraction of their inputs are dropped.
pub const CANCEL_TOLERANCE: f64 = 1e-12;

/// A single `coeff * s^power` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub coeff: Complex64,
    pub power: f64,
}

impl Term {
    pub fn new(coeff: Complex64, power: f64) -> Self {
        Self { coeff, power }
    }

    fn eval(&self, s: Complex64) -> Complex64 {
        if s.norm() == 0.0 {
            return match self.power.partial_cmp(&0.0) {
                Some(Ordering::Greater) => Complex64::new(0.0, 0.0),
                Some(Ordering::Equal) => self.coeff,
                _ => Complex64::new(f64::INFINITY, 0.0),
            };
        }
        let rounded = self.power.round();
        if (self.power - rounded).abs() < POWER_TOLERANCE {
            self.coeff * s.powi(rounded as i32)
        } else {
            self.coeff * s.powf(self.power)
        }
    }
}

/// Sum of terms, kept sorted by descending power with like powers merged
/// and zero coefficients removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Poly {
    terms: Vec<Term>,
}

impl Poly {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(Complex64::new(1.0, 0.0))
    }

    pub fn constant(coeff: Complex64) -> Self {
        Self::monomial(coeff, 0.0)
    }

    pub fn monomial(coeff: Complex64, power: f64) -> Self {
        Self::from_terms(vec![Term::new(coeff, power)])
    }

    /// Build a polynomial from arbitrary terms, merging like powers.
    pub fn from_terms(mut terms: Vec<Term>) -> Self {
        terms.retain(|t| t.coeff.norm() != 0.0);
        terms.sort_by(|a, b| b.power.partial_cmp(&a.power).unwrap_or(Ordering::Equal));

        let mut merged: Vec<Term> = Vec::with_capacity(terms.len());
        let mut magnitude = 0.0;
        for term in terms {
            match merged.last_mut() {
                Some(last) if (last.power - term.power).abs() < POWER_TOLERANCE => {
                    last.coeff += term.coeff;
                    magnitude += term.coeff.norm();
                }
                _ => {
                    Self::prune_last(&mut merged, magnitude);
                    magnitude = term.coeff.norm();
                    merged.push(term);
                }
            }
        }
        Self::prune_last(&mut merged, magnitude);

        Self { terms: merged }
    }

    fn prune_last(terms: &mut Vec<Term>, magnitude: f64) {
        if let Some(last) = terms.last() {
            let norm = last.coeff.norm();
            if norm == 0.0 || norm <= CANCEL_TOLERANCE * magnitude {
                terms.pop();
            }
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_monomial(&self) -> bool {
        self.terms.len() == 1
    }

    /// True when the polynomial has no `s` dependence.
    pub fn is_constant(&self) -> bool {
        match self.terms.as_slice() {
            [] => true,
            [t] => t.power.abs() < POWER_TOLERANCE,
            _ => false,
        }
    }

    /// Highest-power term.
    pub fn leading(&self) -> Option<&Term> {
        self.terms.first()
    }

    /// Lowest-power term.
    pub fn trailing(&self) -> Option<&Term> {
        self.terms.last()
    }

    pub fn degree(&self) -> Option<f64> {
        self.leading().map(|t| t.power)
    }

    /// Coefficient of `s^power`, zero when absent.
    pub fn coeff(&self, power: f64) -> Complex64 {
        self.terms
            .iter()
            .find(|t| (t.power - power).abs() < POWER_TOLERANCE)
            .map(|t| t.coeff)
            .unwrap_or_default()
    }

    pub fn scale(&self, factor: Complex64) -> Self {
        Self::from_terms(
            self.terms
                .iter()
                .map(|t| Term::new(t.coeff * factor, t.power))
                .collect(),
        )
    }

    /// Multiply by `s^power`.
    pub fn shift(&self, power: f64) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(t.coeff, t.power + power))
                .collect(),
        }
    }

    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.terms.iter().map(|t| t.eval(s)).sum()
    }

    /// Largest coefficient magnitude.
    pub fn max_abs(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coeff.norm())
            .fold(0.0, f64::max)
    }

    pub fn has_finite_coefficients(&self) -> bool {
        self.terms
            .iter()
            .all(|t| t.coeff.re.is_finite() && t.coeff.im.is_finite() && t.power.is_finite())
    }

    pub fn has_real_coefficients(&self) -> bool {
        self.terms
            .iter()
            .all(|t| t.coeff.im.abs() <= CANCEL_TOLERANCE * t.coeff.norm())
    }

    /// Term-by-term comparison with a relative tolerance.
    pub fn approx_eq(&self, other: &Poly, tolerance: f64) -> bool {
        self.terms.len() == other.terms.len()
            && self.terms.iter().zip(&other.terms).all(|(a, b)| {
                (a.power - b.power).abs() < POWER_TOLERANCE
                    && (a.coeff - b.coeff).norm() <= tolerance * a.coeff.norm().max(b.coeff.norm())
            })
    }
}

impl Add for &Poly {
    type Output = Poly;

    fn add(self, rhs: &Poly) -> Poly {
        let mut terms = self.terms.clone();
        terms.extend_from_slice(&rhs.terms);
        Poly::from_terms(terms)
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &Poly) -> Poly {
        self + &(-rhs)
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(-t.coeff, t.power))
                .collect(),
        }
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &Poly) -> Poly {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for a in &self.terms {
            for b in &rhs.terms {
                terms.push(Term::new(a.coeff * b.coeff, a.power + b.power));
            }
        }
        Poly::from_terms(terms)
    }
}

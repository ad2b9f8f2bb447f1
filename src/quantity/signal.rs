//! Superposition of independently named signal components.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use num_complex::Complex64;

use crate::error::{OnePortError, Result};
use crate::expr::{Expr, Poly, Term};

/// First id handed out by [`NoiseId::fresh`]. Ids chosen by hand should
/// stay below it.
pub const FIRST_FRESH_NOISE_ID: usize = 1_000_000;

static NEXT_NOISE_ID: AtomicUsize = AtomicUsize::new(FIRST_FRESH_NOISE_ID);

/// Identifies an independent noise source. Components with the same id
/// are coherent and add as amplitudes; different ids add as powers.
///
/// Sources built without an explicit id draw one from a process-wide
/// counter starting at [`FIRST_FRESH_NOISE_ID`], so two such sources are
/// never coherent, even across separately built networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoiseId(pub usize);

impl NoiseId {
    /// Allocate an id not handed out before in this process.
    pub fn fresh() -> Self {
        NoiseId(NEXT_NOISE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NoiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

fn same_omega(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
}

/// A voltage or current expressed as a sum of DC, AC phasor, transient
/// (Laplace-domain) and noise components.
#[derive(Debug, Clone, Default)]
pub struct Signal {
    dc: Expr,
    ac: Vec<(f64, Expr)>,
    transient: Expr,
    noise: Vec<(NoiseId, Expr)>,
}

impl Signal {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Constant DC level.
    pub fn dc(value: f64) -> Self {
        Self::dc_expr(Expr::constant(value))
    }

    pub fn dc_expr(value: Expr) -> Self {
        Self {
            dc: value,
            ..Self::default()
        }
        .pruned()
    }

    /// Sinusoid `Re{phasor * e^(j omega t)}`.
    pub fn ac(phasor: Complex64, omega: f64) -> Self {
        Self::ac_expr(Expr::complex(phasor), omega)
    }

    pub fn ac_expr(phasor: Expr, omega: f64) -> Self {
        Self {
            ac: vec![(omega, phasor)],
            ..Self::default()
        }
        .pruned()
    }

    /// Transient component given by its Laplace transform.
    pub fn laplace(expr: Expr) -> Self {
        Self {
            transient: expr,
            ..Self::default()
        }
        .pruned()
    }

    /// Noise component with the given amplitude spectral density shape.
    pub fn noise(id: NoiseId, shape: Expr) -> Self {
        Self {
            noise: vec![(id, shape)],
            ..Self::default()
        }
        .pruned()
    }

    fn pruned(mut self) -> Self {
        self.ac.retain(|(_, p)| !p.is_zero());
        self.noise.retain(|(_, n)| !n.is_zero());
        self
    }

    pub fn dc_part(&self) -> &Expr {
        &self.dc
    }

    pub fn ac_parts(&self) -> &[(f64, Expr)] {
        &self.ac
    }

    pub fn transient_part(&self) -> &Expr {
        &self.transient
    }

    pub fn noise_parts(&self) -> &[(NoiseId, Expr)] {
        &self.noise
    }

    /// Angular frequencies of the AC components.
    pub fn ac_keys(&self) -> Vec<f64> {
        self.ac.iter().map(|(w, _)| *w).collect()
    }

    /// Phasor at `omega`, if there is one.
    pub fn phasor(&self, omega: f64) -> Option<&Expr> {
        self.ac
            .iter()
            .find(|(w, _)| same_omega(*w, omega))
            .map(|(_, p)| p)
    }

    /// Keep only the AC component at `omega`.
    pub fn select(&self, omega: f64) -> Signal {
        match self.phasor(omega) {
            Some(p) => Signal::ac_expr(p.clone(), omega),
            None => Signal::zero(),
        }
    }

    /// Number of non-zero independent components.
    pub fn component_count(&self) -> usize {
        usize::from(!self.dc.is_zero())
            + self.ac.len()
            + usize::from(!self.transient.is_zero())
            + self.noise.len()
    }

    pub fn is_zero(&self) -> bool {
        self.component_count() == 0
    }

    pub fn is_dc(&self) -> bool {
        self.component_count() == 1 && !self.dc.is_zero()
    }

    pub fn is_ac(&self) -> bool {
        self.component_count() == 1 && self.ac.len() == 1
    }

    pub fn is_transient(&self) -> bool {
        self.component_count() == 1 && !self.transient.is_zero()
    }

    pub fn is_noise(&self) -> bool {
        self.component_count() == 1 && self.noise.len() == 1
    }

    pub fn has_noise(&self) -> bool {
        !self.noise.is_empty()
    }

    pub fn is_superposition(&self) -> bool {
        self.component_count() > 1
    }

    /// Pass the signal through the transfer function `h`.
    pub fn transfer(&self, h: &Expr) -> Signal {
        let origin = Complex64::new(0.0, 0.0);
        let dc = if self.dc.is_zero() {
            Expr::zero()
        } else {
            &self.dc * &h.subs(origin)
        };
        let ac = self
            .ac
            .iter()
            .map(|(w, p)| (*w, p * &h.subs(Complex64::new(0.0, *w))))
            .collect();
        let transient = if self.transient.is_zero() {
            Expr::zero()
        } else {
            &self.transient * h
        };
        let noise = self.noise.iter().map(|(id, n)| (*id, n * h)).collect();
        Signal {
            dc,
            ac,
            transient,
            noise,
        }
        .pruned()
    }

    /// Laplace transform of the whole signal. Noise has none.
    pub fn laplace_transform(&self) -> Result<Expr> {
        if self.has_noise() {
            return Err(OnePortError::transform(
                "noise components have no Laplace transform",
            ));
        }
        let mut result = self.transient.clone();
        if !self.dc.is_zero() {
            result = result + &self.dc * &Expr::monomial(1.0, -1.0);
        }
        for (omega, phasor) in &self.ac {
            let p = phasor.constant_value().ok_or_else(|| {
                OnePortError::transform(format!("phasor at omega = {} is not a finite constant", omega))
            })?;
            let num = Poly::from_terms(vec![
                Term::new(Complex64::new(p.re, 0.0), 1.0),
                Term::new(Complex64::new(-p.im * omega, 0.0), 0.0),
            ]);
            let den = Poly::from_terms(vec![
                Term::new(Complex64::new(1.0, 0.0), 2.0),
                Term::new(Complex64::new(omega * omega, 0.0), 0.0),
            ]);
            result = result + Expr::ratio(num, den);
        }
        Ok(result)
    }

    /// Amplitude spectral density at frequency `f` (Hz). Independent noise
    /// sources add in power.
    pub fn asd(&self, f: f64) -> f64 {
        let omega = 2.0 * std::f64::consts::PI * f;
        self.noise
            .iter()
            .map(|(_, n)| n.at_omega(omega).norm_sqr())
            .sum::<f64>()
            .sqrt()
    }
}

impl std::ops::Add for &Signal {
    type Output = Signal;

    fn add(self, rhs: &Signal) -> Signal {
        let mut ac = self.ac.clone();
        for (w, p) in &rhs.ac {
            match ac.iter_mut().find(|(w2, _)| same_omega(*w, *w2)) {
                Some((_, existing)) => *existing = &*existing + p,
                None => ac.push((*w, p.clone())),
            }
        }
        ac.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut noise = self.noise.clone();
        for (id, n) in &rhs.noise {
            match noise.iter_mut().find(|(id2, _)| id == id2) {
                Some((_, existing)) => *existing = &*existing + n,
                None => noise.push((*id, n.clone())),
            }
        }
        noise.sort_by_key(|(id, _)| *id);

        Signal {
            dc: &self.dc + &rhs.dc,
            ac,
            transient: &self.transient + &rhs.transient,
            noise,
        }
        .pruned()
    }
}

impl std::ops::Neg for &Signal {
    type Output = Signal;

    fn neg(self) -> Signal {
        Signal {
            dc: -&self.dc,
            ac: self.ac.iter().map(|(w, p)| (*w, -p)).collect(),
            transient: -&self.transient,
            noise: self.noise.iter().map(|(id, n)| (*id, -n)).collect(),
        }
    }
}

impl std::ops::Sub for &Signal {
    type Output = Signal;

    fn sub(self, rhs: &Signal) -> Signal {
        self + &(-rhs)
    }
}

impl PartialEq for Signal {
    fn eq(&self, other: &Self) -> bool {
        self.dc == other.dc
            && self.transient == other.transient
            && self.ac.len() == other.ac.len()
            && self
                .ac
                .iter()
                .zip(&other.ac)
                .all(|((w1, p1), (w2, p2))| same_omega(*w1, *w2) && p1 == p2)
            && self.noise.len() == other.noise.len()
            && self
                .noise
                .iter()
                .zip(&other.noise)
                .all(|((id1, n1), (id2, n2))| id1 == id2 && n1 == n2)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.is_dc() {
            return write!(f, "{}", self.dc);
        }
        let mut parts = Vec::new();
        if !self.dc.is_zero() {
            parts.push(format!("dc: {}", self.dc));
        }
        for (w, p) in &self.ac {
            parts.push(format!("{}: {}", w, p));
        }
        if !self.transient.is_zero() {
            parts.push(format!("s: {}", self.transient));
        }
        for (id, n) in &self.noise {
            parts.push(format!("{}: {}", id, n));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}

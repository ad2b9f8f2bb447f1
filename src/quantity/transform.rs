//! Time-domain view of s-domain quantities.
//!
//! Transients are inverted numerically with the fixed Talbot contour
//! (Abate and Valkó). DC and AC components are steady-state and are
//! reported in closed form.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{OnePortError, Result};
use crate::expr::Expr;

use super::Signal;

/// Number of contour nodes for the Talbot inversion.
const TALBOT_TERMS: usize = 24;

/// Numerical inverse Laplace transform of `expr` at `t > 0`.
pub fn inverse_laplace(expr: &Expr, t: f64) -> f64 {
    let m = TALBOT_TERMS as f64;
    let r = 2.0 * m / (5.0 * t);

    let mut sum = 0.5 * (expr.eval(Complex64::new(r, 0.0)) * (r * t).exp()).re;
    for k in 1..TALBOT_TERMS {
        let theta = k as f64 * PI / m;
        let cot = 1.0 / theta.tan();
        let s = Complex64::new(r * theta * cot, r * theta);
        let sigma = theta + (theta * cot - 1.0) * cot;
        sum += ((s * t).exp() * expr.eval(s) * Complex64::new(1.0, sigma)).re;
    }
    r / m * sum
}

/// A steady-state sinusoid `amplitude * cos(omega t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoid {
    pub amplitude: f64,
    pub phase: f64,
    pub omega: f64,
}

/// Time-domain representation of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignal {
    dc: f64,
    sinusoids: Vec<Sinusoid>,
    impulse: f64,
    transient: Option<Expr>,
}

impl TimeSignal {
    /// Convert a superposition signal. Noise has no time-domain waveform.
    pub fn from_signal(signal: &Signal) -> Result<Self> {
        if signal.has_noise() {
            return Err(OnePortError::transform(
                "noise components have no time-domain waveform",
            ));
        }

        let dc = if signal.dc_part().is_zero() {
            0.0
        } else {
            signal.dc_part().real_value().ok_or_else(|| {
                OnePortError::transform(format!("DC level {} is not a real constant", signal.dc_part()))
            })?
        };

        let sinusoids = signal
            .ac_parts()
            .iter()
            .map(|(omega, phasor)| {
                let p = phasor.constant_value().ok_or_else(|| {
                    OnePortError::transform(format!("phasor {} is not a finite constant", phasor))
                })?;
                Ok(Sinusoid {
                    amplitude: p.norm(),
                    phase: p.arg(),
                    omega: *omega,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut out = Self::from_laplace(signal.transient_part())?;
        out.dc = dc;
        out.sinusoids = sinusoids;
        Ok(out)
    }

    /// Inverse transform of a Laplace-domain expression, for example an
    /// impulse response. A constant part at infinite frequency becomes a
    /// Dirac impulse weight.
    pub fn from_laplace(expr: &Expr) -> Result<Self> {
        if expr.is_zero() {
            return Ok(Self {
                dc: 0.0,
                sinusoids: Vec::new(),
                impulse: 0.0,
                transient: None,
            });
        }
        let (c, rest) = expr.split_proper().ok_or_else(|| {
            OnePortError::transform(format!("{} has no causal inverse Laplace transform", expr))
        })?;
        if c.im.abs() > 1e-12 * c.norm() {
            return Err(OnePortError::transform(format!(
                "impulse weight {} is not real",
                c
            )));
        }
        Ok(Self {
            dc: 0.0,
            sinusoids: Vec::new(),
            impulse: c.re,
            transient: (!rest.is_zero()).then_some(rest),
        })
    }

    pub fn dc(&self) -> f64 {
        self.dc
    }

    pub fn sinusoids(&self) -> &[Sinusoid] {
        &self.sinusoids
    }

    /// Weight of the Dirac impulse at `t = 0`.
    pub fn impulse(&self) -> f64 {
        self.impulse
    }

    /// Value at time `t`, excluding the impulse. The transient is causal.
    pub fn eval(&self, t: f64) -> f64 {
        let steady: f64 = self
            .sinusoids
            .iter()
            .map(|s| s.amplitude * (s.omega * t + s.phase).cos())
            .sum();
        let transient = match &self.transient {
            Some(expr) if t > 0.0 => inverse_laplace(expr, t),
            _ => 0.0,
        };
        self.dc + steady + transient
    }

    pub fn sample(&self, times: impl IntoIterator<Item = f64>) -> Vec<f64> {
        times.into_iter().map(|t| self.eval(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Poly, Term};
    use approx::assert_relative_eq;

    fn first_order(a: f64) -> Expr {
        Expr::ratio(
            Poly::one(),
            Poly::from_terms(vec![
                Term::new(Complex64::new(1.0, 0.0), 1.0),
                Term::new(Complex64::new(a, 0.0), 0.0),
            ]),
        )
    }

    #[test]
    fn test_talbot_exponential() {
        let f = first_order(1.0);
        for t in [0.1f64, 0.5, 1.0, 3.0] {
            assert_relative_eq!(inverse_laplace(&f, t), (-t).exp(), epsilon = 1e-7);
        }
    }

    #[test]
    fn test_talbot_step() {
        let f = Expr::monomial(10.0, -1.0);
        assert_relative_eq!(inverse_laplace(&f, 2.0), 10.0, epsilon = 1e-7);
    }

    #[test]
    fn test_causal_transient() {
        let sig = TimeSignal::from_laplace(&Expr::monomial(5.0, -1.0)).unwrap();
        assert_eq!(sig.eval(-1.0), 0.0);
        assert_relative_eq!(sig.eval(1.0), 5.0, epsilon = 1e-7);
    }

    #[test]
    fn test_impulse_weight() {
        // (s + 2)/(s + 1) = 1 + 1/(s + 1)
        let h = Expr::one() + first_order(1.0);
        let sig = TimeSignal::from_laplace(&h).unwrap();
        assert_relative_eq!(sig.impulse(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(sig.eval(1.0), (-1.0f64).exp(), epsilon = 1e-7);
    }

    #[test]
    fn test_improper_is_rejected() {
        assert!(TimeSignal::from_laplace(&Expr::s()).is_err());
    }

    #[test]
    fn test_steady_state_components() {
        let sig = &Signal::dc(1.0) + &Signal::ac(Complex64::new(0.0, -2.0), 3.0);
        let t = TimeSignal::from_signal(&sig).unwrap();
        // 1 + 2 sin(3t)
        assert_relative_eq!(t.eval(0.25), 1.0 + 2.0 * (0.75f64).sin(), epsilon = 1e-12);
        assert_eq!(t.sinusoids().len(), 1);
    }
}

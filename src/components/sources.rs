//! Independent voltage and current sources.

use std::fmt;

use num_complex::Complex64;

use crate::error::Result;
use crate::expr::{Expr, Poly, Term};
use crate::quantity::{Current, NoiseId, Signal, Voltage};

use super::{finite_expr, Param};

/// One `amplitude * e^(-decay t) * cos(omega t + phase) * u(t)` term of a
/// time-domain source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedSinusoid {
    pub amplitude: f64,
    pub decay: f64,
    pub omega: f64,
    pub phase: f64,
}

impl DampedSinusoid {
    pub fn new(amplitude: f64, decay: f64, omega: f64, phase: f64) -> Self {
        Self {
            amplitude,
            decay,
            omega,
            phase,
        }
    }

    /// `amplitude * e^(-decay t) * u(t)`.
    pub fn exponential(amplitude: f64, decay: f64) -> Self {
        Self::new(amplitude, decay, 0.0, 0.0)
    }

    /// Laplace transform,
    /// `A((s + a) cos(phi) - omega sin(phi)) / ((s + a)^2 + omega^2)`.
    pub fn laplace(&self) -> Expr {
        let re = |x: f64| Complex64::new(x, 0.0);
        let (a, w, phi) = (self.decay, self.omega, self.phase);
        if w == 0.0 {
            let den = Poly::from_terms(vec![Term::new(re(1.0), 1.0), Term::new(re(a), 0.0)]);
            return Expr::ratio(Poly::constant(re(self.amplitude * phi.cos())), den);
        }
        let num = Poly::from_terms(vec![
            Term::new(re(self.amplitude * phi.cos()), 1.0),
            Term::new(re(self.amplitude * (a * phi.cos() - w * phi.sin())), 0.0),
        ]);
        let den = Poly::from_terms(vec![
            Term::new(re(1.0), 2.0),
            Term::new(re(2.0 * a), 1.0),
            Term::new(re(a * a + w * w), 0.0),
        ]);
        Expr::ratio(num, den)
    }

    pub fn eval(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        self.amplitude * (-self.decay * t).exp() * (self.omega * t + self.phase).cos()
    }
}

/// The signal a source produces.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// Arbitrary superposition.
    Signal(Signal),
    /// Arbitrary s-domain value.
    Laplace(Expr),
    /// Step of the given height at `t = 0`.
    Step(f64),
    Dc(f64),
    /// `amplitude * cos(omega t + phase)`.
    Ac { amplitude: f64, phase: f64, omega: f64 },
    /// White noise with the given amplitude spectral density.
    Noise { asd: f64, id: NoiseId },
    /// Sum of causal damped sinusoids.
    Time(Vec<DampedSinusoid>),
}

impl SourceKind {
    pub fn signal(&self) -> Signal {
        match self {
            SourceKind::Signal(s) => s.clone(),
            SourceKind::Laplace(e) => Signal::laplace(e.clone()),
            SourceKind::Step(v) => Signal::laplace(Expr::monomial(*v, -1.0)),
            SourceKind::Dc(v) => Signal::dc(*v),
            SourceKind::Ac {
                amplitude,
                phase,
                omega,
            } => Signal::ac(Complex64::from_polar(*amplitude, *phase), *omega),
            SourceKind::Noise { asd, id } => Signal::noise(*id, Expr::constant(*asd)),
            SourceKind::Time(terms) => Signal::laplace(
                terms
                    .iter()
                    .fold(Expr::zero(), |acc, term| acc + term.laplace()),
            ),
        }
    }

    /// Constructor name, `prefix` being `'V'` or `'I'`.
    pub fn keyword(&self, prefix: char) -> &'static str {
        let voltage = prefix == 'V';
        match (self, voltage) {
            (SourceKind::Signal(_), true) => "V",
            (SourceKind::Signal(_), false) => "I",
            (SourceKind::Laplace(_), true) => "sV",
            (SourceKind::Laplace(_), false) => "sI",
            (SourceKind::Step(_), true) => "Vstep",
            (SourceKind::Step(_), false) => "Istep",
            (SourceKind::Dc(_), true) => "Vdc",
            (SourceKind::Dc(_), false) => "Idc",
            (SourceKind::Ac { .. }, true) => "Vac",
            (SourceKind::Ac { .. }, false) => "Iac",
            (SourceKind::Noise { .. }, true) => "Vnoise",
            (SourceKind::Noise { .. }, false) => "Inoise",
            (SourceKind::Time(_), true) => "v",
            (SourceKind::Time(_), false) => "i",
        }
    }

    pub(crate) fn fmt_with(&self, f: &mut fmt::Formatter<'_>, prefix: char) -> fmt::Result {
        let name = self.keyword(prefix);
        match self {
            SourceKind::Signal(s) => write!(f, "{}({})", name, s),
            SourceKind::Laplace(e) => write!(f, "{}({})", name, e),
            SourceKind::Step(v) | SourceKind::Dc(v) => write!(f, "{}({})", name, v),
            SourceKind::Ac {
                amplitude,
                phase,
                omega,
            } => write!(f, "{}({}, {}, {})", name, amplitude, phase, omega),
            SourceKind::Noise { asd, id } => write!(f, "{}({}, {})", name, asd, id.0),
            SourceKind::Time(terms) => {
                let parts: Vec<String> = terms
                    .iter()
                    .map(|t| format!("{}*exp(-{}t)*cos({}t + {})", t.amplitude, t.decay, t.omega, t.phase))
                    .collect();
                write!(f, "{}({})", name, parts.join(" + "))
            }
        }
    }
}

macro_rules! source {
    ($name:ident, $quantity:ident, $method:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub kind: SourceKind,
        }

        impl $name {
            pub fn from_kind(kind: SourceKind) -> Self {
                Self { kind }
            }

            /// Arbitrary superposition signal.
            pub fn arbitrary(signal: Signal) -> Self {
                Self::from_kind(SourceKind::Signal(signal))
            }

            /// Arbitrary constant value. Constants are steady-state DC.
            pub fn constant(value: impl Param) -> Result<Self> {
                let v = value.to_param($prefix, "value")?;
                Ok(Self::arbitrary(Signal::dc(v)))
            }

            /// Arbitrary s-domain value.
            pub fn laplace(expr: impl Into<Expr>) -> Result<Self> {
                let expr = finite_expr(expr.into(), concat!("s", $prefix), "value")?;
                Ok(Self::from_kind(SourceKind::Laplace(expr)))
            }

            pub fn step(value: impl Param) -> Result<Self> {
                Ok(Self::from_kind(SourceKind::Step(
                    value.to_param(concat!($prefix, "step"), "value")?,
                )))
            }

            pub fn dc(value: impl Param) -> Result<Self> {
                Ok(Self::from_kind(SourceKind::Dc(
                    value.to_param(concat!($prefix, "dc"), "value")?,
                )))
            }

            /// `amplitude * cos(omega t + phase)`; omega in rad/s.
            pub fn ac(amplitude: impl Param, phase: impl Param, omega: impl Param) -> Result<Self> {
                let name = concat!($prefix, "ac");
                Ok(Self::from_kind(SourceKind::Ac {
                    amplitude: amplitude.to_param(name, "amplitude")?,
                    phase: phase.to_param(name, "phase")?,
                    omega: omega.to_param(name, "omega")?,
                }))
            }

            /// Noise source with a freshly allocated noise id.
            pub fn noise(asd: impl Param) -> Result<Self> {
                Self::noise_with_id(asd, NoiseId::fresh())
            }

            pub fn noise_with_id(asd: impl Param, id: NoiseId) -> Result<Self> {
                Ok(Self::from_kind(SourceKind::Noise {
                    asd: asd.to_param(concat!($prefix, "noise"), "asd")?,
                    id,
                }))
            }

            /// Time-domain source built from damped sinusoids.
            pub fn time(terms: Vec<DampedSinusoid>) -> Self {
                Self::from_kind(SourceKind::Time(terms))
            }

            pub fn $method(&self) -> $quantity {
                $quantity::new(self.kind.signal())
            }
        }
    };
}

source!(VoltageSource, Voltage, voltage, "V", "An ideal voltage source.");
source!(CurrentSource, Current, current, "I", "An ideal current source.");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::TimeSignal;
    use approx::assert_relative_eq;

    #[test]
    fn test_dc_source() {
        let v = VoltageSource::dc("10").unwrap();
        assert!(v.voltage().signal().is_dc());
        assert_eq!(v.voltage(), Voltage::dc(10.0));
    }

    #[test]
    fn test_step_source_is_transient() {
        let v = VoltageSource::step(5).unwrap();
        let sig = v.voltage();
        assert!(sig.signal().is_transient());
        assert_eq!(sig.laplace().unwrap(), Expr::monomial(5.0, -1.0));
    }

    #[test]
    fn test_ac_source_phasor() {
        let i = CurrentSource::ac(2, std::f64::consts::FRAC_PI_2, 100).unwrap();
        let (omega, p) = i.current().phasor().unwrap();
        assert_relative_eq!(omega, 100.0);
        assert_relative_eq!(p.im, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.re, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_noise_ids_are_distinct() {
        let a = VoltageSource::noise(1e-9).unwrap();
        let b = VoltageSource::noise(1e-9).unwrap();
        assert_ne!(a, b);
        assert_relative_eq!(a.voltage().asd(1.0), 1e-9);
    }

    #[test]
    fn test_time_source_matches_closed_form() {
        let term = DampedSinusoid::new(3.0, 0.5, 2.0, 0.3);
        let v = VoltageSource::time(vec![term]);
        let t = TimeSignal::from_signal(v.voltage().signal()).unwrap();
        for time in [0.2, 1.0, 2.5] {
            assert_relative_eq!(t.eval(time), term.eval(time), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_keywords() {
        assert_eq!(SourceKind::Dc(1.0).keyword('V'), "Vdc");
        assert_eq!(SourceKind::Step(1.0).keyword('I'), "Istep");
    }
}

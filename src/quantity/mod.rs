//! Driving-point quantities of a one-port.
//!
//! [`Impedance`] and [`Admittance`] wrap an s-domain [`Expr`]; [`Voltage`]
//! and [`Current`] wrap a superposition [`Signal`]. Each wrapper exposes
//! the Laplace, phasor and time domains of its value, and the physically
//! meaningful products between them (`I * Z = V`, `V / Z = I`, ...).

mod signal;
mod transform;

pub use signal::{NoiseId, Signal, FIRST_FRESH_NOISE_ID};
pub use transform::{inverse_laplace, Sinusoid, TimeSignal};

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;

use crate::error::{OnePortError, Result};
use crate::expr::Expr;

macro_rules! immittance {
    ($name:ident, $dual:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(Expr);

        impl $name {
            pub fn new(expr: impl Into<Expr>) -> Self {
                Self(expr.into())
            }

            pub fn zero() -> Self {
                Self(Expr::zero())
            }

            pub fn infinity() -> Self {
                Self(Expr::infinity())
            }

            pub fn expr(&self) -> &Expr {
                &self.0
            }

            pub fn into_expr(self) -> Expr {
                self.0
            }

            pub fn recip(&self) -> $dual {
                $dual(self.0.recip())
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            pub fn is_infinite(&self) -> bool {
                self.0.is_infinite()
            }

            pub fn is_indeterminate(&self) -> bool {
                self.0.is_indeterminate()
            }

            /// True for a real, frequency-independent value.
            pub fn is_real(&self) -> bool {
                self.0.is_real()
            }

            /// Substitute a point for `s`.
            pub fn subs(&self, s: Complex64) -> Self {
                Self(self.0.subs(s))
            }

            /// Laplace-domain value.
            pub fn laplace(&self) -> &Expr {
                &self.0
            }

            /// Phasor-domain value at angular frequency `omega`.
            pub fn phasor(&self, omega: f64) -> Complex64 {
                self.0.at_omega(omega)
            }

            /// Time-domain (impulse response) view.
            pub fn time(&self) -> Result<TimeSignal> {
                TimeSignal::from_laplace(&self.0)
            }
        }

        impl From<Expr> for $name {
            fn from(expr: Expr) -> Self {
                Self(expr)
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl Add for &$name {
            type Output = $name;

            fn add(self, rhs: &$name) -> $name {
                $name(&self.0 + &rhs.0)
            }
        }

        impl Sub for &$name {
            type Output = $name;

            fn sub(self, rhs: &$name) -> $name {
                $name(&self.0 - &rhs.0)
            }
        }

        impl Neg for &$name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(-&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

immittance!(Impedance, Admittance, "Impedance `Z(s)` in ohms.");
immittance!(Admittance, Impedance, "Admittance `Y(s)` in siemens.");

macro_rules! source_quantity {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(Signal);

        impl $name {
            pub fn new(signal: Signal) -> Self {
                Self(signal)
            }

            pub fn zero() -> Self {
                Self(Signal::zero())
            }

            pub fn dc(value: f64) -> Self {
                Self(Signal::dc(value))
            }

            /// `amplitude * cos(omega t + phase)`.
            pub fn ac(amplitude: f64, phase: f64, omega: f64) -> Self {
                Self(Signal::ac(Complex64::from_polar(amplitude, phase), omega))
            }

            /// Transient given by its Laplace transform.
            pub fn from_laplace(expr: Expr) -> Self {
                Self(Signal::laplace(expr))
            }

            pub fn signal(&self) -> &Signal {
                &self.0
            }

            pub fn into_signal(self) -> Signal {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Laplace transform of every component.
            pub fn laplace(&self) -> Result<Expr> {
                self.0.laplace_transform()
            }

            /// `(omega, phasor)` of a single-frequency quantity.
            pub fn phasor(&self) -> Result<(f64, Complex64)> {
                if self.0.is_zero() {
                    return Ok((0.0, Complex64::new(0.0, 0.0)));
                }
                if self.0.is_dc() {
                    let v = self.0.dc_part().constant_value().ok_or_else(|| {
                        OnePortError::transform("DC level is not a finite constant")
                    })?;
                    return Ok((0.0, v));
                }
                match self.0.ac_parts() {
                    [(omega, p)] if self.0.is_ac() => p
                        .constant_value()
                        .map(|v| (*omega, v))
                        .ok_or_else(|| OnePortError::transform("phasor is not a finite constant")),
                    _ => Err(OnePortError::transform(format!(
                        "{} is not a single-frequency quantity",
                        self.0
                    ))),
                }
            }

            /// Time-domain waveform.
            pub fn time(&self) -> Result<TimeSignal> {
                TimeSignal::from_signal(&self.0)
            }

            /// Amplitude spectral density at frequency `f` in Hz.
            pub fn asd(&self, f: f64) -> f64 {
                self.0.asd(f)
            }

            /// Keep only the component at angular frequency `omega`.
            pub fn select(&self, omega: f64) -> Self {
                Self(self.0.select(omega))
            }
        }

        impl From<Signal> for $name {
            fn from(signal: Signal) -> Self {
                Self(signal)
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == Signal::dc(*other)
            }
        }

        impl Add for &$name {
            type Output = $name;

            fn add(self, rhs: &$name) -> $name {
                $name(&self.0 + &rhs.0)
            }
        }

        impl Sub for &$name {
            type Output = $name;

            fn sub(self, rhs: &$name) -> $name {
                $name(&self.0 - &rhs.0)
            }
        }

        impl Neg for &$name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(-&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

source_quantity!(Voltage, "Voltage as a superposition of signal components.");
source_quantity!(Current, "Current as a superposition of signal components.");

macro_rules! transfer_op {
    ($lhs:ident, $trait:ident, $method:ident, $rhs:ident, $out:ident, |$h:ident| $transfer:expr) => {
        impl $trait<&$rhs> for &$lhs {
            type Output = $out;

            fn $method(self, rhs: &$rhs) -> $out {
                let $h = rhs.expr();
                $out(self.0.transfer(&$transfer))
            }
        }

        impl $trait<&$rhs> for $lhs {
            type Output = $out;

            fn $method(self, rhs: &$rhs) -> $out {
                (&self).$method(rhs)
            }
        }
    };
}

transfer_op!(Current, Mul, mul, Impedance, Voltage, |z| z.clone());
transfer_op!(Voltage, Div, div, Impedance, Current, |z| z.recip());
transfer_op!(Voltage, Mul, mul, Admittance, Current, |y| y.clone());
transfer_op!(Current, Div, div, Admittance, Voltage, |y| y.recip());

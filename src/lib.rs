//! # Oneport
//!
//! Symbolic algebra for two-terminal (one-port) electrical networks.
//!
//! This library provides:
//! - Leaf components (R, G, L, C, constant phase elements, sources, crystals,
//!   ferrite beads) built into series/parallel trees with `+` and `|`
//! - Driving-point quantities of any tree: impedance, admittance,
//!   open-circuit voltage and short-circuit current
//! - Series/parallel simplification and Thevenin/Norton reduction
//! - s-domain, noise and expanded models of a network
//! - A small text language for writing networks, matching the `Display`
//!   form of numeric leaves
//!
//! ## Architecture
//!
//! - [`expr`] - Rational functions of `s` used for all s-domain values
//! - [`quantity`] - Impedance, admittance, voltage and current, with
//!   Laplace, phasor and time-domain views
//! - [`components`] - Leaf component models
//! - [`network`] - One-port trees, quantity resolution and reductions
//! - [`shorthand`] - Short constructor functions
//! - [`dsl`] - Parser for the network language
//!
//! ## Usage
//!
//! ```
//! use oneport::shorthand::{r, vdc};
//!
//! let net = (vdc(10)? + r(5)?)?;
//! let norton = net.norton()?;
//! assert_eq!(norton.to_string(), "G(0.2) | Idc(2)");
//! assert_eq!(norton.isc()?, net.isc()?);
//! # Ok::<(), oneport::OnePortError>(())
//! ```
//!
//! ### CLI
//!
//! ```bash
//! RUST_LOG=debug oneport --norton "Vdc(10) + R(5)"
//! ```
//!
//! ## Resolution
//!
//! Every leaf fixes some of {impedance, admittance, Voc, Isc}; the others
//! follow from a fixed fallback chain. Series networks add impedances and
//! parallel networks add admittances. Source quantities of a network are
//! found by superposition, which is exact for series/parallel trees.

pub mod components;
pub mod dsl;
pub mod error;
pub mod expr;
pub mod network;
pub mod quantity;
pub mod shorthand;

// Re-export main types for convenience
pub use components::Component;
pub use error::{OnePortError, Result, Warning};
pub use expr::Expr;
pub use network::{ConnectionKind, LoadedCircuit, Network, OnePort};
pub use quantity::{Admittance, Current, Impedance, Signal, TimeSignal, Voltage};

/// Boltzmann constant in J/K
pub const BOLTZMANN: f64 = 1.380649e-23;

/// Reference temperature for thermal noise in kelvin
pub const DEFAULT_TEMPERATURE: f64 = 290.0;

//! Controlled sources.
//!
//! As one-ports these are zero generators: a controlled voltage source is a
//! short with no open-circuit voltage, a controlled current source an open
//! with no short-circuit current. The control law is stored for display
//! but never evaluated, since a one-port has no access to the controlling
//! branch.

use std::fmt;

use crate::error::Result;
use crate::quantity::{Admittance, Current, Impedance, Voltage};

use super::{Direct, Param};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Current-controlled voltage source
    Ccvs,
    /// Current-controlled current source
    Cccs,
    /// Voltage-controlled voltage source
    Vcvs,
    /// Voltage-controlled current source
    Vccs,
}

impl ControlKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ControlKind::Ccvs => "CCVS",
            ControlKind::Cccs => "CCCS",
            ControlKind::Vcvs => "VCVS",
            ControlKind::Vccs => "VCCS",
        }
    }

    pub fn is_voltage_output(&self) -> bool {
        matches!(self, ControlKind::Ccvs | ControlKind::Vcvs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlledSource {
    pub kind: ControlKind,
    /// Name of the controlling branch for current-controlled sources.
    pub control: Option<String>,
    pub value: f64,
}

impl ControlledSource {
    pub fn ccvs(control: impl Into<String>, value: impl Param) -> Result<Self> {
        Self::build(ControlKind::Ccvs, Some(control.into()), value)
    }

    pub fn cccs(control: impl Into<String>, value: impl Param) -> Result<Self> {
        Self::build(ControlKind::Cccs, Some(control.into()), value)
    }

    pub fn vcvs(value: impl Param) -> Result<Self> {
        Self::build(ControlKind::Vcvs, None, value)
    }

    pub fn vccs(value: impl Param) -> Result<Self> {
        Self::build(ControlKind::Vccs, None, value)
    }

    fn build(kind: ControlKind, control: Option<String>, value: impl Param) -> Result<Self> {
        Ok(Self {
            kind,
            control,
            value: value.to_param(kind.keyword(), "value")?,
        })
    }

    pub(crate) fn direct(&self) -> Direct {
        if self.kind.is_voltage_output() {
            Direct {
                impedance: Some(Impedance::zero()),
                voc: Some(Voltage::zero()),
                ..Direct::default()
            }
        } else {
            Direct {
                admittance: Some(Admittance::zero()),
                isc: Some(Current::zero()),
                ..Direct::default()
            }
        }
    }
}

impl fmt::Display for ControlledSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.control {
            Some(control) => write!(f, "{}({}, {})", self.kind.keyword(), control, self.value),
            None => write!(f, "{}({})", self.kind.keyword(), self.value),
        }
    }
}

//! Abstract Syntax Tree types for the network DSL.

use std::ops::RangeInclusive;

/// A parsed network expression.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkAst {
    Element(ElementDef),
    Series(Vec<NetworkAst>),
    Parallel(Vec<NetworkAst>),
}

impl NetworkAst {
    /// Number of elements in the expression.
    pub fn element_count(&self) -> usize {
        match self {
            NetworkAst::Element(_) => 1,
            NetworkAst::Series(members) | NetworkAst::Parallel(members) => {
                members.iter().map(NetworkAst::element_count).sum()
            }
        }
    }
}

/// A component call such as `R(10k)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub element_type: ElementType,
    pub args: Vec<f64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Component names known to the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Resistor,
    Conductance,
    Inductor,
    Capacitor,
    ConstantPhase,
    Impedance,
    Admittance,
    Voltage,
    VoltageDc,
    VoltageAc,
    VoltageStep,
    VoltageNoise,
    Current,
    CurrentDc,
    CurrentAc,
    CurrentStep,
    CurrentNoise,
    Crystal,
    FerriteBead,
    Wire,
    Open,
    Port,
}

impl ElementType {
    /// Parse a component name. Names are case-sensitive, as in `Display`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "R" => Self::Resistor,
            "G" => Self::Conductance,
            "L" => Self::Inductor,
            "C" => Self::Capacitor,
            "CPE" => Self::ConstantPhase,
            "Z" => Self::Impedance,
            "Y" => Self::Admittance,
            "V" => Self::Voltage,
            "Vdc" => Self::VoltageDc,
            "Vac" => Self::VoltageAc,
            "Vstep" => Self::VoltageStep,
            "Vnoise" => Self::VoltageNoise,
            "I" => Self::Current,
            "Idc" => Self::CurrentDc,
            "Iac" => Self::CurrentAc,
            "Istep" => Self::CurrentStep,
            "Inoise" => Self::CurrentNoise,
            "Xtal" => Self::Crystal,
            "FerriteBead" => Self::FerriteBead,
            "W" => Self::Wire,
            "O" => Self::Open,
            "P" => Self::Port,
            _ => return None,
        })
    }

    /// Accepted number of arguments.
    ///
    /// - `L(L[, i0])`, `C(C[, v0])`, `CPE(K[, alpha])`
    /// - `Vac(amplitude[, phase[, omega]])`
    /// - `Vnoise(asd[, id])`
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Self::Inductor | Self::Capacitor | Self::ConstantPhase => 1..=2,
            Self::VoltageAc | Self::CurrentAc => 1..=3,
            Self::VoltageNoise | Self::CurrentNoise => 1..=2,
            Self::Crystal | Self::FerriteBead => 4..=4,
            Self::Wire | Self::Open | Self::Port => 0..=0,
            _ => 1..=1,
        }
    }
}

//! Leaf component models.
//!
//! This module provides models for all supported one-port leaves:
//! - Passive: Resistor, Conductance, Inductor, Capacitor, CPE, general Z/Y
//! - Sources: voltage and current sources of every signal kind
//! - Compound: Crystal, FerriteBead
//! - Controlled sources and the Wire/Open/Port dummies
//!
//! Each component reports the subset of {impedance, admittance, Voc, Isc}
//! its physical definition fixes; the rest is derived by the network
//! resolver.

mod compound;
mod controlled;
mod passive;
mod sources;

pub use compound::{Crystal, FerriteBead};
pub use controlled::{ControlKind, ControlledSource};
pub use passive::{
    Capacitor, Conductance, ConstantPhaseElement, GeneralAdmittance, GeneralImpedance, Inductor,
    Resistor,
};
pub use sources::{CurrentSource, DampedSinusoid, SourceKind, VoltageSource};

use std::fmt;

use crate::dsl::parse_value;
use crate::error::{OnePortError, Result};
use crate::expr::Expr;
use crate::quantity::{Admittance, Current, Impedance, Voltage};

/// A numeric component parameter: a float, an integer, or a string with an
/// optional SI suffix such as `"4.7u"` or `"10k"`.
pub trait Param {
    fn to_param(&self, component: &str, param: &str) -> Result<f64>;
}

fn finite(value: f64, component: &str, param: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OnePortError::invalid_parameter(
            component,
            param,
            format!("{} is not finite", value),
        ))
    }
}

/// Reject expressions with infinite or NaN values.
fn finite_expr(expr: Expr, component: &str, param: &str) -> Result<Expr> {
    if expr.is_well_defined() {
        Ok(expr)
    } else {
        Err(OnePortError::invalid_parameter(
            component,
            param,
            format!("{} is not finite", expr),
        ))
    }
}

impl Param for f64 {
    fn to_param(&self, component: &str, param: &str) -> Result<f64> {
        finite(*self, component, param)
    }
}

impl Param for f32 {
    fn to_param(&self, component: &str, param: &str) -> Result<f64> {
        finite(f64::from(*self), component, param)
    }
}

macro_rules! integer_param {
    ($($ty:ty),*) => {
        $(
            impl Param for $ty {
                fn to_param(&self, _component: &str, _param: &str) -> Result<f64> {
                    Ok(*self as f64)
                }
            }
        )*
    };
}

integer_param!(i32, i64, u32, u64, usize);

impl Param for str {
    fn to_param(&self, component: &str, param: &str) -> Result<f64> {
        let value = parse_value(self).ok_or_else(|| {
            OnePortError::invalid_parameter(component, param, format!("cannot parse '{}'", self))
        })?;
        finite(value, component, param)
    }
}

impl Param for &str {
    fn to_param(&self, component: &str, param: &str) -> Result<f64> {
        (**self).to_param(component, param)
    }
}

impl Param for String {
    fn to_param(&self, component: &str, param: &str) -> Result<f64> {
        self.as_str().to_param(component, param)
    }
}

/// Quantities a leaf defines directly.
#[derive(Debug, Clone, Default)]
pub struct Direct {
    pub impedance: Option<Impedance>,
    pub admittance: Option<Admittance>,
    pub voc: Option<Voltage>,
    pub isc: Option<Current>,
}

impl Direct {
    fn impedance(z: Impedance) -> Self {
        Self {
            impedance: Some(z),
            ..Self::default()
        }
    }

    fn admittance(y: Admittance) -> Self {
        Self {
            admittance: Some(y),
            ..Self::default()
        }
    }
}

/// A one-port leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Resistor(Resistor),
    Conductance(Conductance),
    Inductor(Inductor),
    Capacitor(Capacitor),
    ConstantPhase(ConstantPhaseElement),
    Impedance(GeneralImpedance),
    Admittance(GeneralAdmittance),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Crystal(Crystal),
    FerriteBead(FerriteBead),
    Controlled(ControlledSource),
    /// Short circuit.
    Wire,
    /// Open circuit.
    Open,
    /// Open circuit marking a port.
    Port,
}

impl Component {
    /// The quantities this component fixes directly.
    pub fn direct(&self) -> Result<Direct> {
        Ok(match self {
            Component::Resistor(r) => Direct::impedance(r.impedance()),
            Component::Conductance(g) => Direct::admittance(g.admittance()),
            Component::Inductor(l) => Direct {
                impedance: Some(l.impedance()),
                voc: Some(l.equivalent_source()),
                ..Direct::default()
            },
            Component::Capacitor(c) => Direct {
                impedance: Some(c.impedance()),
                voc: Some(c.equivalent_source()),
                ..Direct::default()
            },
            Component::ConstantPhase(cpe) => Direct::impedance(cpe.impedance()),
            Component::Impedance(z) => Direct::impedance(Impedance::new(z.0.clone())),
            Component::Admittance(y) => Direct::admittance(Admittance::new(y.0.clone())),
            Component::VoltageSource(v) => Direct {
                voc: Some(v.voltage()),
                ..Direct::default()
            },
            Component::CurrentSource(i) => Direct {
                isc: Some(i.current()),
                ..Direct::default()
            },
            Component::Crystal(x) => Direct::impedance(x.expand()?.impedance()?),
            Component::FerriteBead(fb) => Direct::impedance(fb.expand()?.impedance()?),
            Component::Controlled(cs) => cs.direct(),
            Component::Wire => Direct::impedance(Impedance::zero()),
            Component::Open | Component::Port => Direct::admittance(Admittance::zero()),
        })
    }

    /// Short constructor name, as used by `Display` and the DSL.
    pub fn keyword(&self) -> &'static str {
        match self {
            Component::Resistor(_) => "R",
            Component::Conductance(_) => "G",
            Component::Inductor(_) => "L",
            Component::Capacitor(_) => "C",
            Component::ConstantPhase(_) => "CPE",
            Component::Impedance(_) => "Z",
            Component::Admittance(_) => "Y",
            Component::VoltageSource(v) => v.kind.keyword('V'),
            Component::CurrentSource(i) => i.kind.keyword('I'),
            Component::Crystal(_) => "Xtal",
            Component::FerriteBead(_) => "FerriteBead",
            Component::Controlled(cs) => cs.kind.keyword(),
            Component::Wire => "W",
            Component::Open => "O",
            Component::Port => "P",
        }
    }

    /// Independent voltage source.
    pub fn is_voltage_source(&self) -> bool {
        matches!(self, Component::VoltageSource(_))
    }

    /// Independent current source.
    pub fn is_current_source(&self) -> bool {
        matches!(self, Component::CurrentSource(_))
    }

    /// True for sources, whether independent or controlled.
    pub fn is_source(&self) -> bool {
        matches!(
            self,
            Component::VoltageSource(_) | Component::CurrentSource(_) | Component::Controlled(_)
        )
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Resistor(r) => write!(f, "R({})", r.resistance),
            Component::Conductance(g) => write!(f, "G({})", g.conductance),
            Component::Inductor(l) => match l.initial_current {
                Some(i0) => write!(f, "L({}, {})", l.inductance, i0),
                None => write!(f, "L({})", l.inductance),
            },
            Component::Capacitor(c) => match c.initial_voltage {
                Some(v0) => write!(f, "C({}, {})", c.capacitance, v0),
                None => write!(f, "C({})", c.capacitance),
            },
            Component::ConstantPhase(cpe) => write!(f, "CPE({}, {})", cpe.k, cpe.alpha),
            Component::Impedance(z) => write!(f, "Z({})", z.0),
            Component::Admittance(y) => write!(f, "Y({})", y.0),
            Component::VoltageSource(v) => v.kind.fmt_with(f, 'V'),
            Component::CurrentSource(i) => i.kind.fmt_with(f, 'I'),
            Component::Crystal(x) => write!(f, "Xtal({}, {}, {}, {})", x.c0, x.r1, x.l1, x.c1),
            Component::FerriteBead(fb) => {
                write!(f, "FerriteBead({}, {}, {}, {})", fb.rs, fb.rp, fb.cp, fb.lp)
            }
            Component::Controlled(cs) => write!(f, "{}", cs),
            Component::Wire | Component::Open | Component::Port => {
                write!(f, "{}()", self.keyword())
            }
        }
    }
}

macro_rules! component_from {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$variant(value)
                }
            }
        )*
    };
}

component_from!(
    Resistor(Resistor),
    Conductance(Conductance),
    Inductor(Inductor),
    Capacitor(Capacitor),
    ConstantPhase(ConstantPhaseElement),
    Impedance(GeneralImpedance),
    Admittance(GeneralAdmittance),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
    Crystal(Crystal),
    FerriteBead(FerriteBead),
    Controlled(ControlledSource)
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_param_parsing() {
        assert_relative_eq!(10i32.to_param("R", "R").unwrap(), 10.0);
        assert_relative_eq!("4.7u".to_param("C", "C").unwrap(), 4.7e-6);
        assert_relative_eq!("10k".to_string().to_param("R", "R").unwrap(), 1e4);
        assert!("ten".to_param("R", "R").is_err());
        assert!(f64::NAN.to_param("R", "R").unwrap_err().is_construction_error());
        assert!(f64::INFINITY.to_param("L", "L").is_err());
    }

    #[test]
    fn test_direct_quantities() {
        let r = Component::from(Resistor::new(10).unwrap()).direct().unwrap();
        assert_eq!(r.impedance.unwrap(), 10.0);
        assert!(r.voc.is_none());

        let v = Component::from(VoltageSource::dc(5).unwrap()).direct().unwrap();
        assert!(v.impedance.is_none());
        assert_eq!(v.voc.unwrap(), Voltage::dc(5.0));

        let l = Component::from(Inductor::with_initial_current(2, 3).unwrap())
            .direct()
            .unwrap();
        assert_eq!(*l.impedance.unwrap().expr(), Expr::monomial(2.0, 1.0));
        assert_eq!(l.voc.unwrap().laplace().unwrap(), Expr::constant(-6.0));

        let open = Component::Open.direct().unwrap();
        assert!(open.admittance.unwrap().is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Component::from(Resistor::new(10).unwrap()).to_string(), "R(10)");
        assert_eq!(
            Component::from(Capacitor::with_initial_voltage(1e-6, 5).unwrap()).to_string(),
            "C(0.000001, 5)"
        );
        assert_eq!(Component::Wire.to_string(), "W()");
        assert_eq!(Component::from(VoltageSource::dc(10).unwrap()).to_string(), "Vdc(10)");
    }
}

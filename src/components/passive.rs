//! Passive components: Resistor, Conductance, Inductor, Capacitor, CPE and
//! general impedances/admittances.

use crate::error::Result;
use crate::expr::Expr;
use crate::quantity::{Admittance, Impedance, Voltage};

use super::{finite_expr, Param};

/// A resistor, `Z = R`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resistor {
    pub resistance: f64,
}

impl Resistor {
    pub fn new(resistance: impl Param) -> Result<Self> {
        Ok(Self {
            resistance: resistance.to_param("R", "R")?,
        })
    }

    pub fn impedance(&self) -> Impedance {
        Impedance::new(self.resistance)
    }
}

/// A conductance, `Y = G`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conductance {
    pub conductance: f64,
}

impl Conductance {
    pub fn new(conductance: impl Param) -> Result<Self> {
        Ok(Self {
            conductance: conductance.to_param("G", "G")?,
        })
    }

    pub fn admittance(&self) -> Admittance {
        Admittance::new(self.conductance)
    }
}

/// An inductor with an optional initial current.
///
/// The initial current is modelled as a series voltage source `-L i0` in
/// the s-domain (an impulse in time).
#[derive(Debug, Clone, PartialEq)]
pub struct Inductor {
    pub inductance: f64,
    pub initial_current: Option<f64>,
}

impl Inductor {
    pub fn new(inductance: impl Param) -> Result<Self> {
        Ok(Self {
            inductance: inductance.to_param("L", "L")?,
            initial_current: None,
        })
    }

    pub fn with_initial_current(inductance: impl Param, i0: impl Param) -> Result<Self> {
        Ok(Self {
            inductance: inductance.to_param("L", "L")?,
            initial_current: Some(i0.to_param("L", "i0")?),
        })
    }

    pub fn has_initial_condition(&self) -> bool {
        self.initial_current.is_some()
    }

    pub fn impedance(&self) -> Impedance {
        Impedance::new(Expr::monomial(self.inductance, 1.0))
    }

    pub fn equivalent_source(&self) -> Voltage {
        let i0 = self.initial_current.unwrap_or(0.0);
        Voltage::from_laplace(Expr::constant(-self.inductance * i0))
    }
}

/// A capacitor with an optional initial voltage.
///
/// The initial voltage is modelled as a series voltage source `v0/s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Capacitor {
    pub capacitance: f64,
    pub initial_voltage: Option<f64>,
}

impl Capacitor {
    pub fn new(capacitance: impl Param) -> Result<Self> {
        Ok(Self {
            capacitance: capacitance.to_param("C", "C")?,
            initial_voltage: None,
        })
    }

    pub fn with_initial_voltage(capacitance: impl Param, v0: impl Param) -> Result<Self> {
        Ok(Self {
            capacitance: capacitance.to_param("C", "C")?,
            initial_voltage: Some(v0.to_param("C", "v0")?),
        })
    }

    pub fn has_initial_condition(&self) -> bool {
        self.initial_voltage.is_some()
    }

    pub fn impedance(&self) -> Impedance {
        Impedance::new(Expr::monomial(self.capacitance, 1.0).recip())
    }

    pub fn equivalent_source(&self) -> Voltage {
        let v0 = self.initial_voltage.unwrap_or(0.0);
        Voltage::from_laplace(Expr::monomial(v0, -1.0))
    }
}

/// Constant phase element, `Z = 1/(K s^alpha)`.
///
/// `alpha = 1` is a capacitor, `alpha = 0` a resistor and `alpha = 0.5`
/// a Warburg element.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPhaseElement {
    pub k: f64,
    pub alpha: f64,
}

impl ConstantPhaseElement {
    pub fn new(k: impl Param, alpha: impl Param) -> Result<Self> {
        Ok(Self {
            k: k.to_param("CPE", "K")?,
            alpha: alpha.to_param("CPE", "alpha")?,
        })
    }

    /// Warburg element, `alpha = 0.5`.
    pub fn warburg(k: impl Param) -> Result<Self> {
        Self::new(k, 0.5)
    }

    pub fn impedance(&self) -> Impedance {
        Impedance::new(Expr::monomial(self.k, self.alpha).recip())
    }
}

/// Arbitrary impedance expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralImpedance(pub Expr);

impl GeneralImpedance {
    pub fn new(z: impl Into<Expr>) -> Result<Self> {
        Ok(Self(finite_expr(z.into(), "Z", "Z")?))
    }
}

/// Arbitrary admittance expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralAdmittance(pub Expr);

impl GeneralAdmittance {
    pub fn new(y: impl Into<Expr>) -> Result<Self> {
        Ok(Self(finite_expr(y.into(), "Y", "Y")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_capacitor_impedance() {
        let c = Capacitor::new("1u").unwrap();
        let z = c.impedance();
        // |Z(j1000)| = 1/(1000 * 1e-6) = 1000
        assert_relative_eq!(z.phasor(1000.0).norm(), 1000.0, epsilon = 1e-9);
        assert!(c.equivalent_source().is_zero());
    }

    #[test]
    fn test_capacitor_initial_voltage() {
        let c = Capacitor::with_initial_voltage(2.0, 5.0).unwrap();
        let v = c.equivalent_source().laplace().unwrap();
        assert_eq!(v, Expr::monomial(5.0, -1.0));
    }

    #[test]
    fn test_warburg_phase() {
        let cpe = ConstantPhaseElement::warburg(1.0).unwrap();
        let z = cpe.impedance().phasor(4.0);
        // 1/sqrt(j4) has a phase of -45 degrees.
        assert_relative_eq!(z.arg(), -std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(z.norm(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cpe_with_unit_alpha_is_capacitor() {
        let cpe = ConstantPhaseElement::new(1e-3, 1).unwrap();
        let cap = Capacitor::new(1e-3).unwrap();
        assert_eq!(cpe.impedance(), cap.impedance());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Resistor::new(f64::NAN).is_err());
        assert!(Inductor::with_initial_current(1.0, "abc").is_err());
        let g = Conductance::new("2m").unwrap();
        assert_eq!(g.admittance().recip(), 500.0);
        let z = Resistor::new(0).unwrap().impedance();
        assert!(z.subs(Complex64::new(0.0, 0.0)).is_zero());
    }
}

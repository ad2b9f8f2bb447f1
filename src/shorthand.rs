//! Short constructors returning [`OnePort`] leaves, named after the usual
//! circuit symbols.
//!
//! ```
//! use oneport::shorthand::{c, r, vdc};
//!
//! let rc = (vdc(5)? + r("1k")? + c("10u")?)?;
//! assert_eq!(rc.to_string(), "Vdc(5) + R(1000) + C(0.00001)");
//! # Ok::<(), oneport::OnePortError>(())
//! ```

use crate::components::{
    Capacitor, Component, Conductance, ConstantPhaseElement, ControlledSource, Crystal,
    CurrentSource, DampedSinusoid, FerriteBead, GeneralAdmittance, GeneralImpedance, Inductor,
    Param, Resistor, VoltageSource,
};
use crate::error::Result;
use crate::expr::Expr;
use crate::network::OnePort;

pub fn r(resistance: impl Param) -> Result<OnePort> {
    Ok(Resistor::new(resistance)?.into())
}

pub fn g(conductance: impl Param) -> Result<OnePort> {
    Ok(Conductance::new(conductance)?.into())
}

pub fn l(inductance: impl Param) -> Result<OnePort> {
    Ok(Inductor::new(inductance)?.into())
}

/// Inductor with initial current `i0`.
pub fn l_ic(inductance: impl Param, i0: impl Param) -> Result<OnePort> {
    Ok(Inductor::with_initial_current(inductance, i0)?.into())
}

pub fn c(capacitance: impl Param) -> Result<OnePort> {
    Ok(Capacitor::new(capacitance)?.into())
}

/// Capacitor with initial voltage `v0`.
pub fn c_ic(capacitance: impl Param, v0: impl Param) -> Result<OnePort> {
    Ok(Capacitor::with_initial_voltage(capacitance, v0)?.into())
}

pub fn cpe(k: impl Param, alpha: impl Param) -> Result<OnePort> {
    Ok(ConstantPhaseElement::new(k, alpha)?.into())
}

/// Generic impedance.
pub fn z(impedance: impl Into<Expr>) -> Result<OnePort> {
    Ok(GeneralImpedance::new(impedance)?.into())
}

/// Generic admittance.
pub fn y(admittance: impl Into<Expr>) -> Result<OnePort> {
    Ok(GeneralAdmittance::new(admittance)?.into())
}

/// Voltage source with a constant (DC) value.
pub fn v(value: impl Param) -> Result<OnePort> {
    Ok(VoltageSource::constant(value)?.into())
}

/// Voltage source given in the s-domain.
pub fn sv(value: impl Into<Expr>) -> Result<OnePort> {
    Ok(VoltageSource::laplace(value)?.into())
}

pub fn vdc(value: impl Param) -> Result<OnePort> {
    Ok(VoltageSource::dc(value)?.into())
}

pub fn vac(amplitude: impl Param, phase: impl Param, omega: impl Param) -> Result<OnePort> {
    Ok(VoltageSource::ac(amplitude, phase, omega)?.into())
}

pub fn vstep(value: impl Param) -> Result<OnePort> {
    Ok(VoltageSource::step(value)?.into())
}

pub fn vnoise(asd: impl Param) -> Result<OnePort> {
    Ok(VoltageSource::noise(asd)?.into())
}

/// Voltage source defined by damped sinusoids in the time domain.
pub fn vt(terms: Vec<DampedSinusoid>) -> OnePort {
    VoltageSource::time(terms).into()
}

/// Current source with a constant (DC) value.
pub fn i(value: impl Param) -> Result<OnePort> {
    Ok(CurrentSource::constant(value)?.into())
}

/// Current source given in the s-domain.
pub fn si(value: impl Into<Expr>) -> Result<OnePort> {
    Ok(CurrentSource::laplace(value)?.into())
}

pub fn idc(value: impl Param) -> Result<OnePort> {
    Ok(CurrentSource::dc(value)?.into())
}

pub fn iac(amplitude: impl Param, phase: impl Param, omega: impl Param) -> Result<OnePort> {
    Ok(CurrentSource::ac(amplitude, phase, omega)?.into())
}

pub fn istep(value: impl Param) -> Result<OnePort> {
    Ok(CurrentSource::step(value)?.into())
}

pub fn inoise(asd: impl Param) -> Result<OnePort> {
    Ok(CurrentSource::noise(asd)?.into())
}

/// Current source defined by damped sinusoids in the time domain.
pub fn it(terms: Vec<DampedSinusoid>) -> OnePort {
    CurrentSource::time(terms).into()
}

pub fn xtal(c0: impl Param, r1: impl Param, l1: impl Param, c1: impl Param) -> Result<OnePort> {
    Ok(Crystal::new(c0, r1, l1, c1)?.into())
}

pub fn ferrite_bead(rs: impl Param, rp: impl Param, cp: impl Param, lp: impl Param) -> Result<OnePort> {
    Ok(FerriteBead::new(rs, rp, cp, lp)?.into())
}

pub fn ccvs(control: impl Into<String>, value: impl Param) -> Result<OnePort> {
    Ok(ControlledSource::ccvs(control, value)?.into())
}

pub fn cccs(control: impl Into<String>, value: impl Param) -> Result<OnePort> {
    Ok(ControlledSource::cccs(control, value)?.into())
}

pub fn vcvs(value: impl Param) -> Result<OnePort> {
    Ok(ControlledSource::vcvs(value)?.into())
}

pub fn vccs(value: impl Param) -> Result<OnePort> {
    Ok(ControlledSource::vccs(value)?.into())
}

/// Short circuit.
pub fn w() -> OnePort {
    Component::Wire.into()
}

/// Open circuit.
pub fn o() -> OnePort {
    Component::Open.into()
}

/// Open circuit marking a port.
pub fn p() -> OnePort {
    Component::Port.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OnePortError;

    #[test]
    fn test_si_suffixes() -> Result<()> {
        assert_eq!(r("4k7")?.to_string(), "R(4700)");
        assert_eq!(c("100n")?, c(100e-9)?);
        Ok(())
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(r("abc"), Err(OnePortError::InvalidParameter { .. })));
        assert!(matches!(l(f64::NAN), Err(OnePortError::InvalidParameter { .. })));
        assert!(vac(1, 0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_general_immittances_must_be_finite() -> Result<()> {
        assert!(matches!(z(f64::NAN), Err(OnePortError::InvalidParameter { .. })));
        assert!(y(f64::INFINITY).unwrap_err().is_construction_error());
        assert!(sv(Expr::monomial(f64::NAN, -1.0)).is_err());
        assert!(si(Expr::one() / Expr::zero()).is_err());

        let net = (z(Expr::monomial(2.0, 1.0))? + r(5)?)?;
        assert_eq!(net.to_string(), "Z(2*s) + R(5)");
        assert_eq!(sv(Expr::monomial(10.0, -1.0))?.voc()?.laplace()?, Expr::monomial(10.0, -1.0));
        Ok(())
    }

    #[test]
    fn test_controlled_sources_are_idle() -> Result<()> {
        let net = (cccs("Vx", 3)? | r(5)?)?;
        assert!(net.voc()?.is_zero());
        assert_eq!(net.impedance()?, 5.0);
        assert!(vcvs(2)?.impedance()?.is_zero());
        Ok(())
    }

    #[test]
    fn test_wire_open_port() -> Result<()> {
        assert!(w().impedance()?.is_zero());
        assert!(o().admittance()?.is_zero());
        assert!(p().impedance()?.is_infinite());
        Ok(())
    }
}

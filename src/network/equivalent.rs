//! Thevenin and Norton equivalents, and the conversion of resolved
//! quantities back into leaf components.

use log::debug;
use num_complex::Complex64;

use crate::components::{
    Capacitor, Component, Conductance, CurrentSource, GeneralAdmittance, GeneralImpedance,
    Inductor, Resistor, SourceKind, VoltageSource,
};
use crate::error::{Result, Warning};
use crate::expr::Expr;
use crate::quantity::{Admittance, Current, Impedance, Signal, Voltage};

use super::OnePort;

const POWER_TOLERANCE: f64 = 1e-12;

/// `(k, power)` for a real `k * s^power`.
fn real_monomial(expr: &Expr) -> Option<(f64, f64)> {
    let (k, power) = expr.as_monomial()?;
    (k.im == 0.0 && k.re != 0.0).then_some((k.re, power))
}

/// Round to 12 significant digits, dropping the last-bit residue that
/// reciprocals and superposition leave in otherwise round values.
fn tidy(value: f64) -> f64 {
    format!("{:.11e}", value).parse().unwrap_or(value)
}

fn is_power(power: f64, expected: f64) -> bool {
    (power - expected).abs() < POWER_TOLERANCE
}

impl Impedance {
    /// The simplest leaf with this impedance.
    pub fn to_component(&self) -> Component {
        let z = self.expr();
        if z.is_infinite() {
            return Component::Open;
        }
        if let Some(resistance) = z.real_value() {
            return Component::Resistor(Resistor {
                resistance: tidy(resistance),
            });
        }
        match real_monomial(z) {
            Some((k, p)) if is_power(p, 1.0) => Component::Inductor(Inductor {
                inductance: tidy(k),
                initial_current: None,
            }),
            Some((k, p)) if is_power(p, -1.0) => Component::Capacitor(Capacitor {
                capacitance: tidy(1.0 / k),
                initial_voltage: None,
            }),
            _ => Component::Impedance(GeneralImpedance(z.clone())),
        }
    }
}

impl Admittance {
    /// The simplest leaf with this admittance.
    pub fn to_component(&self) -> Component {
        let y = self.expr();
        if y.is_infinite() {
            return Component::Wire;
        }
        if let Some(conductance) = y.real_value() {
            return Component::Conductance(Conductance {
                conductance: tidy(conductance),
            });
        }
        match real_monomial(y) {
            Some((k, p)) if is_power(p, 1.0) => Component::Capacitor(Capacitor {
                capacitance: tidy(k),
                initial_voltage: None,
            }),
            Some((k, p)) if is_power(p, -1.0) => Component::Inductor(Inductor {
                inductance: tidy(1.0 / k),
                initial_current: None,
            }),
            _ => Component::Admittance(GeneralAdmittance(y.clone())),
        }
    }
}

/// The most specific source kind producing `signal`.
fn source_kind(signal: &Signal) -> SourceKind {
    if signal.is_zero() {
        return SourceKind::Dc(0.0);
    }
    if signal.is_dc() {
        if let Some(v) = signal.dc_part().real_value() {
            return SourceKind::Dc(tidy(v));
        }
    }
    if let (true, [(omega, phasor)]) = (signal.is_ac(), signal.ac_parts()) {
        if let Some(p) = phasor.constant_value() {
            return SourceKind::Ac {
                amplitude: tidy(p.norm()),
                phase: tidy(p.arg()),
                omega: *omega,
            };
        }
    }
    if signal.is_transient() {
        let e = signal.transient_part();
        return match real_monomial(e) {
            Some((k, p)) if is_power(p, -1.0) => SourceKind::Step(tidy(k)),
            _ => SourceKind::Laplace(e.clone()),
        };
    }
    if let (true, [(id, shape)]) = (signal.is_noise(), signal.noise_parts()) {
        if let Some(asd) = shape.real_value() {
            return SourceKind::Noise {
                asd: tidy(asd.abs()),
                id: *id,
            };
        }
    }
    SourceKind::Signal(signal.clone())
}

impl Voltage {
    /// A voltage source producing this voltage.
    pub fn to_component(&self) -> Component {
        Component::VoltageSource(VoltageSource::from_kind(source_kind(self.signal())))
    }
}

impl Current {
    /// A current source producing this current.
    pub fn to_component(&self) -> Component {
        Component::CurrentSource(CurrentSource::from_kind(source_kind(self.signal())))
    }
}

impl OnePort {
    /// Thevenin equivalent: a voltage source in series with an impedance.
    ///
    /// A single-frequency source evaluates the impedance at that frequency
    /// and a DC source at `s = 0`. A superposition seen through a reactive
    /// impedance stays in the Laplace domain. The result collapses to the
    /// impedance alone when there is no source, or to the source alone
    /// when the impedance is zero.
    pub fn thevenin(&self) -> Result<OnePort> {
        let net = self.simplify()?;
        let voc = net.voc()?;
        let z = net.impedance()?;

        let (voc, z) = if voc.signal().is_superposition() && !z.is_real() {
            Warning::ReactiveSuperposition {
                quantity: "Voc".to_string(),
            }
            .emit();
            (Voltage::from_laplace(voc.laplace()?), z)
        } else if let (true, [(omega, _)]) = (voc.signal().is_ac(), voc.signal().ac_parts()) {
            let omega = *omega;
            debug!("thevenin of {} at omega = {}", net, omega);
            (voc.select(omega), z.subs(Complex64::new(0.0, omega)))
        } else if voc.signal().is_dc() {
            debug!("thevenin of {} at DC", net);
            (voc, z.subs(Complex64::new(0.0, 0.0)))
        } else {
            (voc, z)
        };

        let impedance = OnePort::Leaf(z.to_component());
        if voc.is_zero() {
            return Ok(impedance);
        }
        let source = OnePort::Leaf(voc.to_component());
        if z.is_zero() {
            return Ok(source);
        }
        OnePort::series(vec![impedance, source])
    }

    /// Norton equivalent: a current source in parallel with an admittance.
    /// The dual of [`OnePort::thevenin`].
    pub fn norton(&self) -> Result<OnePort> {
        let net = self.simplify()?;
        let isc = net.isc()?;
        let y = net.admittance()?;

        let (isc, y) = if isc.signal().is_superposition() && !y.is_real() {
            Warning::ReactiveSuperposition {
                quantity: "Isc".to_string(),
            }
            .emit();
            (Current::from_laplace(isc.laplace()?), y)
        } else if let (true, [(omega, _)]) = (isc.signal().is_ac(), isc.signal().ac_parts()) {
            let omega = *omega;
            debug!("norton of {} at omega = {}", net, omega);
            (isc.select(omega), y.subs(Complex64::new(0.0, omega)))
        } else if isc.signal().is_dc() {
            debug!("norton of {} at DC", net);
            (isc, y.subs(Complex64::new(0.0, 0.0)))
        } else {
            (isc, y)
        };

        let admittance = OnePort::Leaf(y.to_component());
        if isc.is_zero() {
            return Ok(admittance);
        }
        let source = OnePort::Leaf(isc.to_component());
        if y.is_zero() {
            return Ok(source);
        }
        OnePort::parallel(vec![admittance, source])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorthand::{c, idc, l, o, r, vac, vdc, vstep, w};
    use approx::assert_relative_eq;

    #[test]
    fn test_norton_of_thevenin_source() -> Result<()> {
        let net = (vdc(10)? + r(5)?)?;
        let norton = net.norton()?;
        assert_eq!(norton.to_string(), "G(0.2) | Idc(2)");
        assert_eq!(norton.isc()?, net.isc()?);
        assert_eq!(norton.voc()?, net.voc()?);
        Ok(())
    }

    #[test]
    fn test_thevenin_of_norton_source() -> Result<()> {
        let net = (idc(2)? | r(5)?)?;
        let thevenin = net.thevenin()?;
        assert_eq!(thevenin.to_string(), "R(5) + Vdc(10)");
        assert_eq!(thevenin.voc()?, Voltage::dc(10.0));
        Ok(())
    }

    #[test]
    fn test_reduced_leaf_values_are_tidy() -> Result<()> {
        let thevenin = (idc(2)? | r(5)?)?.thevenin()?;
        let members = thevenin.as_network().unwrap().members();
        match (members[0].as_leaf(), members[1].as_leaf()) {
            (Some(Component::Resistor(x)), Some(Component::VoltageSource(v))) => {
                assert_eq!(x.resistance, 5.0);
                assert_eq!(v.kind, SourceKind::Dc(10.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(tidy(4.999999999999999), 5.0);
        assert_eq!(tidy(0.1 + 0.2), 0.3);
        assert_relative_eq!(tidy(1.0 / 3.0), 1.0 / 3.0, max_relative = 1e-11);
        Ok(())
    }

    #[test]
    fn test_doubled_ideal_elements() -> Result<()> {
        assert!((w() | w())?.impedance()?.is_zero());
        assert!((o() + o())?.impedance()?.is_infinite());
        assert_eq!((o() + o())?.thevenin()?, o());
        assert_eq!((w() | w())?.norton()?, w());
        Ok(())
    }

    #[test]
    fn test_passive_network_reduces_to_impedance() -> Result<()> {
        let net = ((r(1)? + r(2)?)? | r(6)?)?;
        assert_eq!(net.thevenin()?, r(2)?);
        Ok(())
    }

    #[test]
    fn test_ideal_sources_reduce_to_themselves() -> Result<()> {
        assert_eq!(vdc(5)?.thevenin()?, vdc(5)?);
        assert_eq!(idc(3)?.norton()?, idc(3)?);
        Ok(())
    }

    #[test]
    fn test_ac_thevenin_evaluates_impedance_at_omega() -> Result<()> {
        let net = (vac(10, 0, 100)? + r(5)? + l(0.05)?)?;
        let thevenin = net.thevenin()?;
        let members = thevenin.as_network().unwrap().members();
        let z = members[0].impedance()?;
        assert!(!z.is_real());
        let value = z.laplace().constant_value().unwrap();
        assert_relative_eq!(value.re, 5.0, epsilon = 1e-12);
        assert_relative_eq!(value.im, 5.0, epsilon = 1e-12);
        assert_eq!(members[1].to_string(), "Vac(10, 0, 100)");
        Ok(())
    }

    #[test]
    fn test_reactive_superposition_stays_in_laplace_domain() -> Result<()> {
        let net = (vdc(1)? + vac(1, 0, 10)? + l(1)?)?;
        let thevenin = net.thevenin()?;
        let members = thevenin.as_network().unwrap().members();
        assert_eq!(members[0], OnePort::from(Inductor::new(1)?));
        assert!(members[1].to_string().starts_with("sV("));
        assert_eq!(thevenin.voc()?.laplace()?, net.voc()?.laplace()?);
        Ok(())
    }

    #[test]
    fn test_step_source_survives_reduction() -> Result<()> {
        let net = (vstep(5)? + r(2)?)?;
        assert_eq!(net.thevenin()?.to_string(), "R(2) + Vstep(5)");
        Ok(())
    }

    #[test]
    fn test_immittance_to_component() {
        assert_eq!(Impedance::new(Expr::monomial(3.0, 1.0)).to_component().to_string(), "L(3)");
        assert_eq!(Impedance::new(Expr::monomial(0.5, -1.0)).to_component().to_string(), "C(2)");
        assert_eq!(Impedance::infinity().to_component(), Component::Open);
        assert_eq!(Admittance::new(Expr::monomial(4.0, 1.0)).to_component().to_string(), "C(4)");
        assert_eq!(Admittance::infinity().to_component(), Component::Wire);
        assert_eq!(Admittance::new(0.5).to_component().to_string(), "G(0.5)");
    }

    #[test]
    fn test_capacitor_network_thevenin() -> Result<()> {
        // Two 2F capacitors in series look like 1F.
        let net = (c(2)? + c(2)?)?;
        assert_eq!(net.thevenin()?.to_string(), "C(1)");
        Ok(())
    }
}

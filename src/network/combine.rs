//! Pairwise combination rules for sibling leaves.
//!
//! [`combine`] is a rule table keyed on the connection and the kinds of the
//! two leaves. It returns the single equivalent leaf, or `None` when the
//! pair has no closed-form merge.

use num_complex::Complex64;

use crate::components::{
    Capacitor, Component, Conductance, CurrentSource, GeneralAdmittance, GeneralImpedance,
    Inductor, Resistor, SourceKind, VoltageSource,
};
use crate::error::{OnePortError, Result};

use super::ConnectionKind;

/// `ab/(a+b)`. Two opposite values have no finite combination unless both
/// are zero.
fn harmonic(a: f64, b: f64) -> Option<f64> {
    let sum = a + b;
    if sum == 0.0 {
        return (a == 0.0).then_some(0.0);
    }
    Some(a * b / sum)
}

fn is_zero_immittance(c: &Component, connection: ConnectionKind) -> bool {
    match (connection, c) {
        (ConnectionKind::Series, Component::Resistor(r)) => r.resistance == 0.0,
        (ConnectionKind::Series, Component::Impedance(z)) => z.0.is_zero(),
        (ConnectionKind::Series, Component::Wire) => true,
        (ConnectionKind::Parallel, Component::Conductance(g)) => g.conductance == 0.0,
        (ConnectionKind::Parallel, Component::Admittance(y)) => y.0.is_zero(),
        (ConnectionKind::Parallel, Component::Open | Component::Port) => true,
        _ => false,
    }
}

fn is_idle_source(c: &Component, connection: ConnectionKind) -> bool {
    match (connection, c) {
        (ConnectionKind::Series, Component::VoltageSource(v)) => v.voltage().is_zero(),
        (ConnectionKind::Parallel, Component::CurrentSource(i)) => i.current().is_zero(),
        _ => false,
    }
}

/// A member that contributes nothing to the connection and can be dropped
/// in favour of its sibling.
fn is_absorbable(c: &Component, connection: ConnectionKind) -> bool {
    is_zero_immittance(c, connection) || is_idle_source(c, connection)
}

/// Merge two source signals of the same kind.
fn merge_sources(a: &SourceKind, b: &SourceKind) -> Option<SourceKind> {
    match (a, b) {
        (SourceKind::Dc(x), SourceKind::Dc(y)) => Some(SourceKind::Dc(x + y)),
        (SourceKind::Signal(x), SourceKind::Signal(y)) => Some(SourceKind::Signal(x + y)),
        (
            SourceKind::Ac {
                amplitude: a1,
                phase: p1,
                omega: w1,
            },
            SourceKind::Ac {
                amplitude: a2,
                phase: p2,
                omega: w2,
            },
        ) if w1 == w2 => {
            let sum = Complex64::from_polar(*a1, *p1) + Complex64::from_polar(*a2, *p2);
            Some(SourceKind::Ac {
                amplitude: sum.norm(),
                phase: sum.arg(),
                omega: *w1,
            })
        }
        _ => None,
    }
}

fn series_inductors(a: &Inductor, b: &Inductor) -> Result<Inductor> {
    // The same current flows through both.
    let initial_current = match (a.initial_current, b.initial_current) {
        (Some(i1), Some(i2)) if i1 != i2 => {
            return Err(OnePortError::conflict(format!(
                "series inductors L({}) and L({}) have initial currents {} and {}",
                a.inductance, b.inductance, i1, i2
            )));
        }
        (i1, i2) => i1.or(i2),
    };
    Ok(Inductor {
        inductance: a.inductance + b.inductance,
        initial_current,
    })
}

fn parallel_capacitors(a: &Capacitor, b: &Capacitor) -> Result<Capacitor> {
    // The same voltage is across both.
    let initial_voltage = match (a.initial_voltage, b.initial_voltage) {
        (Some(v1), Some(v2)) if v1 != v2 => {
            return Err(OnePortError::conflict(format!(
                "parallel capacitors C({}) and C({}) have initial voltages {} and {}",
                a.capacitance, b.capacitance, v1, v2
            )));
        }
        (v1, v2) => v1.or(v2),
    };
    Ok(Capacitor {
        capacitance: a.capacitance + b.capacitance,
        initial_voltage,
    })
}

fn summed_condition(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

/// Combine two sibling leaves joined by `connection`.
///
/// Returns `Ok(None)` when no rule applies. Fails with a conflict error
/// for series inductors or parallel capacitors whose initial conditions
/// disagree.
pub fn combine(connection: ConnectionKind, a: &Component, b: &Component) -> Result<Option<Component>> {
    if is_absorbable(a, connection) {
        return Ok(Some(b.clone()));
    }
    if is_absorbable(b, connection) {
        return Ok(Some(a.clone()));
    }

    use Component as C;
    use ConnectionKind::{Parallel, Series};

    let combined = match (connection, a, b) {
        (Series, C::Resistor(x), C::Resistor(y)) => Some(C::Resistor(Resistor {
            resistance: x.resistance + y.resistance,
        })),
        (Series, C::Inductor(x), C::Inductor(y)) => Some(C::Inductor(series_inductors(x, y)?)),
        (Series, C::Conductance(x), C::Conductance(y)) => harmonic(x.conductance, y.conductance)
            .map(|conductance| C::Conductance(Conductance { conductance })),
        (Series, C::Capacitor(x), C::Capacitor(y)) => {
            harmonic(x.capacitance, y.capacitance).map(|capacitance| {
                C::Capacitor(Capacitor {
                    capacitance,
                    initial_voltage: summed_condition(x.initial_voltage, y.initial_voltage),
                })
            })
        }
        (Series, C::Impedance(x), C::Impedance(y)) => {
            Some(C::Impedance(GeneralImpedance(&x.0 + &y.0)))
        }
        (Series, C::VoltageSource(x), C::VoltageSource(y)) => {
            merge_sources(&x.kind, &y.kind).map(|kind| C::VoltageSource(VoltageSource::from_kind(kind)))
        }

        (Parallel, C::Conductance(x), C::Conductance(y)) => Some(C::Conductance(Conductance {
            conductance: x.conductance + y.conductance,
        })),
        (Parallel, C::Capacitor(x), C::Capacitor(y)) => {
            Some(C::Capacitor(parallel_capacitors(x, y)?))
        }
        (Parallel, C::Resistor(x), C::Resistor(y)) => harmonic(x.resistance, y.resistance)
            .map(|resistance| C::Resistor(Resistor { resistance })),
        (Parallel, C::Inductor(x), C::Inductor(y)) => {
            harmonic(x.inductance, y.inductance).map(|inductance| {
                C::Inductor(Inductor {
                    inductance,
                    initial_current: summed_condition(x.initial_current, y.initial_current),
                })
            })
        }
        (Parallel, C::Admittance(x), C::Admittance(y)) => {
            Some(C::Admittance(GeneralAdmittance(&x.0 + &y.0)))
        }
        (Parallel, C::CurrentSource(x), C::CurrentSource(y)) => {
            merge_sources(&x.kind, &y.kind).map(|kind| C::CurrentSource(CurrentSource::from_kind(kind)))
        }

        _ => None,
    };
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::OnePort;
    use crate::shorthand::{c, c_ic, g, i, idc, l, l_ic, r, v, vac, vdc, w};
    use approx::assert_relative_eq;

    fn leaf(port: OnePort) -> Component {
        port.as_leaf().cloned().unwrap()
    }

    #[test]
    fn test_resistor_rules() {
        let a = leaf(r(10).unwrap());
        let b = leaf(r(15).unwrap());
        match combine(ConnectionKind::Parallel, &a, &b).unwrap() {
            Some(Component::Resistor(x)) => assert_relative_eq!(x.resistance, 6.0),
            other => panic!("unexpected {:?}", other),
        }
        match combine(ConnectionKind::Series, &a, &b).unwrap() {
            Some(Component::Resistor(x)) => assert_relative_eq!(x.resistance, 25.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_conductance_and_capacitor_duals() {
        let g1 = leaf(g(2).unwrap());
        let g2 = leaf(g(2).unwrap());
        match combine(ConnectionKind::Series, &g1, &g2).unwrap() {
            Some(Component::Conductance(x)) => assert_relative_eq!(x.conductance, 1.0),
            other => panic!("unexpected {:?}", other),
        }
        let c1 = leaf(c(3).unwrap());
        let c2 = leaf(c(6).unwrap());
        match combine(ConnectionKind::Series, &c1, &c2).unwrap() {
            Some(Component::Capacitor(x)) => {
                assert_relative_eq!(x.capacitance, 2.0);
                assert_eq!(x.initial_voltage, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_series_capacitor_voltages_add() {
        let c1 = leaf(c_ic(2, 1).unwrap());
        let c2 = leaf(c(2).unwrap());
        match combine(ConnectionKind::Series, &c1, &c2).unwrap() {
            Some(Component::Capacitor(x)) => assert_eq!(x.initial_voltage, Some(1.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_inductor_conflict() {
        let l1 = leaf(l_ic(10, 1).unwrap());
        let l2 = leaf(l_ic(5, 2).unwrap());
        let err = combine(ConnectionKind::Series, &l1, &l2).unwrap_err();
        assert!(matches!(err, OnePortError::Conflict { .. }));

        let same = leaf(l_ic(5, 1).unwrap());
        match combine(ConnectionKind::Series, &l1, &same).unwrap() {
            Some(Component::Inductor(x)) => {
                assert_relative_eq!(x.inductance, 15.0);
                assert_eq!(x.initial_current, Some(1.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parallel_capacitor_conflict() {
        let c1 = leaf(c_ic(1, 1).unwrap());
        let c2 = leaf(c_ic(1, 2).unwrap());
        assert!(combine(ConnectionKind::Parallel, &c1, &c2).is_err());
    }

    #[test]
    fn test_absorption() {
        let short = leaf(r(0).unwrap());
        let src = leaf(v(5).unwrap());
        assert_eq!(combine(ConnectionKind::Series, &short, &src).unwrap(), Some(src.clone()));
        let wire = leaf(w());
        assert_eq!(combine(ConnectionKind::Series, &src, &wire).unwrap(), Some(src));

        let idle = leaf(idc(0).unwrap());
        let res = leaf(r(3).unwrap());
        assert_eq!(combine(ConnectionKind::Parallel, &idle, &res).unwrap(), Some(res));
    }

    #[test]
    fn test_sources() {
        let a = leaf(vdc(3).unwrap());
        let b = leaf(vdc(4).unwrap());
        assert_eq!(combine(ConnectionKind::Series, &a, &b).unwrap(), Some(leaf(vdc(7).unwrap())));

        let i1 = leaf(i(1).unwrap());
        let i2 = leaf(i(2).unwrap());
        assert_eq!(combine(ConnectionKind::Series, &i1, &i2).unwrap(), None);

        let a1 = leaf(vac(1, 0, 50).unwrap());
        let a2 = leaf(vac(1, 0, 50).unwrap());
        match combine(ConnectionKind::Series, &a1, &a2).unwrap() {
            Some(Component::VoltageSource(VoltageSource {
                kind: SourceKind::Ac { amplitude, .. },
            })) => assert_relative_eq!(amplitude, 2.0),
            other => panic!("unexpected {:?}", other),
        }
        let a3 = leaf(vac(1, 0, 60).unwrap());
        assert_eq!(combine(ConnectionKind::Series, &a1, &a3).unwrap(), None);
    }

    #[test]
    fn test_opposite_harmonic_has_no_combination() {
        let a = leaf(r(5).unwrap());
        let b = leaf(r(-5).unwrap());
        assert_eq!(combine(ConnectionKind::Parallel, &a, &b).unwrap(), None);
    }

    #[test]
    fn test_mixed_kinds_do_not_combine() {
        let a = leaf(r(5).unwrap());
        let b = leaf(l(5).unwrap());
        assert_eq!(combine(ConnectionKind::Series, &a, &b).unwrap(), None);
    }
}

//! Series/parallel simplification.
//!
//! Two phases run bottom-up over a network:
//! 1. Flatten: nested networks with the parent's connection are spliced
//!    into the parent (associativity).
//! 2. Combine: sibling leaves are merged pairwise with [`combine`] until a
//!    pass changes nothing. A network left with one member collapses to it.
//!
//! Compound components are not expanded; call [`OnePort::expand`] first.

use log::debug;

use crate::error::Result;

use super::{combine, ConnectionKind, Network, OnePort};

impl OnePort {
    /// Simplify recursively.
    pub fn simplify(&self) -> Result<OnePort> {
        self.simplify_with(true)
    }

    /// Simplify, optionally leaving nested networks of the other connection
    /// kind untouched (`deep = false`).
    pub fn simplify_with(&self, deep: bool) -> Result<OnePort> {
        match self {
            OnePort::Leaf(_) => Ok(self.clone()),
            OnePort::Network(n) => n.simplify(deep),
        }
    }
}

impl Network {
    fn simplify(&self, deep: bool) -> Result<OnePort> {
        let mut members = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let member = match member {
                OnePort::Network(child) if deep => child.simplify(deep)?,
                other => other.clone(),
            };
            match member {
                OnePort::Network(child) if child.connection == self.connection => {
                    members.extend(child.members)
                }
                other => members.push(other),
            }
        }

        loop {
            if members.len() == 1 {
                return Ok(members.remove(0));
            }
            let (next, changed) = combine_pass(self.connection, members)?;
            members = next;
            if !changed {
                break;
            }
        }

        if members.len() == 1 {
            return Ok(members.remove(0));
        }
        Ok(OnePort::Network(Network::new(self.connection, members)?))
    }
}

/// One scan over all sibling pairs. Returns a fresh member list and whether
/// any pair merged.
fn combine_pass(connection: ConnectionKind, members: Vec<OnePort>) -> Result<(Vec<OnePort>, bool)> {
    let mut pending: Vec<Option<OnePort>> = members.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(pending.len());
    let mut changed = false;

    for n in 0..pending.len() {
        let Some(mut current) = pending[n].take() else {
            continue;
        };
        if let OnePort::Leaf(_) = current {
            for slot in pending.iter_mut().skip(n + 1) {
                let merged = match (&current, slot.as_ref()) {
                    (OnePort::Leaf(a), Some(OnePort::Leaf(b))) => combine(connection, a, b)?,
                    _ => None,
                };
                if let Some(c) = merged {
                    debug!("combined {} {} {} into {}", current, connection.operator(), slot_name(slot), c);
                    *slot = None;
                    current = OnePort::Leaf(c);
                    changed = true;
                }
            }
        }
        out.push(current);
    }
    Ok((out, changed))
}

fn slot_name(slot: &Option<OnePort>) -> String {
    slot.as_ref().map(|p| p.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use crate::error::OnePortError;
    use crate::shorthand::{c, g, idc, l, l_ic, r, v, vdc};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn resistance(port: &OnePort) -> f64 {
        match port {
            OnePort::Leaf(Component::Resistor(x)) => x.resistance,
            other => panic!("expected a resistor, got {}", other),
        }
    }

    #[test]
    fn test_parallel_resistors() -> Result<()> {
        let net = (r(10)? | r(15)?)?.simplify()?;
        assert_relative_eq!(resistance(&net), 6.0);
        Ok(())
    }

    #[test]
    fn test_series_inductors() -> Result<()> {
        let net = (l(10)? + l(5)?)?.simplify()?;
        match net {
            OnePort::Leaf(Component::Inductor(x)) => assert_relative_eq!(x.inductance, 15.0),
            other => panic!("unexpected {}", other),
        }
        let conflict = (l_ic(10, 1)? + l_ic(5, 2)?)?.simplify();
        assert!(matches!(conflict, Err(OnePortError::Conflict { .. })));
        Ok(())
    }

    #[test]
    fn test_parallel_current_sources() -> Result<()> {
        let net = (idc(10)? | idc(5)?)?.simplify()?;
        assert!(matches!(net, OnePort::Leaf(Component::CurrentSource(_))));
        assert_eq!(net.isc()?, crate::Current::dc(15.0));
        assert_eq!(net.to_string(), "Idc(15)");
        Ok(())
    }

    #[test]
    fn test_zero_resistor_absorbed() -> Result<()> {
        let net = (r(0)? + v(5)?)?.simplify()?;
        assert_eq!(net, v(5)?);
        Ok(())
    }

    #[test]
    fn test_flatten_nested_series() -> Result<()> {
        let net = ((r(1)? + r(2)?)? + (r(3)? | r(6)?))?;
        let simple = net.simplify()?;
        assert_relative_eq!(resistance(&simple), 5.0);
        Ok(())
    }

    #[test]
    fn test_shallow_keeps_other_networks() -> Result<()> {
        let inner = (r(3)? | r(6)?)?;
        let net = ((r(1)? + r(2)?)? + inner.clone())?;
        let shallow = net.simplify_with(false)?;
        let members = shallow.as_network().unwrap().members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1], inner);
        Ok(())
    }

    #[test]
    fn test_non_combinable_siblings_remain() -> Result<()> {
        let net = (r(1)? + l(1)? + r(2)? + c(1)?)?;
        let simple = net.simplify()?;
        assert_eq!(simple.to_string(), "R(3) + L(1) + C(1)");
        Ok(())
    }

    #[test]
    fn test_mixed_sources_and_resistors() -> Result<()> {
        let net = (vdc(1)? + r(1)? + vdc(2)? + r(2)?)?.simplify()?;
        assert_eq!(net.to_string(), "Vdc(3) + R(3)");
        Ok(())
    }

    #[test]
    fn test_simplify_preserves_original() -> Result<()> {
        let net = (g(1)? | g(2)?)?;
        let before = net.clone();
        let _ = net.simplify()?;
        assert_eq!(net, before);
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_parallel_resistors(r1 in 1e-3f64..1e6, r2 in 1e-3f64..1e6) {
            let net = (r(r1).unwrap() | r(r2).unwrap()).unwrap().simplify().unwrap();
            let expected = r1 * r2 / (r1 + r2);
            prop_assert!((resistance(&net) - expected).abs() <= 1e-9 * expected);
            prop_assert!(net.impedance().unwrap() == expected);
        }

        #[test]
        fn prop_series_resistors(r1 in -1e6f64..1e6, r2 in -1e6f64..1e6) {
            let net = (r(r1).unwrap() + r(r2).unwrap()).unwrap().simplify().unwrap();
            prop_assert!(matches!(net, OnePort::Leaf(Component::Resistor(_))));
            let expected = r1 + r2;
            prop_assert!((resistance(&net) - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }
}

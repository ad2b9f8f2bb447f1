//! Leaf-by-leaf model transforms: compound expansion, the s-domain model
//! and the thermal noise model.

use crate::components::{Component, CurrentSource, GeneralAdmittance, GeneralImpedance, VoltageSource};
use crate::error::{OnePortError, Result};
use crate::quantity::{Admittance, Impedance};
use crate::BOLTZMANN;

use super::{Network, OnePort};

impl OnePort {
    /// Rebuild the tree with every leaf replaced by `f(leaf)`.
    fn map_leaves<F>(&self, f: &F) -> Result<OnePort>
    where
        F: Fn(&Component) -> Result<OnePort>,
    {
        match self {
            OnePort::Leaf(c) => f(c),
            OnePort::Network(n) => {
                let members = n
                    .members
                    .iter()
                    .map(|m| m.map_leaves(f))
                    .collect::<Result<Vec<_>>>()?;
                Ok(OnePort::Network(Network::new(n.connection, members)?))
            }
        }
    }

    /// Replace crystals and ferrite beads by their equivalent networks.
    pub fn expand(&self) -> Result<OnePort> {
        self.map_leaves(&|c| match c {
            Component::Crystal(x) => x.expand(),
            Component::FerriteBead(fb) => fb.expand(),
            other => Ok(other.clone().into()),
        })
    }

    /// The s-domain model.
    ///
    /// Sources become Laplace-domain sources, elements with initial
    /// conditions become a source with their impedance, and all other
    /// leaves become plain `Z`/`Y` elements. Noise sources have no Laplace
    /// transform and are kept as they are.
    pub fn s_model(&self) -> Result<OnePort> {
        self.map_leaves(&s_model_leaf)
    }

    /// Add a thermal noise voltage source `sqrt(4kTR)` in series with every
    /// resistive leaf, each with its own noise id. `temperature` is in
    /// kelvin; see [`crate::DEFAULT_TEMPERATURE`].
    pub fn noise_model(&self, temperature: f64) -> Result<OnePort> {
        self.map_leaves(&|c| noisy(c, temperature))
    }
}

fn impedance_leaf(z: Impedance) -> OnePort {
    Component::Impedance(GeneralImpedance(z.into_expr())).into()
}

fn admittance_leaf(y: Admittance) -> OnePort {
    Component::Admittance(GeneralAdmittance(y.into_expr())).into()
}

fn s_model_leaf(c: &Component) -> Result<OnePort> {
    let direct = c.direct()?;

    if let Some(voc) = &direct.voc {
        if voc.signal().has_noise() {
            return Ok(c.clone().into());
        }
        let z = direct.resolve_impedance(c)?;
        if voc.is_zero() {
            return Ok(impedance_leaf(z));
        }
        let source = OnePort::from(VoltageSource::laplace(voc.laplace()?)?);
        if z.is_zero() {
            return Ok(source);
        }
        return OnePort::series(vec![source, impedance_leaf(z)]);
    }

    if let Some(isc) = &direct.isc {
        if isc.signal().has_noise() {
            return Ok(c.clone().into());
        }
        let y = direct.resolve_admittance(c)?;
        if isc.is_zero() {
            return Ok(admittance_leaf(y));
        }
        let source = OnePort::from(CurrentSource::laplace(isc.laplace()?)?);
        if y.is_zero() {
            return Ok(source);
        }
        return OnePort::parallel(vec![source, admittance_leaf(y)]);
    }

    match (direct.impedance, direct.admittance) {
        (Some(z), _) => Ok(impedance_leaf(z)),
        (None, Some(y)) => Ok(admittance_leaf(y)),
        (None, None) => Err(OnePortError::Underconstrained {
            component: c.to_string(),
        }),
    }
}

fn noisy(c: &Component, temperature: f64) -> Result<OnePort> {
    let resistance = match c {
        Component::Resistor(r) => Some(r.resistance),
        Component::Conductance(g) if g.conductance != 0.0 => Some(1.0 / g.conductance),
        Component::Impedance(z) => z.0.real_value(),
        Component::Admittance(y) => y.0.recip().real_value(),
        _ => None,
    };
    match resistance {
        Some(r) if r != 0.0 => {
            let asd = (4.0 * BOLTZMANN * temperature * r).sqrt();
            OnePort::series(vec![c.clone().into(), VoltageSource::noise(asd)?.into()])
        }
        _ => Ok(c.clone().into()),
    }
}

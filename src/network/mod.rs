//! One-port network trees.
//!
//! A [`OnePort`] is either a leaf [`Component`] or a [`Network`] of members
//! joined in series or in parallel. Trees are immutable: the `+` (series)
//! and `|` (parallel) operators, [`OnePort::simplify`] and the equivalent
//! circuit reductions all return new trees.
//!
//! ```
//! use oneport::shorthand::{r, vdc};
//!
//! let net = (vdc(10)? + r(5)?)?;
//! assert_eq!(net.voc()?, oneport::Voltage::dc(10.0));
//! assert_eq!(net.impedance()?, 5.0);
//! # Ok::<(), oneport::OnePortError>(())
//! ```

mod combine;
mod equivalent;
mod models;
mod resolve;
mod sections;
mod simplify;
mod validate;

pub use combine::combine;
pub use sections::LoadedCircuit;

use std::fmt;
use std::ops::{Add, BitOr};

use crate::components::{
    Capacitor, Component, Conductance, ConstantPhaseElement, ControlledSource, Crystal,
    CurrentSource, FerriteBead, GeneralAdmittance, GeneralImpedance, Inductor, Resistor,
    VoltageSource,
};
use crate::error::{OnePortError, Result, Warning};

/// How the members of a [`Network`] are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Series connection (impedances add).
    Series,
    /// Parallel connection (admittances add).
    Parallel,
}

impl ConnectionKind {
    pub fn operator(&self) -> &'static str {
        match self {
            ConnectionKind::Series => "+",
            ConnectionKind::Parallel => "|",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConnectionKind::Series => "series",
            ConnectionKind::Parallel => "parallel",
        }
    }
}

/// Members joined in series or in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    connection: ConnectionKind,
    members: Vec<OnePort>,
}

impl Network {
    /// Create a network, rejecting illegal source topologies.
    ///
    /// Two independent current sources in series, or two independent
    /// voltage sources in parallel, are an error. Components made redundant
    /// by an ideal source are accepted and logged as warnings.
    pub fn new(connection: ConnectionKind, members: Vec<OnePort>) -> Result<Self> {
        if members.is_empty() {
            return Err(OnePortError::invalid_topology(format!(
                "{} network has no members",
                connection.name()
            )));
        }
        validate::check_sources(connection, &members)?;

        let network = Self {
            connection,
            members,
        };
        for warning in network.redundancy_warnings() {
            warning.emit();
        }
        Ok(network)
    }

    pub fn connection(&self) -> ConnectionKind {
        self.connection
    }

    pub fn members(&self) -> &[OnePort] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Components made electrically irrelevant by an ideal source in this
    /// network.
    pub fn redundancy_warnings(&self) -> Vec<Warning> {
        validate::redundancy_warnings(self.connection, &self.members)
    }
}

/// A two-terminal network.
#[derive(Debug, Clone, PartialEq)]
pub enum OnePort {
    Leaf(Component),
    Network(Network),
}

impl OnePort {
    /// Join `members` in series.
    pub fn series(members: Vec<OnePort>) -> Result<OnePort> {
        Ok(OnePort::Network(Network::new(ConnectionKind::Series, members)?))
    }

    /// Join `members` in parallel.
    pub fn parallel(members: Vec<OnePort>) -> Result<OnePort> {
        Ok(OnePort::Network(Network::new(ConnectionKind::Parallel, members)?))
    }

    pub fn as_leaf(&self) -> Option<&Component> {
        match self {
            OnePort::Leaf(c) => Some(c),
            OnePort::Network(_) => None,
        }
    }

    pub fn as_network(&self) -> Option<&Network> {
        match self {
            OnePort::Leaf(_) => None,
            OnePort::Network(n) => Some(n),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, OnePort::Leaf(_))
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            OnePort::Leaf(_) => 1,
            OnePort::Network(n) => n.members.iter().map(OnePort::leaf_count).sum(),
        }
    }
}

macro_rules! oneport_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for OnePort {
                fn from(value: $ty) -> Self {
                    OnePort::Leaf(value.into())
                }
            }
        )*
    };
}

oneport_from!(
    Component,
    Resistor,
    Conductance,
    Inductor,
    Capacitor,
    ConstantPhaseElement,
    GeneralImpedance,
    GeneralAdmittance,
    VoltageSource,
    CurrentSource,
    Crystal,
    FerriteBead,
    ControlledSource
);

impl From<Network> for OnePort {
    fn from(network: Network) -> Self {
        OnePort::Network(network)
    }
}

macro_rules! combinator_op {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl $trait for OnePort {
            type Output = Result<OnePort>;

            fn $method(self, rhs: OnePort) -> Result<OnePort> {
                OnePort::$ctor(vec![self, rhs])
            }
        }

        impl $trait<&OnePort> for &OnePort {
            type Output = Result<OnePort>;

            fn $method(self, rhs: &OnePort) -> Result<OnePort> {
                OnePort::$ctor(vec![self.clone(), rhs.clone()])
            }
        }

        impl $trait<Result<OnePort>> for OnePort {
            type Output = Result<OnePort>;

            fn $method(self, rhs: Result<OnePort>) -> Result<OnePort> {
                OnePort::$ctor(vec![self, rhs?])
            }
        }

        impl $trait<OnePort> for Result<OnePort> {
            type Output = Result<OnePort>;

            fn $method(self, rhs: OnePort) -> Result<OnePort> {
                OnePort::$ctor(vec![self?, rhs])
            }
        }
    };
}

combinator_op!(Add, add, series);
combinator_op!(BitOr, bitor, parallel);

impl fmt::Display for OnePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnePort::Leaf(c) => write!(f, "{}", c),
            OnePort::Network(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, member) in self.members.iter().enumerate() {
            if k > 0 {
                write!(f, " {} ", self.connection.operator())?;
            }
            match member {
                OnePort::Network(child) if child.connection != self.connection => {
                    write!(f, "({})", child)?
                }
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorthand::{i, idc, r, v, vdc};

    #[test]
    fn test_operators_build_trees() -> Result<()> {
        let net = (r(1)? + r(2)?)?;
        let net = (net | r(3)?)?;
        let network = net.as_network().unwrap();
        assert_eq!(network.connection(), ConnectionKind::Parallel);
        assert_eq!(network.len(), 2);
        assert_eq!(net.leaf_count(), 3);
        Ok(())
    }

    #[test]
    fn test_display_parenthesises_mixed_operators() -> Result<()> {
        let net = (r(1)? + (r(2)? | r(3)?))?;
        assert_eq!(net.to_string(), "R(1) + (R(2) | R(3))");
        let chain = ((r(1)? + r(2)?)? + r(3)?)?;
        assert_eq!(chain.to_string(), "R(1) + R(2) + R(3)");
        Ok(())
    }

    #[test]
    fn test_parallel_voltage_sources_rejected() -> Result<()> {
        let err = (v(1)? | v(2)?).unwrap_err();
        assert!(err.is_construction_error());
        // Equal sources are rejected too.
        assert!((vdc(1)? | vdc(1)?).is_err());
        Ok(())
    }

    #[test]
    fn test_series_current_sources_rejected() -> Result<()> {
        let err = (i(1)? + idc(2)?).unwrap_err();
        assert!(matches!(err, OnePortError::InvalidTopology { .. }));
        Ok(())
    }

    #[test]
    fn test_errors_propagate_through_chains() -> Result<()> {
        let bad = i(1)? + i(2)?;
        assert!((bad + r(5)?).is_err());
        Ok(())
    }

    #[test]
    fn test_redundancy_warnings() -> Result<()> {
        let net = (r(10)? | vdc(5)?)?;
        let warnings = net.as_network().unwrap().redundancy_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "redundant component R(10) in parallel with voltage source Vdc(5)"
        );

        let quiet = (r(10)? + vdc(5)?)?;
        assert!(quiet.as_network().unwrap().redundancy_warnings().is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_network_rejected() {
        assert!(OnePort::series(Vec::new()).is_err());
    }
}

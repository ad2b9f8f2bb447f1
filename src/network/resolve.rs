//! Driving-point quantities.
//!
//! A leaf stores some of {impedance, admittance, Voc, Isc}; the rest follow
//! from a fixed fallback chain. An ideal voltage source is a short
//! internally and an ideal current source an open, so the chain checks the
//! stored immittances before falling back on the sources.

use log::trace;

use crate::components::{Component, Direct};
use crate::error::{OnePortError, Result};
use crate::quantity::{Admittance, Current, Impedance, TimeSignal, Voltage};

use super::{ConnectionKind, Network, OnePort};

fn underconstrained(component: &Component) -> OnePortError {
    OnePortError::Underconstrained {
        component: component.to_string(),
    }
}

impl Direct {
    pub(crate) fn resolve_impedance(&self, component: &Component) -> Result<Impedance> {
        if let Some(z) = &self.impedance {
            return Ok(z.clone());
        }
        if let Some(y) = &self.admittance {
            return Ok(y.recip());
        }
        if self.voc.is_some() {
            return Ok(Impedance::zero());
        }
        if self.isc.is_some() {
            return Ok(Admittance::zero().recip());
        }
        Err(underconstrained(component))
    }

    pub(crate) fn resolve_admittance(&self, component: &Component) -> Result<Admittance> {
        if let Some(y) = &self.admittance {
            return Ok(y.clone());
        }
        Ok(self.resolve_impedance(component)?.recip())
    }

    pub(crate) fn resolve_voc(&self, component: &Component) -> Result<Voltage> {
        if let Some(voc) = &self.voc {
            return Ok(voc.clone());
        }
        if let Some(isc) = &self.isc {
            return Ok(isc * &self.resolve_impedance(component)?);
        }
        if self.impedance.is_some() || self.admittance.is_some() {
            return Ok(Voltage::zero());
        }
        Err(underconstrained(component))
    }

    pub(crate) fn resolve_isc(&self, component: &Component) -> Result<Current> {
        if let Some(isc) = &self.isc {
            return Ok(isc.clone());
        }
        Ok(&self.resolve_voc(component)? / &self.resolve_impedance(component)?)
    }
}

impl Network {
    pub fn impedance(&self) -> Result<Impedance> {
        match self.connection {
            ConnectionKind::Series => self.sum(OnePort::impedance),
            ConnectionKind::Parallel => Ok(self.admittance()?.recip()),
        }
    }

    pub fn admittance(&self) -> Result<Admittance> {
        match self.connection {
            ConnectionKind::Series => Ok(self.impedance()?.recip()),
            ConnectionKind::Parallel => self.sum(OnePort::admittance),
        }
    }

    /// Open-circuit voltage by superposition.
    ///
    /// Series sources add. In parallel the short-circuit currents add and
    /// see the total admittance, unless a member is a short: a single
    /// shorting member fixes the voltage, several must all be passive.
    pub fn voc(&self) -> Result<Voltage> {
        match self.connection {
            ConnectionKind::Series => self.sum(OnePort::voc),
            ConnectionKind::Parallel => {
                let shorts = self.members_where(|z| z.is_zero())?;
                match shorts.as_slice() {
                    [] => Ok(&self.isc()? / &self.admittance()?),
                    [only] => only.voc(),
                    several => {
                        for member in several {
                            if !member.voc()?.is_zero() {
                                return Err(OnePortError::indeterminate("Voc", self.to_string()));
                            }
                        }
                        Ok(Voltage::zero())
                    }
                }
            }
        }
    }

    /// Short-circuit current, the dual of [`Network::voc`].
    pub fn isc(&self) -> Result<Current> {
        match self.connection {
            ConnectionKind::Parallel => self.sum(OnePort::isc),
            ConnectionKind::Series => {
                let opens = self.members_where(|z| z.is_infinite())?;
                match opens.as_slice() {
                    [] => Ok(&self.voc()? / &self.impedance()?),
                    [only] => only.isc(),
                    several => {
                        for member in several {
                            if !member.isc()?.is_zero() {
                                return Err(OnePortError::indeterminate("Isc", self.to_string()));
                            }
                        }
                        Ok(Current::zero())
                    }
                }
            }
        }
    }

    fn sum<T, F>(&self, quantity: F) -> Result<T>
    where
        T: Default,
        for<'a> &'a T: std::ops::Add<&'a T, Output = T>,
        F: Fn(&OnePort) -> Result<T>,
    {
        let mut total = T::default();
        for member in &self.members {
            total = &total + &quantity(member)?;
        }
        Ok(total)
    }

    fn members_where(&self, predicate: impl Fn(&Impedance) -> bool) -> Result<Vec<&OnePort>> {
        let mut selected = Vec::new();
        for member in &self.members {
            if predicate(&member.impedance()?) {
                selected.push(member);
            }
        }
        Ok(selected)
    }
}

impl OnePort {
    pub fn impedance(&self) -> Result<Impedance> {
        match self {
            OnePort::Leaf(c) => c.direct()?.resolve_impedance(c),
            OnePort::Network(n) => n.impedance(),
        }
    }

    pub fn admittance(&self) -> Result<Admittance> {
        match self {
            OnePort::Leaf(c) => c.direct()?.resolve_admittance(c),
            OnePort::Network(n) => n.admittance(),
        }
    }

    /// Open-circuit voltage.
    pub fn voc(&self) -> Result<Voltage> {
        let voc = match self {
            OnePort::Leaf(c) => c.direct()?.resolve_voc(c),
            OnePort::Network(n) => n.voc(),
        }?;
        trace!("Voc of {} = {}", self, voc);
        Ok(voc)
    }

    /// Short-circuit current.
    pub fn isc(&self) -> Result<Current> {
        match self {
            OnePort::Leaf(c) => c.direct()?.resolve_isc(c),
            OnePort::Network(n) => n.isc(),
        }
    }

    /// Alias for [`OnePort::impedance`].
    pub fn z(&self) -> Result<Impedance> {
        self.impedance()
    }

    /// Alias for [`OnePort::admittance`].
    pub fn y(&self) -> Result<Admittance> {
        self.admittance()
    }

    /// Alias for [`OnePort::voc`].
    pub fn v(&self) -> Result<Voltage> {
        self.voc()
    }

    /// Open-circuit current. This is zero except for a current source,
    /// whose open-circuit voltage is unbounded.
    pub fn i(&self) -> Result<Current> {
        match self {
            OnePort::Leaf(c) if c.is_current_source() => self.isc(),
            _ => Ok(Current::zero()),
        }
    }

    /// Open-circuit voltage in the time domain.
    pub fn voc_t(&self) -> Result<TimeSignal> {
        self.voc()?.time()
    }

    /// Short-circuit current in the time domain.
    pub fn isc_t(&self) -> Result<TimeSignal> {
        self.isc()?.time()
    }

    pub fn v_t(&self) -> Result<TimeSignal> {
        self.voc_t()
    }

    pub fn i_t(&self) -> Result<TimeSignal> {
        self.i()?.time()
    }

    /// Impedance impulse response.
    pub fn z_t(&self) -> Result<TimeSignal> {
        self.impedance()?.time()
    }

    /// Admittance impulse response.
    pub fn y_t(&self) -> Result<TimeSignal> {
        self.admittance()?.time()
    }
}

//! Ladder and section builders, and loading a one-port.

use crate::components::Component;
use crate::error::Result;
use crate::quantity::{Current, TimeSignal, Voltage};

use super::OnePort;

impl OnePort {
    /// Ladder network `self + (b | (c + (d | ...)))`, alternating series
    /// and shunt elements from the input side.
    pub fn ladder(&self, rest: &[OnePort]) -> Result<OnePort> {
        let Some((last, middle)) = rest.split_last() else {
            return Ok(self.clone());
        };
        let mut acc = last.clone();
        // `middle[k]` sits at ladder position k + 1.
        for (k, member) in middle.iter().enumerate().rev() {
            acc = if (k + 1) % 2 == 0 {
                OnePort::series(vec![member.clone(), acc])?
            } else {
                OnePort::parallel(vec![member.clone(), acc])?
            };
        }
        OnePort::series(vec![self.clone(), acc])
    }

    /// L section with an open output, seen from its input: `self + shunt`.
    pub fn lsection(&self, shunt: &OnePort) -> Result<OnePort> {
        OnePort::series(vec![self.clone(), shunt.clone()])
    }

    /// T section with an open output, seen from its input:
    /// `self + (shunt | (output + O))`.
    pub fn tsection(&self, shunt: &OnePort, output: &OnePort) -> Result<OnePort> {
        let open_arm = OnePort::series(vec![output.clone(), Component::Open.into()])?;
        OnePort::series(vec![
            self.clone(),
            OnePort::parallel(vec![shunt.clone(), open_arm])?,
        ])
    }

    /// Connect `load` across this one-port.
    pub fn load(&self, load: &OnePort) -> LoadedCircuit {
        LoadedCircuit {
            source: self.clone(),
            load: load.clone(),
        }
    }
}

/// A one-port driving a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCircuit {
    source: OnePort,
    load: OnePort,
}

impl LoadedCircuit {
    pub fn source(&self) -> &OnePort {
        &self.source
    }

    pub fn load(&self) -> &OnePort {
        &self.load
    }

    /// Voltage across the load.
    pub fn voltage(&self) -> Result<Voltage> {
        OnePort::parallel(vec![self.source.clone(), self.load.clone()])?.voc()
    }

    /// Current through the load.
    pub fn current(&self) -> Result<Current> {
        OnePort::series(vec![self.source.clone(), self.load.clone()])?.isc()
    }

    pub fn voltage_t(&self) -> Result<TimeSignal> {
        self.voltage()?.time()
    }

    pub fn current_t(&self) -> Result<TimeSignal> {
        self.current()?.time()
    }
}

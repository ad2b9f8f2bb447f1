//! Compound components defined by an equivalent sub-network.

use crate::error::Result;
use crate::network::OnePort;

use super::{Capacitor, Inductor, Param, Resistor};

/// Quartz crystal, Butterworth-Van Dyke model: the motional arm
/// `R1 + L1 + C1` in parallel with the shunt capacitance `C0`.
/// Overtone resonances are not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Crystal {
    pub c0: f64,
    pub r1: f64,
    pub l1: f64,
    pub c1: f64,
}

impl Crystal {
    pub fn new(c0: impl Param, r1: impl Param, l1: impl Param, c1: impl Param) -> Result<Self> {
        Ok(Self {
            c0: c0.to_param("Xtal", "C0")?,
            r1: r1.to_param("Xtal", "R1")?,
            l1: l1.to_param("Xtal", "L1")?,
            c1: c1.to_param("Xtal", "C1")?,
        })
    }

    pub fn expand(&self) -> Result<OnePort> {
        let motional = OnePort::series(vec![
            Resistor::new(self.r1)?.into(),
            Inductor::new(self.l1)?.into(),
            Capacitor::new(self.c1)?.into(),
        ])?;
        OnePort::parallel(vec![motional, Capacitor::new(self.c0)?.into()])
    }

    /// Series resonance of the motional arm, rad/s.
    pub fn series_resonance(&self) -> f64 {
        1.0 / (self.l1 * self.c1).sqrt()
    }
}

/// Ferrite bead (lossy inductor): a series resistance `Rs` followed by the
/// parallel `Rp | Lp | Cp` tank.
#[derive(Debug, Clone, PartialEq)]
pub struct FerriteBead {
    pub rs: f64,
    pub rp: f64,
    pub cp: f64,
    pub lp: f64,
}

impl FerriteBead {
    pub fn new(rs: impl Param, rp: impl Param, cp: impl Param, lp: impl Param) -> Result<Self> {
        Ok(Self {
            rs: rs.to_param("FerriteBead", "Rs")?,
            rp: rp.to_param("FerriteBead", "Rp")?,
            cp: cp.to_param("FerriteBead", "Cp")?,
            lp: lp.to_param("FerriteBead", "Lp")?,
        })
    }

    pub fn expand(&self) -> Result<OnePort> {
        let tank = OnePort::parallel(vec![
            Resistor::new(self.rp)?.into(),
            Inductor::new(self.lp)?.into(),
            Capacitor::new(self.cp)?.into(),
        ])?;
        OnePort::series(vec![Resistor::new(self.rs)?.into(), tank])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_crystal_impedance_matches_expansion() {
        let x = Crystal::new("5p", 20, "10m", 20e-15).unwrap();
        let expanded = x.expand().unwrap().impedance().unwrap();
        let w = x.series_resonance();
        // At series resonance the motional arm is just R1, shunted by C0.
        let z = expanded.phasor(w);
        let zc0 = num_complex::Complex64::new(0.0, -1.0 / (w * 5e-12));
        let r1 = num_complex::Complex64::new(20.0, 0.0);
        let expected = r1 * zc0 / (r1 + zc0);
        assert_relative_eq!(z.re, expected.re, max_relative = 1e-6);
        assert_relative_eq!(z.im, expected.im, max_relative = 1e-6);
    }

    #[test]
    fn test_ferrite_bead_dc_resistance() {
        let fb = FerriteBead::new(0.1, 500, "1p", "1u").unwrap();
        let z = fb.expand().unwrap().impedance().unwrap();
        // The inductor shorts the tank at DC.
        assert_relative_eq!(z.phasor(0.0).re, 0.1, epsilon = 1e-12);
    }
}

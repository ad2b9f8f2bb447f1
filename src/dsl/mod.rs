//! A small text language for one-port networks.
//!
//! Leaves with numeric arguments print in this syntax, so a network built
//! only from them can be written out and read back. Leaves holding an
//! expression in `s` (`Z(5*s + 10)`, `sV(10*s^-1)`), superposed signals
//! (`V(...)`), time-domain sources and controlled sources print in a form
//! the parser does not accept.
//!
//! # Grammar
//!
//! ```text
//! network = series { '|' series }
//! series  = atom { '+' atom }
//! atom    = name '(' [ value { ',' value } ] ')' | '(' network ')'
//! value   = number [unit_suffix]
//!
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! `|` binds looser than `+`, and `#` starts a comment running to the end
//! of the line.
//!
//! # Components
//!
//! | Name | Description | Arguments |
//! |------|-------------|-----------|
//! | R, G | Resistor, conductance | value |
//! | L | Inductor | `L[, i0]` |
//! | C | Capacitor | `C[, v0]` |
//! | CPE | Constant phase element | `K[, alpha = 0.5]` |
//! | Z, Y | Constant impedance, admittance | value |
//! | V, I | Constant source | value |
//! | Vdc, Idc, Vstep, Istep | DC and step sources | value |
//! | Vac, Iac | Sinusoidal source | `amplitude[, phase[, omega]]` |
//! | Vnoise, Inoise | White noise source | `asd[, id]` |
//! | Xtal | Crystal | `C0, R1, L1, C1` |
//! | FerriteBead | Ferrite bead | `Rs, Rp, Cp, Lp` |
//! | W, O, P | Wire, open circuit, port | none |
//!
//! `Vac`/`Iac` without an explicit omega take
//! [`ParseOptions::default_omega`].
//!
//! # Example
//!
//! ```text
//! # Loaded divider
//! Vdc(10) + R(1k) + (R(2k2) | C(100n))
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use std::path::Path;

use log::debug;

use crate::components::{
    Capacitor, Component, Conductance, ConstantPhaseElement, Crystal, CurrentSource, FerriteBead,
    GeneralAdmittance, GeneralImpedance, Inductor, Resistor, VoltageSource,
};
use crate::error::{OnePortError, Result};
use crate::network::OnePort;
use crate::quantity::NoiseId;

/// Options for turning parsed text into a network.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParseOptions {
    /// Angular frequency (rad/s) for `Vac`/`Iac` written without one.
    pub default_omega: Option<f64>,
}

/// Parse a network expression.
pub fn parse(input: &str) -> Result<OnePort> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a network expression with explicit options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<OnePort> {
    let ast = Parser::new(Lexer::new(input))?.parse()?;
    debug!("parsed {} elements", ast.element_count());
    build(&ast, options)
}

/// Parse a network expression from a file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<OnePort> {
    let content = std::fs::read_to_string(path).map_err(|e| OnePortError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_with(&content, options)
}

/// Build the network an AST describes.
pub fn build(ast: &NetworkAst, options: &ParseOptions) -> Result<OnePort> {
    match ast {
        NetworkAst::Element(element) => build_element(element, options),
        NetworkAst::Series(members) => OnePort::series(build_all(members, options)?),
        NetworkAst::Parallel(members) => OnePort::parallel(build_all(members, options)?),
    }
}

fn build_all(members: &[NetworkAst], options: &ParseOptions) -> Result<Vec<OnePort>> {
    members.iter().map(|m| build(m, options)).collect()
}

fn noise_id(element: &ElementDef) -> Result<NoiseId> {
    match element.args.get(1) {
        None => Ok(NoiseId::fresh()),
        Some(&id) if id >= 0.0 && id.fract() == 0.0 => Ok(NoiseId(id as usize)),
        Some(&id) => Err(OnePortError::parse(
            element.line,
            format!("noise id must be a non-negative integer, got {}", id),
        )),
    }
}

fn build_element(element: &ElementDef, options: &ParseOptions) -> Result<OnePort> {
    use ElementType as E;

    let a = &element.args;
    let arg = |k: usize, default: f64| a.get(k).copied().unwrap_or(default);
    let omega = || match a.get(2).copied().or(options.default_omega) {
        Some(omega) => Ok(omega),
        None => Err(OnePortError::parse(
            element.line,
            "sinusoidal source needs an omega argument or a default omega",
        )),
    };

    let component: Component = match element.element_type {
        E::Resistor => Resistor::new(a[0])?.into(),
        E::Conductance => Conductance::new(a[0])?.into(),
        E::Inductor => match a.get(1) {
            Some(&i0) => Inductor::with_initial_current(a[0], i0)?.into(),
            None => Inductor::new(a[0])?.into(),
        },
        E::Capacitor => match a.get(1) {
            Some(&v0) => Capacitor::with_initial_voltage(a[0], v0)?.into(),
            None => Capacitor::new(a[0])?.into(),
        },
        E::ConstantPhase => ConstantPhaseElement::new(a[0], arg(1, 0.5))?.into(),
        E::Impedance => GeneralImpedance::new(a[0])?.into(),
        E::Admittance => GeneralAdmittance::new(a[0])?.into(),
        E::Voltage => VoltageSource::constant(a[0])?.into(),
        E::VoltageDc => VoltageSource::dc(a[0])?.into(),
        E::VoltageAc => VoltageSource::ac(a[0], arg(1, 0.0), omega()?)?.into(),
        E::VoltageStep => VoltageSource::step(a[0])?.into(),
        E::VoltageNoise => VoltageSource::noise_with_id(a[0], noise_id(element)?)?.into(),
        E::Current => CurrentSource::constant(a[0])?.into(),
        E::CurrentDc => CurrentSource::dc(a[0])?.into(),
        E::CurrentAc => CurrentSource::ac(a[0], arg(1, 0.0), omega()?)?.into(),
        E::CurrentStep => CurrentSource::step(a[0])?.into(),
        E::CurrentNoise => CurrentSource::noise_with_id(a[0], noise_id(element)?)?.into(),
        E::Crystal => Crystal::new(a[0], a[1], a[2], a[3])?.into(),
        E::FerriteBead => FerriteBead::new(a[0], a[1], a[2], a[3])?.into(),
        E::Wire => Component::Wire,
        E::Open => Component::Open,
        E::Port => Component::Port,
    };
    Ok(component.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::{Current, Voltage};
    use crate::shorthand::{c, l_ic, r, vdc};

    #[test]
    fn test_parse_divider() -> Result<()> {
        let net = parse("Vdc(10) + R(5)")?;
        assert_eq!(net, (vdc(10)? + r(5)?)?);
        assert_eq!(net.isc()?, Current::dc(2.0));
        Ok(())
    }

    #[test]
    fn test_display_round_trip() -> Result<()> {
        let net = ((vdc(10)? + r("1k")?)? | (l_ic(1, 2)? + c("100n")?))?;
        let text = net.to_string();
        assert_eq!(parse(&text)?, net);
        Ok(())
    }

    #[test]
    fn test_reduced_networks_read_back() -> Result<()> {
        let thevenin = parse("Idc(2) | R(5)")?.thevenin()?;
        assert_eq!(parse(&thevenin.to_string())?, thevenin);

        let s_model = parse("C(1, 10) + R(5)")?.s_model()?;
        let err = parse(&s_model.to_string()).unwrap_err();
        assert!(matches!(err, OnePortError::ParseError { .. }));
        Ok(())
    }

    #[test]
    fn test_default_omega() -> Result<()> {
        assert!(parse("Vac(1)").is_err());
        let options = ParseOptions {
            default_omega: Some(100.0),
        };
        let net = parse_with("Vac(2) + R(1)", &options)?;
        assert_eq!(net.voc()?, Voltage::ac(2.0, 0.0, 100.0));
        // An explicit omega wins.
        let net = parse_with("Vac(2, 0, 50)", &options)?;
        assert_eq!(net.voc()?, Voltage::ac(2.0, 0.0, 50.0));
        Ok(())
    }

    #[test]
    fn test_noise_ids() -> Result<()> {
        let net = parse("Vnoise(1, 7) + Vnoise(1, 7)")?;
        // The same id adds coherently.
        assert!((net.voc()?.asd(1.0) - 2.0).abs() < 1e-12);
        assert!(parse("Vnoise(1, 1.5)").is_err());
        // A fresh id never matches a hand-picked one, so these add in power.
        let net = parse("Vnoise(3) + Vnoise(4, 1)")?;
        assert!((net.voc()?.asd(1.0) - 5.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_topology_errors_surface() {
        let err = parse("Idc(1) + Idc(2)").unwrap_err();
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/nonexistent/net.txt"), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, OnePortError::FileReadError { .. }));
    }
}

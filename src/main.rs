//! Oneport - one-port network calculator
//!
//! Parses a network expression, applies the requested reductions and
//! prints its driving-point quantities.
//!
//! # Usage
//!
//! ```bash
//! oneport --thevenin "Idc(2) | R(5)"
//! oneport --file divider.net --simplify --at 1000
//! ```

use std::fmt::Display;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use oneport::{
    dsl::{self, ParseOptions},
    error::Result,
    OnePort, DEFAULT_TEMPERATURE,
};

/// Symbolic one-port network calculator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network expression, e.g. "Vdc(10) + R(5)"
    #[arg(value_name = "EXPRESSION", required_unless_present = "file")]
    expression: Option<String>,

    /// Read the network expression from a file
    #[arg(short, long, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// Replace crystals and ferrite beads by their equivalent networks
    #[arg(long)]
    expand: bool,

    /// Add thermal noise sources to resistive elements
    #[arg(long)]
    noise_model: bool,

    /// Temperature in kelvin for the noise model
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Replace every element by its s-domain model
    #[arg(long)]
    s_model: bool,

    /// Combine series/parallel elements
    #[arg(long)]
    simplify: bool,

    /// Reduce to a Thevenin equivalent
    #[arg(long, conflicts_with = "norton")]
    thevenin: bool,

    /// Reduce to a Norton equivalent
    #[arg(long)]
    norton: bool,

    /// Angular frequency (rad/s) for Vac/Iac written without one
    #[arg(long)]
    omega: Option<f64>,

    /// Print the impedance at this angular frequency (rad/s)
    #[arg(long, value_name = "RAD_PER_S")]
    at: Option<f64>,
}

fn report<T: Display>(label: &str, value: Result<T>) {
    match value {
        Ok(v) => println!("{:<4} = {}", label, v),
        Err(e) => println!("{:<4} : {}", label, e),
    }
}

fn transform(mut net: OnePort, args: &Args) -> Result<OnePort> {
    if args.expand {
        net = net.expand()?;
    }
    if args.noise_model {
        net = net.noise_model(args.temperature)?;
    }
    if args.s_model {
        net = net.s_model()?;
    }
    if args.simplify {
        net = net.simplify()?;
    }
    if args.thevenin {
        net = net.thevenin()?;
    }
    if args.norton {
        net = net.norton()?;
    }
    Ok(net)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = ParseOptions {
        default_omega: args.omega,
    };
    let net = match &args.file {
        Some(path) => dsl::parse_file(path, &options)?,
        None => dsl::parse_with(args.expression.as_deref().unwrap_or_default(), &options)?,
    };
    info!("parsed {} ({} elements)", net, net.leaf_count());

    let net = transform(net, &args)?;

    println!("{}", net);
    report("Z", net.impedance());
    report("Y", net.admittance());
    report("Voc", net.voc());
    report("Isc", net.isc());
    if let Some(omega) = args.at {
        report(
            "Z(jw)",
            net.impedance().map(|z| {
                let value = z.phasor(omega);
                format!("{} (|Z| = {}, arg = {} rad)", value, value.norm(), value.arg())
            }),
        );
    }
    Ok(())
}

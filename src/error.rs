//! Error types for the one-port network algebra.
//!
//! This module provides a unified error type [`OnePortError`] that covers
//! all fatal conditions raised while building, resolving, simplifying or
//! parsing one-port networks, and a [`Warning`] type for the non-fatal
//! diagnostics that are logged instead.

use thiserror::Error;

/// Result type alias using [`OnePortError`].
pub type Result<T> = std::result::Result<T, OnePortError>;

/// Unified error type for all one-port operations.
#[derive(Error, Debug)]
pub enum OnePortError {
    // ============ Construction Errors ============
    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// Illegal series/parallel topology
    #[error("Invalid network topology: {message}")]
    InvalidTopology { message: String },

    // ============ Resolution Errors ============
    /// None of impedance, admittance, Voc or Isc is defined
    #[error("Impedance, admittance, Voc and Isc are all undefined for '{component}'")]
    Underconstrained { component: String },

    /// Driving-point quantity cannot be determined
    #[error("{quantity} of '{network}' is indeterminate")]
    Indeterminate { quantity: String, network: String },

    // ============ Simplification Errors ============
    /// Conflicting initial conditions
    #[error("Conflicting initial conditions: {message}")]
    Conflict { message: String },

    // ============ Transform Errors ============
    /// Domain transform is not defined for the quantity
    #[error("Transform error: {message}")]
    Transform { message: String },

    // ============ DSL Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    // ============ I/O Errors ============
    /// Error reading a network file
    #[error("Failed to read network file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl OnePortError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid topology error
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an indeterminate quantity error
    pub fn indeterminate(quantity: impl Into<String>, network: impl Into<String>) -> Self {
        Self::Indeterminate {
            quantity: quantity.into(),
            network: network.into(),
        }
    }

    /// Create a transform error
    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// True for errors raised while constructing a component or network.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::InvalidTopology { .. }
        )
    }
}

/// Non-fatal diagnostics. These are logged with `log::warn!` and the
/// operation that raised them carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    /// A component is made electrically irrelevant by an ideal source
    #[error("redundant component {component} in {connection} with {source_kind} {source_name}")]
    Redundant {
        component: String,
        connection: String,
        source_kind: String,
        source_name: String,
    },

    /// Thevenin/Norton reduction fell back to the s-domain
    #[error("superposition of {quantity} with reactive immittance, using s-domain")]
    ReactiveSuperposition { quantity: String },
}

impl Warning {
    /// Emit the warning through the `log` facade.
    pub fn emit(&self) {
        log::warn!("{}", self);
    }
}

//! Source topology checks for series/parallel networks.

use crate::error::{OnePortError, Result, Warning};

use super::{ConnectionKind, OnePort};

/// The ideal source that constrains a connection of this kind, with a
/// description of it.
fn constraining_source(connection: ConnectionKind, member: &OnePort) -> Option<&'static str> {
    match (connection, member.as_leaf()) {
        (ConnectionKind::Series, Some(c)) if c.is_current_source() => Some("current source"),
        (ConnectionKind::Parallel, Some(c)) if c.is_voltage_source() => Some("voltage source"),
        _ => None,
    }
}

/// Validate a network's members.
///
/// Checks:
/// - No two independent current sources in series
/// - No two independent voltage sources in parallel
pub fn check_sources(connection: ConnectionKind, members: &[OnePort]) -> Result<()> {
    let sources: Vec<(&OnePort, &str)> = members
        .iter()
        .filter_map(|m| constraining_source(connection, m).map(|kind| (m, kind)))
        .collect();

    if let [(first, kind), (second, _), ..] = sources.as_slice() {
        return Err(OnePortError::invalid_topology(format!(
            "{}s connected in {}: {} and {}",
            kind,
            connection.name(),
            first,
            second
        )));
    }
    Ok(())
}

/// Every member made redundant by a constraining source in the same
/// connection.
pub fn redundancy_warnings(connection: ConnectionKind, members: &[OnePort]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (n, a) in members.iter().enumerate() {
        for b in &members[n + 1..] {
            let (source, kind, other) = match (
                constraining_source(connection, a),
                constraining_source(connection, b),
            ) {
                (Some(kind), None) => (a, kind, b),
                (None, Some(kind)) => (b, kind, a),
                _ => continue,
            };
            warnings.push(Warning::Redundant {
                component: other.to_string(),
                connection: connection.name().to_string(),
                source_kind: kind.to_string(),
                source_name: source.to_string(),
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorthand::{idc, r, vdc};

    #[test]
    fn test_single_source_is_legal() {
        let members = vec![idc(1).unwrap(), r(5).unwrap()];
        assert!(check_sources(ConnectionKind::Series, &members).is_ok());
    }

    #[test]
    fn test_voltage_sources_in_series_are_legal() {
        let members = vec![vdc(1).unwrap(), vdc(2).unwrap()];
        assert!(check_sources(ConnectionKind::Series, &members).is_ok());
        assert!(check_sources(ConnectionKind::Parallel, &members).is_err());
    }

    #[test]
    fn test_warning_per_redundant_member() {
        let members = vec![r(1).unwrap(), idc(1).unwrap(), r(2).unwrap()];
        let warnings = redundancy_warnings(ConnectionKind::Series, &members);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| matches!(w, Warning::Redundant { .. })));
    }
}

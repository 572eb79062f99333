//! Input validation for flow scheduling problems.
//!
//! Checks structural integrity of flows and ports before scheduling.
//! Detects:
//! - Duplicate IDs
//! - Flows with zero bandwidth, non-positive duration, or negative arrival
//! - Ports with zero capacity
//!
//! Flows wider than every port are not reported: the scheduler drops them
//! with a penalty, which is part of the objective.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Flow, Port};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two flows or two ports share the same ID.
    DuplicateId,
    /// A flow requests no bandwidth.
    ZeroBandwidth,
    /// A flow's duration is zero or negative.
    NonPositiveDuration,
    /// A flow arrives before tick 0.
    NegativeArrival,
    /// A port has no capacity.
    ZeroCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the input data for a scheduling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(flows: &[Flow], ports: &[Port]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut port_ids = HashSet::new();
    for port in ports {
        if !port_ids.insert(port.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate port ID: {}", port.id),
            ));
        }
        if port.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Port {} has zero capacity", port.id),
            ));
        }
    }

    let mut flow_ids = HashSet::new();
    for flow in flows {
        if !flow_ids.insert(flow.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate flow ID: {}", flow.id),
            ));
        }
        if flow.bandwidth == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroBandwidth,
                format!("Flow {} has zero bandwidth", flow.id),
            ));
        }
        if flow.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                format!("Flow {} has duration {}", flow.id, flow.duration),
            ));
        }
        if flow.arrival_time < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                format!("Flow {} arrives at {}", flow.id, flow.arrival_time),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ports() -> Vec<Port> {
        vec![Port::new(0, 10), Port::new(1, 6)]
    }

    fn sample_flows() -> Vec<Flow> {
        vec![Flow::new(0, 5, 0, 3), Flow::new(1, 6, 2, 1)]
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_flows(), &sample_ports()).is_ok());
    }

    #[test]
    fn test_empty_input_is_valid() {
        assert!(validate_input(&[], &[]).is_ok());
    }

    #[test]
    fn test_duplicate_flow_id() {
        let mut flows = sample_flows();
        flows.push(Flow::new(1, 2, 0, 1));
        let errs = validate_input(&flows, &sample_ports()).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ValidationErrorKind::DuplicateId);
        assert!(errs[0].message.contains("flow"));
    }

    #[test]
    fn test_duplicate_port_id() {
        let ports = vec![Port::new(3, 10), Port::new(3, 4)];
        let errs = validate_input(&sample_flows(), &ports).unwrap_err();
        assert_eq!(errs[0].kind, ValidationErrorKind::DuplicateId);
        assert!(errs[0].to_string().contains("port"));
    }

    #[test]
    fn test_bad_flow_fields() {
        let flows = vec![Flow::new(0, 0, 0, 1), Flow::new(1, 1, 0, 0), Flow::new(2, 1, -1, 1)];
        assert_eq!(
            kinds(validate_input(&flows, &sample_ports())),
            vec![
                ValidationErrorKind::ZeroBandwidth,
                ValidationErrorKind::NonPositiveDuration,
                ValidationErrorKind::NegativeArrival,
            ]
        );
    }

    #[test]
    fn test_zero_capacity() {
        let ports = vec![Port::new(0, 0)];
        assert_eq!(
            kinds(validate_input(&[], &ports)),
            vec![ValidationErrorKind::ZeroCapacity]
        );
    }

    #[test]
    fn test_oversized_flow_is_not_an_error() {
        let flows = vec![Flow::new(0, 1000, 0, 1)];
        assert!(validate_input(&flows, &sample_ports()).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let flows = vec![Flow::new(0, 0, 0, 1), Flow::new(0, 1, 0, -2)];
        let ports = vec![Port::new(0, 0), Port::new(0, 5)];
        let errs = validate_input(&flows, &ports).unwrap_err();
        // zero capacity, duplicate port, zero bandwidth, duplicate flow, bad duration
        assert_eq!(errs.len(), 5);
    }
}

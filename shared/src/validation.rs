//! Validation utilities for the greenery report pipeline

use thiserror::Error;

use crate::models::LandCoverageRecord;

/// Allowed deviation of the land total from 100%
pub const COVERAGE_SUM_TOLERANCE: f64 = 1.0;

// Absorbs float noise so that e.g. 33.3 + 33.3 + 33.3 + 1.1 is still in range
const FLOAT_SLACK: f64 = 1e-9;

/// Reasons a coverage record is rejected before downstream stages run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverageValidationError {
    #[error("coverage percentages do not sum to 100±1 (got {total})")]
    SumOutOfTolerance { total: f64 },

    #[error("{field} must be between 0 and 100 (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

// ============================================================================
// Coverage Validations
// ============================================================================

/// Validate that every field is a percentage and that the four land
/// fields sum to 100 ± 1. Water body is excluded from the total.
pub fn validate_coverage(coverage: &LandCoverageRecord) -> Result<(), CoverageValidationError> {
    for (field, value) in coverage.fields() {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(CoverageValidationError::OutOfRange { field, value });
        }
    }

    let total = coverage.land_total();
    if (total - 100.0).abs() > COVERAGE_SUM_TOLERANCE + FLOAT_SLACK {
        return Err(CoverageValidationError::SumOutOfTolerance { total });
    }
    Ok(())
}

use std::collections::BTreeMap;

use thiserror::Error;

/// Utilization ceiling (percent) before a resource is considered exhausted
pub const CAPACITY_CEILING: f64 = 85.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CapacityError {
    #[error("utilization for '{dimension}' must be between 0 and 100, got {value}")]
    OutOfRange { dimension: String, value: f64 },
}

/// Remaining headroom for a single resource dimension
pub fn headroom(used_pct: f64) -> f64 {
    (CAPACITY_CEILING - used_pct).max(0.0)
}

/// Map utilization percentages per dimension to remaining capacity.
///
/// Every value is checked before any arithmetic happens, so a single bad
/// dimension rejects the whole request.
pub fn remaining_capacity(
    utilization: &BTreeMap<String, f64>,
) -> Result<BTreeMap<String, f64>, CapacityError> {
    if let Some((dimension, &value)) = utilization
        .iter()
        .find(|(_, v)| !v.is_finite() || !(0.0..=100.0).contains(*v))
    {
        return Err(CapacityError::OutOfRange {
            dimension: dimension.clone(),
            value,
        });
    }

    Ok(utilization
        .iter()
        .map(|(dimension, &used)| (dimension.clone(), headroom(used)))
        .collect())
}

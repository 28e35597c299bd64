//! Area normalization
//!
//! Every downstream stage works in acres.

use shared_types::AreaUnit;

/// Convert an area in `unit` to acres
pub fn normalize(area: f64, unit: AreaUnit) -> f64 {
    unit.to_acres(area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_acres_pass_through() {
        assert_eq!(normalize(3.5, AreaUnit::Acres), 3.5);
    }

    #[test]
    fn test_square_feet_to_acres() {
        assert_eq!(normalize(43_560.0, AreaUnit::SquareFeet), 1.0);
        assert_eq!(normalize(10_890.0, AreaUnit::SquareFeet), 0.25);
    }

    #[test]
    fn test_metric_units_to_acres() {
        assert_relative_eq!(normalize(1.0, AreaUnit::Hectares), 2.47105);
        assert_relative_eq!(
            normalize(10_000.0, AreaUnit::SquareMeters),
            normalize(1.0, AreaUnit::Hectares),
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_positive_area_stays_positive() {
        for unit in AreaUnit::all() {
            assert!(normalize(0.001, *unit) > 0.0, "{:?}", unit);
        }
    }
}

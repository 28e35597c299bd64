//! Complexity tier and quote band

use shared_types::{ComplexityTier, CostBreakdown, PriceRange};

use crate::pricing::ComplexityBands;

/// Classify a job by how much difficulty and shape add to its field base
pub fn classify(breakdown: &CostBreakdown, bands: &ComplexityBands) -> ComplexityTier {
    let field_base = breakdown.field_base();
    let ratio = if field_base > 0.0 {
        breakdown.field_adjustments() / field_base
    } else {
        0.0
    };

    if ratio >= bands.complex_from {
        ComplexityTier::Complex
    } else if ratio >= bands.moderate_from {
        ComplexityTier::Moderate
    } else {
        ComplexityTier::Standard
    }
}

/// Band around the total that widens with complexity
pub fn price_range(total: f64, tier: ComplexityTier, bands: &ComplexityBands) -> PriceRange {
    let spread = match tier {
        ComplexityTier::Standard => bands.standard_spread,
        ComplexityTier::Moderate => bands.moderate_spread,
        ComplexityTier::Complex => bands.complex_spread,
    };
    PriceRange {
        low: total * (1.0 - spread),
        high: total * (1.0 + spread),
    }
}

//! Cost accumulation
//!
//! The order of the steps below is part of the pricing contract: the rush
//! surcharge only sees field work, and the markers discount sees everything
//! including the rush surcharge.

use shared_types::{CostBreakdown, JobRequest};

use crate::pricing::{PricingConfig, ResearchPricing, ShapePricing, SizeTiers};

/// Price a job whose area has already been normalized to acres
pub fn accumulate(request: &JobRequest, acres: f64, pricing: &PricingConfig) -> CostBreakdown {
    // Base price scaled by property class
    let base = pricing.base_price(request.service_type)
        * pricing.category_multiplier(request.category);

    let size_adjustment = size_adjustment(acres, &pricing.size);
    let field_base = base + size_adjustment;

    // Each difficulty percentage applies to the same field base; they add, never compound
    let terrain_adjustment = field_base * pricing.terrain_surcharge(request.terrain);
    let access_adjustment = field_base * pricing.access_surcharge(request.access);
    let vegetation_adjustment = field_base * pricing.vegetation_surcharge(request.vegetation);

    let shape_adjustment = shape_adjustment(
        request.boundary_segments,
        request.corners,
        &pricing.shape,
    );

    let field_subtotal = field_base
        + terrain_adjustment
        + access_adjustment
        + vegetation_adjustment
        + shape_adjustment;

    let options = &request.options;
    let services = &pricing.services;
    let monumentation = charge_if(
        options.monumentation,
        f64::from(request.corners) * services.monumentation_per_corner,
    );
    let topographic_survey = charge_if(
        options.topographic,
        services.topographic_flat + services.topographic_per_acre * acres,
    );
    let elevation_certificate = charge_if(
        options.elevation_certificate,
        services.elevation_certificate,
    );
    let flood_determination = charge_if(options.flood_determination, services.flood_determination);
    let utility_location = charge_if(options.utility_location, services.utility_location);

    let research = research_cost(
        request.has_prior_survey,
        request.prior_survey_age_years,
        &pricing.research,
    );

    let rush_surcharge = charge_if(request.rush, field_subtotal * pricing.rush_rate);

    let mut breakdown = CostBreakdown {
        base,
        size_adjustment,
        terrain_adjustment,
        access_adjustment,
        vegetation_adjustment,
        shape_adjustment,
        monumentation,
        topographic_survey,
        elevation_certificate,
        flood_determination,
        utility_location,
        research,
        permit: pricing.permit_fee,
        rush_surcharge,
        discount: 0.0,
        total: 0.0,
        cost_per_acre: 0.0,
    };

    let subtotal = breakdown.subtotal();
    breakdown.discount = charge_if(
        request.has_existing_markers,
        subtotal * pricing.marker_discount_rate,
    );
    breakdown.total = subtotal - breakdown.discount;
    breakdown.cost_per_acre = cost_per_acre(breakdown.total, acres);

    breakdown
}

/// Additive size charge from the tier staircase
///
/// Non-decreasing in `acres` for any configuration that passes
/// [`PricingConfig::validate`].
pub fn size_adjustment(acres: f64, tiers: &SizeTiers) -> f64 {
    if acres <= tiers.free_up_to {
        0.0
    } else if acres <= tiers.small_up_to {
        tiers.small_flat
    } else if acres <= tiers.medium_up_to {
        tiers.small_flat + tiers.medium_rate * (acres - tiers.small_up_to)
    } else if acres <= tiers.large_up_to {
        tiers.large_flat + tiers.large_rate * (acres - tiers.medium_up_to)
    } else {
        tiers.estate_flat + tiers.estate_rate * (acres - tiers.large_up_to)
    }
}

/// Surcharge for segments and corners beyond the baseline
pub fn shape_adjustment(segments: u32, corners: u32, shape: &ShapePricing) -> f64 {
    let extra_segments = segments.saturating_sub(shape.baseline);
    let extra_corners = corners.saturating_sub(shape.baseline);
    f64::from(extra_segments) * shape.per_extra_segment
        + f64::from(extra_corners) * shape.per_extra_corner
}

/// Records research fee
///
/// A recent survey is cheapest, a stale one still saves time over having
/// none at all.
pub fn research_cost(has_prior_survey: bool, age_years: f64, research: &ResearchPricing) -> f64 {
    if !has_prior_survey {
        research.no_record_fee
    } else if age_years < research.recent_years {
        research.recent_fee
    } else {
        research.stale_fee
    }
}

fn charge_if(enabled: bool, amount: f64) -> f64 {
    if enabled {
        amount
    } else {
        0.0
    }
}

fn cost_per_acre(total: f64, acres: f64) -> f64 {
    debug_assert!(acres > 0.0, "area must be validated before pricing");
    if acres > 0.0 {
        total / acres
    } else {
        0.0
    }
}

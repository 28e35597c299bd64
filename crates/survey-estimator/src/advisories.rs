//! Advisory notes shown alongside an estimate
//!
//! Rules are independent and evaluated in definition order; every rule that
//! fires contributes its note. The order of the table is the order the
//! client displays, so new rules go where they should appear, not at the end.

use lazy_static::lazy_static;
use shared_types::{CostBreakdown, JobRequest, ServiceType};

use crate::normalize::normalize;
use crate::pricing::PricingConfig;

/// Everything a rule may look at
pub struct AdvisoryContext<'a> {
    pub request: &'a JobRequest,
    pub breakdown: &'a CostBreakdown,
    pub acres: f64,
    pub pricing: &'a PricingConfig,
}

type Predicate = fn(&AdvisoryContext<'_>) -> bool;

struct AdvisoryRule {
    applies: Predicate,
    note: &'static str,
}

lazy_static! {
    static ref ADVISORY_RULES: Vec<AdvisoryRule> = vec![
        AdvisoryRule {
            applies: |ctx| ctx.breakdown.total > ctx.pricing.advisories.high_total,
            note: "This is a high-cost survey. Request written quotes from at least three \
             licensed surveyors before committing.",
        },
        AdvisoryRule {
            applies: |ctx| !ctx.request.has_prior_survey,
            note: "No prior survey is on file. Check the county recorder and property appraiser \
             for existing plats or deeds; finding one can shorten the records search.",
        },
        AdvisoryRule {
            applies: |ctx| {
                ctx.request.has_prior_survey
                    && ctx.request.prior_survey_age_years >= ctx.pricing.research.recent_years
            },
            note: "Your prior survey is outdated, but share it with the surveyor anyway. Old \
             plats still reduce research time.",
        },
        AdvisoryRule {
            applies: |ctx| {
                ctx.request.options.topographic
                    && ctx.pricing.base_price(ctx.request.service_type)
                        < ctx.pricing.base_price(ServiceType::Topographic)
            },
            note: "You are ordering a topographic survey alongside a simpler survey. Ask whether \
             the firm offers a bundled price for both.",
        },
        AdvisoryRule {
            applies: |ctx| ctx.request.terrain.is_severe(),
            note: "Steep terrain makes field time hard to predict. Ask for a not-to-exceed price \
             so the final invoice cannot drift far from the estimate.",
        },
        AdvisoryRule {
            applies: |ctx| ctx.acres > ctx.pricing.advisories.large_area_acres,
            note: "Large parcels are often priced per acre. Ask about volume or per-acre pricing \
             instead of a flat quote.",
        },
        AdvisoryRule {
            applies: |ctx| ctx.request.rush,
            note: "Rush delivery depends on crew availability. Confirm the delivery date in \
             writing before paying the rush surcharge.",
        },
        AdvisoryRule {
            applies: |ctx| ctx.request.has_existing_markers,
            note: "Existing boundary markers were reported. Ask the surveyor to locate and \
             verify them rather than set new ones.",
        },
        AdvisoryRule {
            applies: |_| true,
            note: "Verify the surveyor's state license and professional liability insurance.",
        },
        AdvisoryRule {
            applies: |_| true,
            note: "Ask for references from recent clients with similar parcels.",
        },
        AdvisoryRule {
            applies: |_| true,
            note: "Get the scope, deliverables and delivery date in a written agreement before \
             work begins.",
        },
    ];
}

/// Notes for one estimate, in rule order
pub fn generate_advisories(
    breakdown: &CostBreakdown,
    request: &JobRequest,
    pricing: &PricingConfig,
) -> Vec<String> {
    let ctx = AdvisoryContext {
        request,
        breakdown,
        acres: normalize(request.area, request.area_unit),
        pricing,
    };

    ADVISORY_RULES
        .iter()
        .filter(|rule| (rule.applies)(&ctx))
        .map(|rule| rule.note.to_string())
        .collect()
}

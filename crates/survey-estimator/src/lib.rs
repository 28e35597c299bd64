//! Land survey cost estimation
//!
//! A single [`JobRequest`] flows through four pure stages:
//!
//! 1. [`normalize`] converts the parcel area to acres
//! 2. [`cost`] accumulates the itemized [`CostBreakdown`]
//! 3. [`timeline`] estimates turnaround from the same inputs
//! 4. [`advisories`] evaluates the ordered advisory rules
//!
//! Nothing is cached between calls; an [`Estimator`] only holds its pricing
//! tables and can be shared across threads.

pub mod advisories;
pub mod complexity;
pub mod cost;
pub mod normalize;
pub mod pricing;
pub mod timeline;

use serde::Serialize;
use shared_types::{CostBreakdown, Estimate, JobRequest, ServiceType, ValidationError};
use tracing::debug;

use crate::pricing::PricingConfig;

/// Catalogue entry for one survey type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOffering {
    pub service_type: ServiceType,
    pub label: &'static str,
    pub base_price: f64,
    pub base_days: u32,
}

/// Estimator entry point
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    pricing: PricingConfig,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pricing(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Price, schedule and annotate a job
    ///
    /// Never fails; the request is assumed to have passed
    /// [`JobRequest::validate`]. Use [`Estimator::try_estimate`] for
    /// unchecked input.
    pub fn estimate(&self, request: &JobRequest) -> Estimate {
        let acres = normalize::normalize(request.area, request.area_unit);
        let breakdown = cost::accumulate(request, acres, &self.pricing);
        let complexity = complexity::classify(&breakdown, &self.pricing.complexity);
        let price_range =
            complexity::price_range(breakdown.total, complexity, &self.pricing.complexity);
        let timeline = timeline::estimate_days(
            request.service_type,
            acres,
            request.terrain,
            request.rush,
            &self.pricing.timeline,
        );
        let advisories = advisories::generate_advisories(&breakdown, request, &self.pricing);

        debug!(
            service = ?request.service_type,
            acres,
            total = breakdown.total,
            days = timeline.days,
            advisories = advisories.len(),
            "estimate computed"
        );

        Estimate {
            normalized_area: acres,
            breakdown,
            complexity,
            price_range,
            timeline,
            advisories,
        }
    }

    /// Validate the request, then estimate it
    pub fn try_estimate(&self, request: &JobRequest) -> Result<Estimate, ValidationError> {
        request.validate()?;
        Ok(self.estimate(request))
    }

    /// Only the cost stage, for callers that need the breakdown alone
    pub fn breakdown(&self, request: &JobRequest) -> CostBreakdown {
        let acres = normalize::normalize(request.area, request.area_unit);
        cost::accumulate(request, acres, &self.pricing)
    }

    /// Priced survey types with their base turnaround
    pub fn catalogue(&self) -> Vec<ServiceOffering> {
        ServiceType::all()
            .iter()
            .map(|service| ServiceOffering {
                service_type: *service,
                label: service.label(),
                base_price: self.pricing.base_price(*service),
                base_days: self.pricing.timeline.base_days(*service),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use shared_types::{AreaUnit, ComplexityTier, Vegetation};

    fn boundary_request() -> JobRequest {
        JobRequest {
            vegetation: Vegetation::Light,
            ..JobRequest::default()
        }
    }

    #[test]
    fn test_estimate_boundary_survey() {
        let estimator = Estimator::new();
        let estimate = estimator.estimate(&boundary_request());

        assert_eq!(estimate.normalized_area, 1.0);
        assert_eq!(estimate.breakdown.total, 1407.5);
        assert_eq!(estimate.complexity, ComplexityTier::Standard);
        assert_eq!(estimate.timeline.days, 10);
        assert!(!estimate.timeline.expedited);
        assert_eq!(estimate.advisories.len(), 4);
        assert_relative_eq!(estimate.price_range.low, 1407.5 * 0.9);
        assert_relative_eq!(estimate.price_range.high, 1407.5 * 1.1);
    }

    #[test]
    fn test_rush_estimate() {
        let estimator = Estimator::new();
        let normal = estimator.estimate(&boundary_request());
        let rushed = estimator.estimate(&JobRequest {
            rush: true,
            ..boundary_request()
        });

        assert_eq!(rushed.breakdown.total - normal.breakdown.total, 0.25 * 682.5);
        assert_eq!(rushed.breakdown.research, normal.breakdown.research);
        assert_eq!(rushed.breakdown.permit, normal.breakdown.permit);
        assert_eq!(rushed.timeline.days, normal.timeline.days.div_ceil(2));
        assert!(rushed.timeline.expedited);
    }

    #[test]
    fn test_square_feet_request_matches_acres() {
        let estimator = Estimator::new();
        let in_acres = estimator.estimate(&JobRequest {
            area: 2.0,
            ..boundary_request()
        });
        let in_feet = estimator.estimate(&JobRequest {
            area: 87_120.0,
            area_unit: AreaUnit::SquareFeet,
            ..boundary_request()
        });
        assert_eq!(in_acres.breakdown, in_feet.breakdown);
        assert_eq!(in_acres.timeline, in_feet.timeline);
    }

    #[test]
    fn test_try_estimate_rejects_invalid_input() {
        let estimator = Estimator::new();
        let err = estimator
            .try_estimate(&JobRequest {
                area: 0.0,
                ..JobRequest::default()
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveArea(0.0));

        assert!(estimator.try_estimate(&boundary_request()).is_ok());
    }

    #[test]
    fn test_try_estimate_rejects_area_that_overflows_acres() {
        let estimator = Estimator::new();
        let request = JobRequest {
            area: 1e308,
            area_unit: AreaUnit::Hectares,
            has_existing_markers: true,
            ..JobRequest::default()
        };
        assert!(matches!(
            estimator.try_estimate(&request),
            Err(ValidationError::AreaTooLarge(_))
        ));
    }

    #[test]
    fn test_largest_accepted_area_has_finite_total() {
        let request = JobRequest {
            area: shared_types::MAX_AREA_ACRES,
            has_existing_markers: true,
            rush: true,
            ..JobRequest::default()
        };
        let estimate = Estimator::new().try_estimate(&request).unwrap();
        let breakdown = &estimate.breakdown;
        assert!(breakdown.total.is_finite());
        assert!(breakdown.total >= 0.0);
        assert!(breakdown.discount.is_finite());
        assert!(breakdown.cost_per_acre.is_finite());
    }

    #[test]
    fn test_breakdown_matches_estimate() {
        let estimator = Estimator::new();
        let request = boundary_request();
        assert_eq!(
            estimator.breakdown(&request),
            estimator.estimate(&request).breakdown
        );
    }

    #[test]
    fn test_catalogue_lists_known_services() {
        let catalogue = Estimator::new().catalogue();
        assert_eq!(catalogue.len(), ServiceType::all().len());

        let boundary = catalogue
            .iter()
            .find(|o| o.service_type == ServiceType::Boundary)
            .unwrap();
        assert_eq!(boundary.base_price, 500.0);
        assert_eq!(boundary.base_days, 10);
        assert_eq!(boundary.label, "Boundary Survey");
    }

    #[test]
    fn test_custom_pricing_is_used() {
        let mut pricing = PricingConfig::default();
        pricing.permit_fee = 0.0;
        let estimator = Estimator::with_pricing(pricing);
        assert_eq!(estimator.estimate(&boundary_request()).breakdown.total, 1282.5);
    }
}

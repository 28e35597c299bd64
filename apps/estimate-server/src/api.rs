//! API handlers for the estimate server
//!
//! Provides REST endpoints for:
//! - Single and batch estimates
//! - Service catalogue listing
//! - Pricing table inspection

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared_types::{format_usd, Estimate, JobRequest};
use survey_estimator::{pricing::PricingConfig, ServiceOffering};
use tracing::{debug, info};

use crate::error::ServerError;
use crate::AppState;

/// Largest batch accepted by `POST /api/estimate/batch`
pub const MAX_BATCH_SIZE: usize = 100;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "estimate-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Service catalogue response
#[derive(Serialize)]
pub struct ServiceTypesResponse {
    pub success: bool,
    pub services: Vec<ServiceOffering>,
    pub count: usize,
}

/// Handler: GET /api/service-types
pub async fn handle_list_service_types(
    State(state): State<AppState>,
) -> Json<ServiceTypesResponse> {
    let services = state.estimator.catalogue();
    let count = services.len();

    Json(ServiceTypesResponse {
        success: true,
        services,
        count,
    })
}

/// Active pricing tables
#[derive(Serialize)]
pub struct PricingResponse {
    pub success: bool,
    pub pricing: PricingConfig,
}

/// Handler: GET /api/pricing
pub async fn handle_pricing(State(state): State<AppState>) -> Json<PricingResponse> {
    Json(PricingResponse {
        success: true,
        pricing: state.estimator.pricing().clone(),
    })
}

/// Display strings for the money figures of one estimate
#[derive(Debug, Serialize)]
pub struct FormattedAmounts {
    pub total: String,
    pub low: String,
    pub high: String,
}

impl FormattedAmounts {
    fn of(estimate: &Estimate) -> Self {
        Self {
            total: format_usd(estimate.breakdown.total),
            low: format_usd(estimate.price_range.low),
            high: format_usd(estimate.price_range.high),
        }
    }
}

/// Estimate response
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub success: bool,
    pub estimate: Estimate,
    pub formatted: FormattedAmounts,
}

impl From<Estimate> for EstimateResponse {
    fn from(estimate: Estimate) -> Self {
        Self {
            success: true,
            formatted: FormattedAmounts::of(&estimate),
            estimate,
        }
    }
}

/// Handler: POST /api/estimate
pub async fn handle_estimate(
    State(state): State<AppState>,
    payload: Result<Json<JobRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, ServerError> {
    let Json(request) = payload?;
    info!(
        "Estimate request: service={:?}, area={} {:?}",
        request.service_type, request.area, request.area_unit
    );

    let estimate = state.estimator.try_estimate(&request)?;
    debug!("Estimate total: {}", format_usd(estimate.breakdown.total));

    Ok(Json(estimate.into()))
}

/// Batch estimate request body
#[derive(Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<JobRequest>,
}

/// Batch estimate response
#[derive(Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub estimates: Vec<EstimateResponse>,
    pub count: usize,
}

/// Handler: POST /api/estimate/batch
///
/// Every request is validated before any is priced, so a batch either
/// succeeds whole or reports the first invalid entry.
pub async fn handle_estimate_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ServerError> {
    let Json(batch) = payload?;
    info!("Batch estimate request: {} entries", batch.requests.len());

    if batch.requests.len() > MAX_BATCH_SIZE {
        return Err(ServerError::BatchTooLarge {
            size: batch.requests.len(),
            limit: MAX_BATCH_SIZE,
        });
    }

    for (index, request) in batch.requests.iter().enumerate() {
        request
            .validate()
            .map_err(|source| ServerError::InvalidBatchEntry { index, source })?;
    }

    let estimates: Vec<EstimateResponse> = batch
        .requests
        .iter()
        .map(|request| state.estimator.estimate(request).into())
        .collect();
    let count = estimates.len();

    Ok(Json(BatchResponse {
        success: true,
        estimates,
        count,
    }))
}

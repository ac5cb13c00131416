use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ticket_pricing::{FeeBearer, PricingPolicy, ScheduleRow};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub ticket_price: Decimal,
    pub tickets_sold_so_far: i64,
    /// Parsed separately so an unknown value is a validation error, not a
    /// body rejection.
    pub fee_bearer: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
    pub ticket_price: Decimal,
    pub fee_bearer: String,
}

#[derive(Serialize)]
struct SchedulePayload {
    ticket_price: Decimal,
    fee_bearer: FeeBearer,
    rows: Vec<ScheduleRow>,
}

#[derive(Serialize)]
struct PolicyPayload<'a> {
    policy: &'a PricingPolicy,
    currency_minor_units: u32,
    free_active_event_limit: u32,
}

pub async fn quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let fee_bearer: FeeBearer = request.fee_bearer.parse()?;

    let result = state
        .engine
        .quote(request.ticket_price, request.tickets_sold_so_far, fee_bearer)?;

    tracing::debug!(
        ticket_price = %request.ticket_price,
        sold = request.tickets_sold_so_far,
        %fee_bearer,
        platform_fee = %result.platform_fee,
        "Quoted ticket sale"
    );

    Ok(success(
        result.rounded(state.currency_minor_units),
        "Quote computed",
    ))
}

pub async fn schedule(
    State(state): State<AppState>,
    params: Result<Query<ScheduleParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let fee_bearer: FeeBearer = params.fee_bearer.parse()?;

    let rows = state
        .engine
        .schedule(params.ticket_price, fee_bearer)?
        .iter()
        .map(|row| row.rounded(state.currency_minor_units))
        .collect();

    Ok(success(
        SchedulePayload {
            ticket_price: params.ticket_price,
            fee_bearer,
            rows,
        },
        "Fee schedule computed",
    ))
}

pub async fn policy(State(state): State<AppState>) -> Response {
    success(
        PolicyPayload {
            policy: state.engine.policy(),
            currency_minor_units: state.currency_minor_units,
            free_active_event_limit: state.free_active_event_limit,
        },
        "Active pricing policy",
    )
}

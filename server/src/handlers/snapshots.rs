use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use ticket_pricing::{FeeBearer, PricingInput};
use uuid::Uuid;

use crate::models::{FeeSnapshot, FeeSnapshotView};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct CreateSnapshotRequest {
    pub ticket_id: Uuid,
    pub ticket_price: Decimal,
    pub tickets_sold_so_far: i64,
    pub fee_bearer: String,
}

fn event_id_from(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    let Path(event_id) = path.map_err(|e| AppError::ValidationError(e.body_text()))?;
    Ok(event_id)
}

/// Prices the sale with the live engine and records the breakdown.
pub async fn create(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateSnapshotRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let event_id = event_id_from(path)?;
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let fee_bearer: FeeBearer = request.fee_bearer.parse()?;
    let input = PricingInput::new(
        request.ticket_price,
        request.tickets_sold_so_far,
        fee_bearer,
    )?;
    let result = state.engine.quote_input(&input)?;

    let snapshot =
        FeeSnapshot::insert(&state.db, event_id, request.ticket_id, &input, &result).await?;

    Ok(created(
        snapshot.to_view(state.currency_minor_units)?,
        "Fee snapshot stored",
    ))
}

pub async fn list(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let event_id = event_id_from(path)?;

    let views = FeeSnapshot::list_for_event(&state.db, event_id)
        .await?
        .iter()
        .map(|snapshot| snapshot.to_view(state.currency_minor_units))
        .collect::<Result<Vec<FeeSnapshotView>, AppError>>()?;

    Ok(success(views, "Fee snapshots retrieved"))
}

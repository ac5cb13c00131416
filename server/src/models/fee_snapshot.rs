use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use ticket_pricing::{FeeBearer, PricingInput, PricingResult};
use uuid::Uuid;

use crate::utils::error::AppError;

const LIST_LIMIT: i64 = 500;

/// A fee breakdown captured when a ticket was sold. Dashboards read these
/// instead of recomputing, since the sold count changes after the sale.
#[derive(Debug, Clone, FromRow)]
pub struct FeeSnapshot {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub ticket_price: Decimal,
    pub tickets_sold_so_far: i64,
    pub fee_bearer: String,
    pub base_percentage: Decimal,
    pub volume_adjustment_percentage: Decimal,
    pub final_percentage: Decimal,
    pub platform_fee: Decimal,
    pub buyer_pays: Decimal,
    pub organizer_gets: Decimal,
    pub processor_fee_rate: Decimal,
    pub processor_fee: Decimal,
    pub net_received: Decimal,
    pub platform_profit: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeeSnapshotView {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ticket_id: Uuid,
    pub ticket_price: Decimal,
    pub tickets_sold_so_far: i64,
    pub breakdown: PricingResult,
    pub created_at: DateTime<Utc>,
}

impl FeeSnapshot {
    pub fn breakdown(&self) -> Result<PricingResult, AppError> {
        let fee_bearer: FeeBearer = self.fee_bearer.parse().map_err(|_| {
            AppError::InternalServerError(format!(
                "fee snapshot {} has unknown fee bearer '{}'",
                self.id, self.fee_bearer
            ))
        })?;

        Ok(PricingResult {
            fee_bearer,
            base_percentage: self.base_percentage,
            volume_adjustment_percentage: self.volume_adjustment_percentage,
            final_percentage: self.final_percentage,
            platform_fee: self.platform_fee,
            buyer_pays: self.buyer_pays,
            organizer_gets: self.organizer_gets,
            processor_fee_rate: self.processor_fee_rate,
            processor_fee: self.processor_fee,
            net_received: self.net_received,
            platform_profit: self.platform_profit,
        })
    }

    pub fn to_view(&self, minor_units: u32) -> Result<FeeSnapshotView, AppError> {
        Ok(FeeSnapshotView {
            id: self.id,
            event_id: self.event_id,
            ticket_id: self.ticket_id,
            ticket_price: self.ticket_price,
            tickets_sold_so_far: self.tickets_sold_so_far,
            breakdown: self.breakdown()?.rounded(minor_units),
            created_at: self.created_at,
        })
    }

    pub async fn insert(
        pool: &PgPool,
        event_id: Uuid,
        ticket_id: Uuid,
        input: &PricingInput,
        result: &PricingResult,
    ) -> Result<FeeSnapshot, AppError> {
        let sold = i64::try_from(input.tickets_sold_so_far()).map_err(|_| {
            AppError::ValidationError("tickets sold so far is out of range".to_string())
        })?;

        let snapshot = sqlx::query_as::<_, FeeSnapshot>(
            r#"
            INSERT INTO fee_snapshots (
                id, event_id, ticket_id, ticket_price, tickets_sold_so_far, fee_bearer,
                base_percentage, volume_adjustment_percentage, final_percentage,
                platform_fee, buyer_pays, organizer_gets, processor_fee_rate,
                processor_fee, net_received, platform_profit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(ticket_id)
        .bind(input.ticket_price())
        .bind(sold)
        .bind(result.fee_bearer.as_str())
        .bind(result.base_percentage)
        .bind(result.volume_adjustment_percentage)
        .bind(result.final_percentage)
        .bind(result.platform_fee)
        .bind(result.buyer_pays)
        .bind(result.organizer_gets)
        .bind(result.processor_fee_rate)
        .bind(result.processor_fee)
        .bind(result.net_received)
        .bind(result.platform_profit)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "a fee snapshot already exists for ticket {}",
                ticket_id
            )),
            other => AppError::DatabaseError(other),
        })?;

        tracing::info!(
            snapshot_id = %snapshot.id,
            %event_id,
            %ticket_id,
            platform_fee = %snapshot.platform_fee,
            "Stored fee snapshot"
        );

        Ok(snapshot)
    }

    pub async fn list_for_event(pool: &PgPool, event_id: Uuid) -> Result<Vec<FeeSnapshot>, AppError> {
        let snapshots = sqlx::query_as::<_, FeeSnapshot>(
            r#"
            SELECT * FROM fee_snapshots
            WHERE event_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(event_id)
        .bind(LIST_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use ticket_pricing::quote;

    fn snapshot_from(result: &PricingResult) -> FeeSnapshot {
        FeeSnapshot {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            ticket_id: Uuid::new_v4(),
            ticket_price: dec!(123.45),
            tickets_sold_so_far: 120,
            fee_bearer: result.fee_bearer.to_string(),
            base_percentage: result.base_percentage,
            volume_adjustment_percentage: result.volume_adjustment_percentage,
            final_percentage: result.final_percentage,
            platform_fee: result.platform_fee,
            buyer_pays: result.buyer_pays,
            organizer_gets: result.organizer_gets,
            processor_fee_rate: result.processor_fee_rate,
            processor_fee: result.processor_fee,
            net_received: result.net_received,
            platform_profit: result.platform_profit,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_breakdown_restores_the_stored_quote() {
        let result = quote(dec!(123.45), 120, FeeBearer::OrganizerPays).unwrap();
        let snapshot = snapshot_from(&result);
        assert_eq!(snapshot.breakdown().unwrap(), result);
    }

    #[test]
    fn test_view_rounds_for_presentation() {
        let result = quote(dec!(123.45), 120, FeeBearer::OrganizerPays).unwrap();
        let view = snapshot_from(&result).to_view(2).unwrap();
        assert_eq!(view.breakdown.organizer_gets.to_string(), "109.87");
        assert_eq!(view.breakdown.platform_fee.to_string(), "9.88");
        assert_eq!(view.tickets_sold_so_far, 120);
    }

    #[test]
    fn test_unknown_fee_bearer_is_an_internal_error() {
        let result = quote(dec!(20), 0, FeeBearer::BuyerPays).unwrap();
        let mut snapshot = snapshot_from(&result);
        snapshot.fee_bearer = "platform".to_string();
        assert!(matches!(
            snapshot.breakdown(),
            Err(AppError::InternalServerError(_))
        ));
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::PricingEngine;
use crate::error::PricingError;
use crate::types::{FeeBearer, PricingInput, PricingResult};

/// One volume tier of a fee schedule, priced at the first sale in the tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub from_sold: u64,
    pub to_sold: Option<u64>,
    pub quote: PricingResult,
}

impl ScheduleRow {
    pub fn rounded(&self, minor_units: u32) -> ScheduleRow {
        ScheduleRow {
            quote: self.quote.rounded(minor_units),
            ..self.clone()
        }
    }
}

impl PricingEngine {
    /// Fee schedule for a ticket price across every volume tier, in tier order.
    pub fn schedule(
        &self,
        ticket_price: Decimal,
        fee_bearer: FeeBearer,
    ) -> Result<Vec<ScheduleRow>, PricingError> {
        let brackets = self.policy().volume_brackets();
        let mut rows = Vec::with_capacity(brackets.len());

        for bracket in brackets {
            let sold = i64::try_from(bracket.from_sold).map_err(|_| {
                PricingError::invalid_policy(format!(
                    "volume tier bound {} is out of range",
                    bracket.from_sold
                ))
            })?;
            let input = PricingInput::new(ticket_price, sold, fee_bearer)?;

            rows.push(ScheduleRow {
                from_sold: bracket.from_sold,
                to_sold: bracket.to_sold,
                quote: self.quote_input(&input)?,
            });
        }

        Ok(rows)
    }
}

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Which party absorbs the platform fee at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBearer {
    /// The fee is added on top of the ticket price.
    BuyerPays,
    /// The buyer pays the ticket price only; the fee comes out of the payout.
    OrganizerPays,
}

impl FeeBearer {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeBearer::BuyerPays => "buyer_pays",
            FeeBearer::OrganizerPays => "organizer_pays",
        }
    }
}

impl fmt::Display for FeeBearer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeBearer {
    type Err = PricingError;

    /// Accepts the wire spelling or the variant name, nothing looser.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer_pays" | "BuyerPays" => Ok(FeeBearer::BuyerPays),
            "organizer_pays" | "OrganizerPays" => Ok(FeeBearer::OrganizerPays),
            _ => Err(PricingError::invalid_input(format!(
                "unrecognized fee bearer '{}'",
                s
            ))),
        }
    }
}

/// A validated set of quote inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingInput {
    ticket_price: Decimal,
    tickets_sold_so_far: u64,
    fee_bearer: FeeBearer,
}

impl PricingInput {
    pub fn new(
        ticket_price: Decimal,
        tickets_sold_so_far: i64,
        fee_bearer: FeeBearer,
    ) -> Result<Self, PricingError> {
        if ticket_price <= Decimal::ZERO {
            return Err(PricingError::invalid_input(format!(
                "ticket price must be positive, got {}",
                ticket_price
            )));
        }

        let tickets_sold_so_far = u64::try_from(tickets_sold_so_far).map_err(|_| {
            PricingError::invalid_input(format!(
                "tickets sold so far must not be negative, got {}",
                tickets_sold_so_far
            ))
        })?;

        Ok(Self {
            ticket_price,
            tickets_sold_so_far,
            fee_bearer,
        })
    }

    /// Entry point for callers holding an `f64` price, such as browser form
    /// values. NaN and infinities are rejected along with non-positive values.
    pub fn from_f64(
        ticket_price: f64,
        tickets_sold_so_far: i64,
        fee_bearer: FeeBearer,
    ) -> Result<Self, PricingError> {
        if !ticket_price.is_finite() {
            return Err(PricingError::invalid_input(format!(
                "ticket price must be finite, got {}",
                ticket_price
            )));
        }

        let price = Decimal::from_f64(ticket_price).ok_or_else(|| {
            PricingError::invalid_input(format!(
                "ticket price {} is out of range",
                ticket_price
            ))
        })?;

        Self::new(price, tickets_sold_so_far, fee_bearer)
    }

    pub fn ticket_price(&self) -> Decimal {
        self.ticket_price
    }

    pub fn tickets_sold_so_far(&self) -> u64 {
        self.tickets_sold_so_far
    }

    pub fn fee_bearer(&self) -> FeeBearer {
        self.fee_bearer
    }
}

/// Full settlement breakdown for one ticket sale.
///
/// Monetary fields are kept at full precision; call [`PricingResult::rounded`]
/// only when presenting the figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub fee_bearer: FeeBearer,
    pub base_percentage: Decimal,
    /// Points subtracted from the base rate; negative when a surcharge applies.
    pub volume_adjustment_percentage: Decimal,
    pub final_percentage: Decimal,
    pub platform_fee: Decimal,
    pub buyer_pays: Decimal,
    pub organizer_gets: Decimal,
    pub processor_fee_rate: Decimal,
    pub processor_fee: Decimal,
    pub net_received: Decimal,
    pub platform_profit: Decimal,
}

impl PricingResult {
    /// Rounds every monetary field to `minor_units` decimal places.
    pub fn rounded(&self, minor_units: u32) -> PricingResult {
        let round = |value: Decimal| {
            let mut value =
                value.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero);
            value.rescale(minor_units);
            value
        };

        PricingResult {
            platform_fee: round(self.platform_fee),
            buyer_pays: round(self.buyer_pays),
            organizer_gets: round(self.organizer_gets),
            processor_fee: round(self.processor_fee),
            net_received: round(self.net_received),
            platform_profit: round(self.platform_profit),
            ..self.clone()
        }
    }
}

use rust_decimal::Decimal;

use crate::error::PricingError;
use crate::policy::PricingPolicy;
use crate::types::{FeeBearer, PricingInput, PricingResult};

/// Computes platform fees and settlement breakdowns under one policy.
///
/// Every surface that shows or charges a fee goes through the same engine so
/// the checkout total always matches what the preview pages displayed.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(policy: PricingPolicy) -> Result<Self, PricingError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn quote(
        &self,
        ticket_price: Decimal,
        tickets_sold_so_far: i64,
        fee_bearer: FeeBearer,
    ) -> Result<PricingResult, PricingError> {
        let input = PricingInput::new(ticket_price, tickets_sold_so_far, fee_bearer)?;
        self.quote_input(&input)
    }

    /// Fails only when a figure would exceed the range of `Decimal`, which
    /// a validated input can still reach through a huge price.
    pub fn quote_input(&self, input: &PricingInput) -> Result<PricingResult, PricingError> {
        let policy = &self.policy;
        let price = input.ticket_price();
        let rate = policy.processor_fee_rate;

        let base_percentage = policy.base_percentage_for(price);
        let volume_adjustment_percentage = policy.discount_points_for(input.tickets_sold_so_far());
        let final_percentage = in_range(base_percentage.checked_sub(volume_adjustment_percentage))?
            .max(policy.min_percentage);

        let platform_fee = in_range(
            price
                .checked_mul(final_percentage)
                .and_then(|fee| fee.checked_div(Decimal::ONE_HUNDRED)),
        )?
        .max(policy.min_platform_fee);

        let (buyer_pays, organizer_gets, processor_fee, net_received, platform_profit) =
            match input.fee_bearer() {
                FeeBearer::BuyerPays => {
                    let buyer_pays = in_range(price.checked_add(platform_fee))?;
                    let processor_fee = in_range(buyer_pays.checked_mul(rate))?;
                    let net_received = in_range(buyer_pays.checked_sub(processor_fee))?;
                    // The processor's cut is absorbed against the platform fee.
                    let platform_profit = in_range(
                        platform_fee
                            .checked_mul(rate)
                            .and_then(|cut| platform_fee.checked_sub(cut)),
                    )?;
                    (buyer_pays, price, processor_fee, net_received, platform_profit)
                }
                FeeBearer::OrganizerPays => {
                    let buyer_pays = price;
                    let processor_fee = in_range(buyer_pays.checked_mul(rate))?;
                    let net_received = in_range(buyer_pays.checked_sub(processor_fee))?;
                    let organizer_gets = in_range(net_received.checked_sub(platform_fee))?;
                    (buyer_pays, organizer_gets, processor_fee, net_received, platform_fee)
                }
            };

        tracing::trace!(
            %price,
            sold = input.tickets_sold_so_far(),
            fee_bearer = %input.fee_bearer(),
            %final_percentage,
            %platform_fee,
            "Computed pricing quote"
        );

        Ok(PricingResult {
            fee_bearer: input.fee_bearer(),
            base_percentage,
            volume_adjustment_percentage,
            final_percentage,
            platform_fee,
            buyer_pays,
            organizer_gets,
            processor_fee_rate: rate,
            processor_fee,
            net_received,
            platform_profit,
        })
    }
}

fn in_range(value: Option<Decimal>) -> Result<Decimal, PricingError> {
    value.ok_or_else(|| PricingError::invalid_input("ticket price is out of range"))
}

/// Quotes a ticket sale under the default platform policy.
pub fn quote(
    ticket_price: Decimal,
    tickets_sold_so_far: i64,
    fee_bearer: FeeBearer,
) -> Result<PricingResult, PricingError> {
    PricingEngine::default().quote(ticket_price, tickets_sold_so_far, fee_bearer)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Base rate applied when the ticket price is at or above `min_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub min_price: Decimal,
    pub base_percentage: Decimal,
}

/// Discount (in percentage points) applied while fewer than `sold_below`
/// tickets have been sold. Negative points are a surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeTier {
    pub sold_below: u64,
    pub discount_points: Decimal,
}

/// A contiguous range of sold counts sharing one volume adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBracket {
    pub from_sold: u64,
    /// Exclusive upper bound; `None` for the open-ended last bracket.
    pub to_sold: Option<u64>,
    pub discount_points: Decimal,
}

/// The platform fee policy.
///
/// Tier tables, floors and the processor rate live here instead of in the
/// engine so that alternate policies (per currency, per region, or in tests)
/// can be injected without touching the algorithm. `Default` is the
/// platform's published schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingPolicy {
    /// Ordered from the highest threshold to the lowest.
    pub price_tiers: Vec<PriceTier>,
    /// Base rate for prices below every threshold.
    pub fallback_base_percentage: Decimal,
    /// Ordered from the lowest bound to the highest.
    pub volume_tiers: Vec<VolumeTier>,
    /// Adjustment once the sold count reaches the last bound.
    pub fallback_discount_points: Decimal,
    pub min_percentage: Decimal,
    pub min_platform_fee: Decimal,
    /// Fraction of the gross charged by the payment processor (0.03 = 3%).
    pub processor_fee_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            price_tiers: vec![
                PriceTier {
                    min_price: Decimal::from(500),
                    base_percentage: Decimal::from(5),
                },
                PriceTier {
                    min_price: Decimal::from(100),
                    base_percentage: Decimal::from(8),
                },
                PriceTier {
                    min_price: Decimal::from(50),
                    base_percentage: Decimal::from(10),
                },
            ],
            fallback_base_percentage: Decimal::from(15),
            volume_tiers: vec![
                VolumeTier {
                    sold_below: 50,
                    discount_points: Decimal::from(2),
                },
                VolumeTier {
                    sold_below: 100,
                    discount_points: Decimal::ONE,
                },
                VolumeTier {
                    sold_below: 200,
                    discount_points: Decimal::ZERO,
                },
            ],
            fallback_discount_points: Decimal::NEGATIVE_ONE,
            min_percentage: Decimal::from(3),
            min_platform_fee: Decimal::from(5),
            processor_fee_rate: Decimal::new(3, 2),
        }
    }
}

impl PricingPolicy {
    /// Highest qualifying price tier wins.
    pub fn base_percentage_for(&self, ticket_price: Decimal) -> Decimal {
        self.price_tiers
            .iter()
            .find(|tier| ticket_price >= tier.min_price)
            .map(|tier| tier.base_percentage)
            .unwrap_or(self.fallback_base_percentage)
    }

    /// First volume tier whose bound has not been reached wins.
    pub fn discount_points_for(&self, tickets_sold_so_far: u64) -> Decimal {
        self.volume_tiers
            .iter()
            .find(|tier| tickets_sold_so_far < tier.sold_below)
            .map(|tier| tier.discount_points)
            .unwrap_or(self.fallback_discount_points)
    }

    pub fn volume_brackets(&self) -> Vec<VolumeBracket> {
        let mut brackets = Vec::with_capacity(self.volume_tiers.len() + 1);
        let mut from_sold = 0;

        for tier in &self.volume_tiers {
            brackets.push(VolumeBracket {
                from_sold,
                to_sold: Some(tier.sold_below),
                discount_points: tier.discount_points,
            });
            from_sold = tier.sold_below;
        }

        brackets.push(VolumeBracket {
            from_sold,
            to_sold: None,
            discount_points: self.fallback_discount_points,
        });

        brackets
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        for pair in self.price_tiers.windows(2) {
            if pair[0].min_price <= pair[1].min_price {
                return Err(PricingError::invalid_policy(format!(
                    "price tiers must be strictly descending, found {} before {}",
                    pair[0].min_price, pair[1].min_price
                )));
            }
        }

        for tier in &self.price_tiers {
            if tier.min_price.is_sign_negative() {
                return Err(PricingError::invalid_policy(format!(
                    "price tier threshold {} is negative",
                    tier.min_price
                )));
            }
            if tier.base_percentage.is_sign_negative() {
                return Err(PricingError::invalid_policy(format!(
                    "base percentage {} is negative",
                    tier.base_percentage
                )));
            }
        }

        if self.fallback_base_percentage.is_sign_negative() {
            return Err(PricingError::invalid_policy(
                "fallback base percentage is negative",
            ));
        }

        for pair in self.volume_tiers.windows(2) {
            if pair[0].sold_below >= pair[1].sold_below {
                return Err(PricingError::invalid_policy(format!(
                    "volume tiers must be strictly ascending, found {} before {}",
                    pair[0].sold_below, pair[1].sold_below
                )));
            }
        }

        if self.volume_tiers.first().is_some_and(|tier| tier.sold_below == 0) {
            return Err(PricingError::invalid_policy(
                "first volume tier bound must be greater than zero",
            ));
        }

        if self.min_percentage.is_sign_negative() {
            return Err(PricingError::invalid_policy("minimum percentage is negative"));
        }

        if self.min_platform_fee.is_sign_negative() {
            return Err(PricingError::invalid_policy("minimum platform fee is negative"));
        }

        if self.processor_fee_rate.is_sign_negative() || self.processor_fee_rate >= Decimal::ONE {
            return Err(PricingError::invalid_policy(format!(
                "processor fee rate {} must be within [0, 1)",
                self.processor_fee_rate
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_policy_is_valid() {
        assert_eq!(PricingPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn test_base_percentage_lookup() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.base_percentage_for(dec!(1000)), dec!(5));
        assert_eq!(policy.base_percentage_for(dec!(500)), dec!(5));
        assert_eq!(policy.base_percentage_for(dec!(499.99)), dec!(8));
        assert_eq!(policy.base_percentage_for(dec!(100)), dec!(8));
        assert_eq!(policy.base_percentage_for(dec!(99.99)), dec!(10));
        assert_eq!(policy.base_percentage_for(dec!(50)), dec!(10));
        assert_eq!(policy.base_percentage_for(dec!(49.99)), dec!(15));
        assert_eq!(policy.base_percentage_for(dec!(0.01)), dec!(15));
    }

    #[test]
    fn test_discount_points_lookup() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.discount_points_for(0), dec!(2));
        assert_eq!(policy.discount_points_for(49), dec!(2));
        assert_eq!(policy.discount_points_for(50), dec!(1));
        assert_eq!(policy.discount_points_for(99), dec!(1));
        assert_eq!(policy.discount_points_for(100), dec!(0));
        assert_eq!(policy.discount_points_for(199), dec!(0));
        assert_eq!(policy.discount_points_for(200), dec!(-1));
        assert_eq!(policy.discount_points_for(u64::MAX), dec!(-1));
    }

    #[test]
    fn test_volume_brackets_cover_every_count() {
        let brackets = PricingPolicy::default().volume_brackets();
        assert_eq!(brackets.len(), 4);
        assert_eq!(brackets[0].from_sold, 0);
        assert_eq!(brackets[0].to_sold, Some(50));
        assert_eq!(brackets[1].from_sold, 50);
        assert_eq!(brackets[2].to_sold, Some(200));
        assert_eq!(brackets[3].from_sold, 200);
        assert_eq!(brackets[3].to_sold, None);
        assert_eq!(brackets[3].discount_points, dec!(-1));
    }

    #[test]
    fn test_validate_rejects_unordered_price_tiers() {
        let mut policy = PricingPolicy::default();
        policy.price_tiers.swap(0, 1);
        assert!(matches!(
            policy.validate(),
            Err(PricingError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unordered_volume_tiers() {
        let mut policy = PricingPolicy::default();
        policy.volume_tiers[1].sold_below = 50;
        assert!(matches!(
            policy.validate(),
            Err(PricingError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_validate_rejects_processor_rate_out_of_range() {
        let mut policy = PricingPolicy::default();
        policy.processor_fee_rate = dec!(1);
        assert!(policy.validate().is_err());

        policy.processor_fee_rate = dec!(-0.01);
        assert!(policy.validate().is_err());

        policy.processor_fee_rate = Decimal::ZERO;
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_floors() {
        let mut policy = PricingPolicy::default();
        policy.min_platform_fee = dec!(-5);
        assert!(policy.validate().is_err());

        let mut policy = PricingPolicy::default();
        policy.min_percentage = dec!(-1);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_policy_deserializes_from_json() {
        let json = r#"{
            "price_tiers": [{ "min_price": "200", "base_percentage": "6" }],
            "fallback_base_percentage": "12",
            "volume_tiers": [{ "sold_below": 10, "discount_points": "1" }],
            "fallback_discount_points": "0",
            "min_percentage": "2",
            "min_platform_fee": "1.5",
            "processor_fee_rate": "0.025"
        }"#;

        let policy: PricingPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.validate(), Ok(()));
        assert_eq!(policy.base_percentage_for(dec!(250)), dec!(6));
        assert_eq!(policy.base_percentage_for(dec!(20)), dec!(12));
        assert_eq!(policy.min_platform_fee, dec!(1.5));
        assert_eq!(policy.processor_fee_rate, dec!(0.025));
    }

    #[test]
    fn test_policy_rejects_unknown_fields() {
        let json = r#"{ "surprise": true }"#;
        assert!(serde_json::from_str::<PricingPolicy>(json).is_err());
    }
}

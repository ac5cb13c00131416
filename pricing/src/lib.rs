//! Platform fee pricing for paid event tickets.
//!
//! A quote takes the ticket price, the number of tickets already sold for the
//! event and the fee bearer, and returns the full settlement breakdown:
//!
//! 1. base rate from the ticket price tier,
//! 2. volume adjustment from the sold count,
//! 3. percentage floor,
//! 4. per-ticket minimum fee,
//! 5. buyer-pays or organizer-pays split, net of the processor fee.
//!
//! All figures keep full decimal precision; round with
//! [`PricingResult::rounded`] when presenting them.
//!
//! Prices normally arrive as [`rust_decimal::Decimal`]. Callers that only
//! have an `f64` (form fields, spreadsheets) go through
//! [`PricingInput::from_f64`], which rejects NaN and infinities, and then
//! [`PricingEngine::quote_input`]. A price so large that a derived figure
//! would leave the `Decimal` range is rejected as invalid input.

pub mod engine;
pub mod error;
pub mod policy;
pub mod schedule;
pub mod types;

pub use engine::{quote, PricingEngine};
pub use error::PricingError;
pub use policy::{PriceTier, PricingPolicy, VolumeBracket, VolumeTier};
pub use schedule::ScheduleRow;
pub use types::{FeeBearer, PricingInput, PricingResult};

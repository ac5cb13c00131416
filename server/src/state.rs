use std::sync::Arc;

use sqlx::PgPool;
use ticket_pricing::PricingEngine;

use crate::config::Config;
use crate::utils::error::AppError;

/// Shared by every handler. The engine is the only place fees are computed.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
    pub db: PgPool,
    pub currency_minor_units: u32,
    pub free_active_event_limit: u32,
}

impl AppState {
    pub fn new(config: &Config, db: PgPool) -> Result<Self, AppError> {
        let engine = PricingEngine::new(config.pricing_policy.clone())?;

        Ok(Self {
            engine: Arc::new(engine),
            db,
            currency_minor_units: config.currency_minor_units,
            free_active_event_limit: config.free_active_event_limit,
        })
    }
}

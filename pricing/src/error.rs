use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(String),
}

impl PricingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(reason = %message, "Rejected pricing input");
        PricingError::InvalidInput(message)
    }

    pub fn invalid_policy(message: impl Into<String>) -> Self {
        PricingError::InvalidPolicy(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            PricingError::InvalidInput(_) => "INVALID_INPUT",
            PricingError::InvalidPolicy(_) => "INVALID_POLICY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_reason() {
        let err = PricingError::invalid_input("ticket price must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input: ticket price must be positive"
        );
        assert_eq!(err.code(), "INVALID_INPUT");

        let err = PricingError::invalid_policy("no volume tiers");
        assert_eq!(err.code(), "INVALID_POLICY");
    }
}

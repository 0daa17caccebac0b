//! Rate Service
//!
//! Exchange-rate lookups: live figure from the agent when available, mock
//! table otherwise.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{mock_rate, ExchangeRate, RateError};
use crate::ports::AgentPort;

/// Result of converting an amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub amount: Decimal,
    pub converted: Decimal,
    #[serde(flatten)]
    pub rate: ExchangeRate,
}

pub struct RateService<A> {
    agent: Option<A>,
}

impl<A: AgentPort> RateService<A> {
    pub fn new(agent: Option<A>) -> Self {
        Self { agent }
    }

    /// Rate for a pair; agent failures fall back to the mock table
    pub async fn rate(&self, from: &str, to: &str) -> Result<ExchangeRate, RateError> {
        if let Some(ref agent) = self.agent {
            match agent.exchange_rate(from, to).await {
                Ok(rate) => return Ok(rate),
                Err(e) => {
                    tracing::warn!("Exchange rate from agent failed, using mock rates: {}", e);
                }
            }
        }
        mock_rate(from, to)
    }

    pub async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Conversion, RateError> {
        if amount <= Decimal::ZERO {
            return Err(RateError::NonPositiveAmount(amount));
        }
        let rate = self.rate(from, to).await?;
        let converted = rate.convert(amount)?;
        Ok(Conversion {
            amount,
            converted,
            rate,
        })
    }
}

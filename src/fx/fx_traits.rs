use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Rate converting one unit of `from` into `to`. Identical codes
    /// yield exactly one.
    async fn get_rate(&self, from: &str, to: &str) -> Result<Decimal>;

    async fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal>;
}

//! Price data access port trait.

use crate::domain::error::SignalbenchError;
use crate::domain::price::PricePoint;

pub trait DataPort {
    /// Full daily history for `symbol`, ascending by date and densely indexed.
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, SignalbenchError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError>;
}

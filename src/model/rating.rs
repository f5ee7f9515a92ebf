use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{FieldErrorReason, FieldValidationError};
use crate::constant::hard_limit;

const RATING_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum RatingModelError {
    InvalidSample(FieldValidationError),
    CountOverflow(u32),
}

/// Running mean of every rating sample contributed to a shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopRatingModel {
    pub count: u32,
    pub avg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopModel {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub rating: ShopRatingModel,
}

impl Default for ShopRatingModel {
    fn default() -> Self {
        Self {
            count: 0,
            avg: Decimal::ZERO,
        }
    }
}

impl ShopRatingModel {
    pub fn new(count: u32, avg: Decimal) -> Self {
        Self { count, avg }
    }

    /// O(1) streaming update, historical reviews are never re-read.
    /// The rounding drift is bounded by the 2-decimal scale.
    pub fn aggregate(&mut self, sample: u8) -> Result<(), RatingModelError> {
        let (lo, hi) = (hard_limit::MIN_RATING, hard_limit::MAX_RATING);
        if sample < lo || sample > hi {
            let reason = FieldErrorReason::OutOfRange(lo as i64, hi as i64);
            let e = FieldValidationError::new("rating", reason);
            return Err(RatingModelError::InvalidSample(e));
        }
        let new_count = self
            .count
            .checked_add(1)
            .ok_or(RatingModelError::CountOverflow(self.count))?;
        let sum = self.avg * Decimal::from(self.count) + Decimal::from(sample);
        let avg = sum / Decimal::from(new_count);
        self.avg = avg.round_dp_with_strategy(RATING_SCALE, RoundingStrategy::MidpointAwayFromZero);
        self.count = new_count;
        Ok(())
    }
}

impl ShopModel {
    pub fn new(id: &str, owner_id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            rating: ShopRatingModel::default(),
        }
    }
}

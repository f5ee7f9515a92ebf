use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum ListingModelError {
    // the seller is not eligible for bank-transfer payment at the moment
    BankTransferNotEligible(String),
    ReviewExists(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingReviewModel {
    pub order_id: String,
    pub buyer_id: String,
    pub rating: u8,
    pub text: String,
    pub create_time: DateTime<Utc>,
}

pub enum ListingUpdateArgs {
    BankTransfer { enable: bool, seller_eligible: bool },
    AppendReview(ListingReviewModel),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingModel {
    pub id: String,
    pub seller_id: String,
    pub shop_id: String,
    pub title: String,
    pub unit_price: Decimal,
    pub shipping_cost: Decimal,
    pub active: bool,
    pub bank_transfer: bool,
    pub reviews: Vec<ListingReviewModel>,
}

impl ListingModel {
    pub fn update(&mut self, args: ListingUpdateArgs) -> Result<(), ListingModelError> {
        match args {
            ListingUpdateArgs::BankTransfer {
                enable,
                seller_eligible,
            } => self.set_bank_transfer(enable, seller_eligible),
            ListingUpdateArgs::AppendReview(item) => self.append_review(item),
        }
    }

    pub fn offers_bank_transfer(&self) -> bool {
        self.active && self.bank_transfer
    }

    pub fn set_bank_transfer(
        &mut self,
        enable: bool,
        seller_eligible: bool,
    ) -> Result<(), ListingModelError> {
        if enable && !seller_eligible {
            Err(ListingModelError::BankTransferNotEligible(
                self.seller_id.clone(),
            ))
        } else {
            self.bank_transfer = enable;
            Ok(())
        }
    }

    // at most one review per order is kept in the listing
    pub fn append_review(&mut self, item: ListingReviewModel) -> Result<(), ListingModelError> {
        if self.reviews.iter().any(|r| r.order_id == item.order_id) {
            Err(ListingModelError::ReviewExists(item.order_id))
        } else {
            self.reviews.push(item);
            Ok(())
        }
    }
}

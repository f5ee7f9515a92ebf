mod bank_account;
mod listing;
mod order;
mod rating;
mod report;
mod verification;

use std::fmt::Display;

pub use bank_account::{
    BankAccountFields, BankAccountModel, BankAccountModelError, BankAccountSetModel,
    BankAccountUpdateArgs,
};
pub use listing::{ListingModel, ListingModelError, ListingReviewModel, ListingUpdateArgs};
pub use order::{
    OrderActorRole, OrderCreateArgs, OrderModel, OrderModelError, OrderOperation,
    OrderPartyRole, OrderStatus, OrderTransitionReq, OrderUpdateArgs, PaymentMethod,
    PaymentSlipModel, ReviewModel, TransitionRejectReason,
};
pub use rating::{RatingModelError, ShopModel, ShopRatingModel};
pub use report::{BuyerReportModel, BuyerReportModelError, BuyerReportStatus};
pub use verification::{
    SellerVerificationModel, SellerVerifyStatus, VerificationModelError, VerificationSubmitArgs,
    VerificationUpdateArgs, VerifyDocumentLabel,
};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorReason {
    Empty,
    TooShort(usize),
    TooLong(usize),
    OutOfRange(i64, i64),
    InvalidFormat,
    // rejected for the current verification status of the seller
    NotEligible,
    // sellers cannot order from their own listings
    OwnListing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub reason: FieldErrorReason,
}

impl FieldValidationError {
    pub(crate) fn new(field: &str, reason: FieldErrorReason) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }

    // non-blank text with optional maximum number of characters
    pub(crate) fn check_text(field: &str, value: &str, max_chars: Option<usize>) -> Option<Self> {
        let nchars = value.trim().chars().count();
        if nchars == 0 {
            Some(Self::new(field, FieldErrorReason::Empty))
        } else if let Some(mx) = max_chars.filter(|mx| nchars > *mx) {
            Some(Self::new(field, FieldErrorReason::TooLong(mx)))
        } else {
            None
        }
    }
}

impl Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            FieldErrorReason::Empty => write!(f, "{} is required", self.field),
            FieldErrorReason::TooShort(n) => {
                write!(f, "{} needs at least {} characters", self.field, n)
            }
            FieldErrorReason::TooLong(n) => {
                write!(f, "{} allows at most {} characters", self.field, n)
            }
            FieldErrorReason::OutOfRange(lo, hi) => {
                write!(f, "{} must be between {} and {}", self.field, lo, hi)
            }
            FieldErrorReason::InvalidFormat => write!(f, "{} has invalid format", self.field),
            FieldErrorReason::OwnListing => {
                write!(f, "{} refers to a listing of your own shop", self.field)
            }
            FieldErrorReason::NotEligible => {
                write!(f, "{} requires a completed seller verification", self.field)
            }
        }
    }
}

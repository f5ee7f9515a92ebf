use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldErrorReason, FieldValidationError};
use crate::constant::hard_limit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuyerReportModelError {
    Validation(Vec<FieldValidationError>),
}

/// A seller's complaint against the buyer of one order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerReportModel {
    pub id: String,
    pub order_id: String,
    pub seller_id: String,
    pub buyer_id: String,
    pub complaint: String,
    pub status: BuyerReportStatus,
    pub create_time: DateTime<Utc>,
}

impl BuyerReportModel {
    pub fn try_new(
        id: String,
        order_id: &str,
        seller_id: &str,
        buyer_id: &str,
        complaint: &str,
        time: DateTime<Utc>,
    ) -> Result<Self, BuyerReportModelError> {
        let complaint = complaint.trim();
        let nchars = complaint.chars().count();
        let reason = if nchars == 0 {
            Some(FieldErrorReason::Empty)
        } else if nchars < hard_limit::MIN_COMPLAINT_CHARS {
            Some(FieldErrorReason::TooShort(hard_limit::MIN_COMPLAINT_CHARS))
        } else if nchars > hard_limit::MAX_COMPLAINT_CHARS {
            Some(FieldErrorReason::TooLong(hard_limit::MAX_COMPLAINT_CHARS))
        } else {
            None
        };
        if let Some(r) = reason {
            let e = FieldValidationError::new("complaint", r);
            return Err(BuyerReportModelError::Validation(vec![e]));
        }
        Ok(Self {
            id,
            order_id: order_id.to_string(),
            seller_id: seller_id.to_string(),
            buyer_id: buyer_id.to_string(),
            complaint: complaint.to_string(),
            status: BuyerReportStatus::Pending,
            create_time: time,
        })
    }
}

mod bank_account;
mod buyer_report;
mod create_order;
mod listing;
mod order_query;
mod order_transition;
mod submit_review;
mod verification;

use std::fmt::Display;

pub use bank_account::BankAccountUseCase;
pub use buyer_report::FileBuyerReportUseCase;
pub use create_order::CreateOrderUseCase;
pub use listing::ListingPaymentUseCase;
pub use order_query::OrderQueryUseCase;
pub use order_transition::OrderTransitionUseCase;
pub use submit_review::{SubmitReviewResult, SubmitReviewUseCase};
pub use verification::SellerVerificationUseCase;

use crate::adapter::repository::{AppRepoError, AppRepoErrorDetail};
use crate::adapter::storage::AppObjStorageError;
use crate::api::dto::{BlockingListingDto, ErrorRespDto};
use crate::model::{
    BankAccountModelError, BuyerReportModelError, FieldErrorReason, FieldValidationError, ListingModelError,
    OrderModelError, RatingModelError, TransitionRejectReason, VerificationModelError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkflowEntity {
    Order,
    Shop,
    Listing,
    BankAccount,
    Verification,
}

#[derive(Debug)]
pub enum WorkflowUcError {
    NotFound {
        entity: WorkflowEntity,
        id: String,
    },
    Unauthorized {
        entity: WorkflowEntity,
        id: String,
    },
    InvalidTransition {
        entity: WorkflowEntity,
        id: String,
        op: String,
        curr: String,
        reason: TransitionRejectReason,
    },
    Validation(Vec<FieldValidationError>),
    BankAccountInUse {
        account_id: String,
        listings: Vec<BlockingListingDto>,
        num_remaining: usize,
    },
    DuplicateReport {
        order_id: String,
        seller_id: String,
    },
    ObjectStorage(AppObjStorageError),
    DataStore(AppRepoError),
}

impl WorkflowEntity {
    fn label(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Shop => "shop",
            Self::Listing => "listing",
            Self::BankAccount => "bank account",
            Self::Verification => "seller verification",
        }
    }
}

impl WorkflowUcError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { entity: _, id: _ } => "NotFound",
            Self::Unauthorized { entity: _, id: _ } => "Unauthorized",
            Self::InvalidTransition { .. } => "InvalidTransition",
            Self::Validation(_) => "ValidationError",
            Self::BankAccountInUse { .. } => "BankAccountInUse",
            Self::DuplicateReport { .. } => "DuplicateReport",
            Self::ObjectStorage(_) | Self::DataStore(_) => "Internal",
        }
    }

    fn single_field(field: &str, reason: FieldErrorReason) -> Self {
        Self::Validation(vec![FieldValidationError::new(field, reason)])
    }
} // end of impl WorkflowUcError

impl Display for WorkflowUcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{} {} not found", entity.label(), id),
            Self::Unauthorized { entity, id: _ } => {
                write!(f, "you are not allowed to perform this action on the {}", entity.label())
            }
            Self::InvalidTransition {
                entity,
                id: _,
                op,
                curr,
                reason,
            } => match reason {
                TransitionRejectReason::PaymentProofRequired => {
                    write!(f, "upload the payment slip before {op}")
                }
                TransitionRejectReason::ReviewAlreadySubmitted => {
                    write!(f, "a review has already been submitted for this {}", entity.label())
                }
                TransitionRejectReason::NotAllowedFrom => {
                    write!(f, "{op} is not allowed while the {} is {curr}", entity.label())
                }
            },
            Self::Validation(errors) => {
                let msgs = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>();
                write!(f, "{}", msgs.join("; "))
            }
            Self::BankAccountInUse {
                account_id: _,
                listings,
                num_remaining,
            } => {
                let titles = listings
                    .iter()
                    .map(|l| l.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "disable bank transfer on these listings first: {titles}")?;
                if *num_remaining > 0 {
                    write!(f, " (and {num_remaining} more)")?;
                }
                Ok(())
            }
            Self::DuplicateReport {
                order_id,
                seller_id: _,
            } => write!(f, "you have already reported the buyer of order {order_id}"),
            Self::ObjectStorage(_) | Self::DataStore(_) => {
                f.write_str("operation failed, please try again later")
            }
        }
    }
}

impl From<OrderModelError> for WorkflowUcError {
    fn from(value: OrderModelError) -> Self {
        let entity = WorkflowEntity::Order;
        match value {
            OrderModelError::Unauthorized { oid, usr_id: _ } => Self::Unauthorized { entity, id: oid },
            // a party calling the operation of the other party is rejected the same way
            OrderModelError::RoleMismatch {
                oid,
                op: _,
                expect: _,
            } => Self::Unauthorized { entity, id: oid },
            OrderModelError::InvalidTransition {
                oid,
                op,
                curr,
                reason,
            } => Self::InvalidTransition {
                entity,
                id: oid,
                op: op.to_string(),
                curr: curr.label().to_string(),
                reason,
            },
            OrderModelError::Validation(errors) => Self::Validation(errors),
        }
    }
}

impl From<VerificationModelError> for WorkflowUcError {
    fn from(value: VerificationModelError) -> Self {
        match value {
            VerificationModelError::InvalidTransition { usr_id, curr } => {
                Self::InvalidTransition {
                    entity: WorkflowEntity::Verification,
                    id: usr_id,
                    op: "submit".to_string(),
                    curr: curr.label().to_string(),
                    reason: TransitionRejectReason::NotAllowedFrom,
                }
            }
            VerificationModelError::Validation(errors) => Self::Validation(errors),
        }
    }
}

impl From<BankAccountModelError> for WorkflowUcError {
    fn from(value: BankAccountModelError) -> Self {
        match value {
            BankAccountModelError::NotFound(id) => Self::NotFound {
                entity: WorkflowEntity::BankAccount,
                id,
            },
            BankAccountModelError::LimitExceeded(n) => {
                Self::single_field("bank_accounts", FieldErrorReason::TooLong(n))
            }
            BankAccountModelError::Validation(errors) => Self::Validation(errors),
        }
    }
}

impl From<ListingModelError> for WorkflowUcError {
    fn from(value: ListingModelError) -> Self {
        match value {
            ListingModelError::BankTransferNotEligible(_seller_id) => {
                Self::single_field("bank_transfer", FieldErrorReason::NotEligible)
            }
            ListingModelError::ReviewExists(oid) => Self::InvalidTransition {
                entity: WorkflowEntity::Listing,
                id: oid,
                op: "append-review".to_string(),
                curr: "reviewed".to_string(),
                reason: TransitionRejectReason::ReviewAlreadySubmitted,
            },
        }
    }
}

impl From<BuyerReportModelError> for WorkflowUcError {
    fn from(value: BuyerReportModelError) -> Self {
        let BuyerReportModelError::Validation(errors) = value;
        Self::Validation(errors)
    }
}

impl From<AppRepoError> for WorkflowUcError {
    fn from(value: AppRepoError) -> Self {
        let AppRepoError {
            fn_label,
            code,
            detail,
        } = value;
        match detail {
            AppRepoErrorDetail::Order(e) => Self::from(e),
            AppRepoErrorDetail::Verification(e) => Self::from(e),
            AppRepoErrorDetail::BankAccount(e) => Self::from(e),
            AppRepoErrorDetail::Listing(e) => Self::from(e),
            AppRepoErrorDetail::Rating(RatingModelError::InvalidSample(e)) => {
                Self::Validation(vec![e])
            }
            detail => Self::DataStore(AppRepoError {
                fn_label,
                code,
                detail,
            }),
        }
    }
}

impl From<AppObjStorageError> for WorkflowUcError {
    fn from(value: AppObjStorageError) -> Self {
        Self::ObjectStorage(value)
    }
}

impl From<&WorkflowUcError> for ErrorRespDto {
    fn from(value: &WorkflowUcError) -> Self {
        Self {
            kind: value.kind().to_string(),
            message: value.to_string(),
        }
    }
}

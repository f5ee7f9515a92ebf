use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FieldErrorReason, FieldValidationError};
use crate::auth::AppAuthedClaim;
use crate::constant::hard_limit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Received,
    // reserved, no operation in this crate moves an order to this state
    Cancelled,
    RefundRequested,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    CashOnDelivery,
    BankTransfer,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderActorRole {
    Buyer,
    Seller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOperation {
    UploadPaymentSlip,
    MarkShipped,
    MarkReceived,
    RequestRefund,
    ApproveRefund,
    CancelRefund,
    SubmitReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejectReason {
    NotAllowedFrom,
    PaymentProofRequired,
    ReviewAlreadySubmitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderPartyRole {
    pub is_buyer: bool,
    pub is_seller: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderModelError {
    Unauthorized {
        oid: String,
        usr_id: String,
    },
    // the caller is a party of the order, but not the one driving the operation
    RoleMismatch {
        oid: String,
        op: OrderOperation,
        expect: OrderActorRole,
    },
    InvalidTransition {
        oid: String,
        op: OrderOperation,
        curr: OrderStatus,
        reason: TransitionRejectReason,
    },
    Validation(Vec<FieldValidationError>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSlipModel {
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewModel {
    pub rating: u8,
    pub text: String,
    pub create_time: DateTime<Utc>,
}

pub enum OrderTransitionReq {
    UploadPaymentSlip { url: String },
    MarkShipped,
    MarkReceived,
    RequestRefund,
    ApproveRefund,
    CancelRefund,
    SubmitReview { rating: u8, text: String },
}

pub struct OrderUpdateArgs {
    pub actor: AppAuthedClaim,
    pub req: OrderTransitionReq,
    pub time: DateTime<Utc>,
}

pub struct OrderCreateArgs {
    pub buyer_id: String,
    pub buyer_email: String,
    pub seller_id: String,
    pub shop_id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub shipping_cost: Decimal,
    pub pay_method: PaymentMethod,
    pub custom_order_id: Option<String>,
    pub time: DateTime<Utc>,
}

/// One purchase of one line item. Fields are only mutated through
/// [`OrderModel::apply`], which validates the caller and the transition
/// against the state read at the start of the update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderModel {
    id: String,
    buyer_id: String,
    buyer_email: String,
    seller_id: String,
    shop_id: String,
    item_id: String,
    item_name: String,
    unit_price: Decimal,
    quantity: u32,
    shipping_cost: Decimal,
    total: Decimal,
    pay_method: PaymentMethod,
    payment_slip: Option<PaymentSlipModel>,
    status: OrderStatus,
    review: Option<ReviewModel>,
    custom_order_id: Option<String>,
    create_time: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Cancelled | Self::Refunded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Received => "RECEIVED",
            Self::Cancelled => "CANCELLED",
            Self::RefundRequested => "REFUND_REQUESTED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn initial(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::BankTransfer => Self::PendingPayment,
            PaymentMethod::CashOnDelivery | PaymentMethod::Online => Self::Pending,
        }
    }
}

impl OrderOperation {
    pub fn actor(&self) -> OrderActorRole {
        match self {
            Self::UploadPaymentSlip
            | Self::MarkReceived
            | Self::RequestRefund
            | Self::SubmitReview => OrderActorRole::Buyer,
            Self::MarkShipped | Self::ApproveRefund | Self::CancelRefund => {
                OrderActorRole::Seller
            }
        }
    }

    /// Transition table of an order. `has_review` only matters to review
    /// submission, which never changes the status.
    pub fn next_status(
        &self,
        curr: OrderStatus,
        has_review: bool,
    ) -> Result<OrderStatus, TransitionRejectReason> {
        use OrderStatus as S;
        let to = match (self, curr) {
            (Self::UploadPaymentSlip, S::PendingPayment) => Some(S::Pending),
            (Self::MarkShipped, S::PendingPayment) => {
                return Err(TransitionRejectReason::PaymentProofRequired);
            }
            (Self::MarkShipped, S::Pending | S::Confirmed) => Some(S::Shipped),
            (Self::MarkReceived, c) if !c.is_terminal() && c != S::RefundRequested => {
                Some(S::Received)
            }
            (Self::RequestRefund, c)
                if !matches!(c, S::Cancelled | S::Received | S::RefundRequested | S::Refunded) =>
            {
                Some(S::RefundRequested)
            }
            (Self::ApproveRefund, S::RefundRequested) => Some(S::Refunded),
            (Self::CancelRefund, c) if !c.is_terminal() => Some(S::Refunded),
            (Self::SubmitReview, S::Cancelled) => None,
            (Self::SubmitReview, S::PendingPayment) => {
                return Err(TransitionRejectReason::PaymentProofRequired);
            }
            (Self::SubmitReview, c) => {
                if has_review {
                    return Err(TransitionRejectReason::ReviewAlreadySubmitted);
                }
                Some(c)
            }
            _others => None,
        };
        to.ok_or(TransitionRejectReason::NotAllowedFrom)
    } // end of fn next_status
} // end of impl OrderOperation

impl Display for OrderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::UploadPaymentSlip => "upload-payment-slip",
            Self::MarkShipped => "mark-shipped",
            Self::MarkReceived => "mark-received",
            Self::RequestRefund => "request-refund",
            Self::ApproveRefund => "approve-refund",
            Self::CancelRefund => "cancel-and-refund",
            Self::SubmitReview => "submit-review",
        };
        f.write_str(label)
    }
}

impl OrderPartyRole {
    pub fn is_party(&self) -> bool {
        self.is_buyer || self.is_seller
    }
    pub fn can_act(&self, role: OrderActorRole) -> bool {
        match role {
            OrderActorRole::Buyer => self.is_buyer,
            OrderActorRole::Seller => self.is_seller,
        }
    }
}

impl OrderTransitionReq {
    pub fn operation(&self) -> OrderOperation {
        match self {
            Self::UploadPaymentSlip { url: _ } => OrderOperation::UploadPaymentSlip,
            Self::MarkShipped => OrderOperation::MarkShipped,
            Self::MarkReceived => OrderOperation::MarkReceived,
            Self::RequestRefund => OrderOperation::RequestRefund,
            Self::ApproveRefund => OrderOperation::ApproveRefund,
            Self::CancelRefund => OrderOperation::CancelRefund,
            Self::SubmitReview { rating: _, text: _ } => OrderOperation::SubmitReview,
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldValidationError>> {
        let mut errors = Vec::new();
        match self {
            Self::UploadPaymentSlip { url } => {
                if url.trim().is_empty() {
                    errors.push(FieldValidationError::new(
                        "payment_slip",
                        FieldErrorReason::Empty,
                    ));
                }
            }
            Self::SubmitReview { rating, text } => {
                let (lo, hi) = (hard_limit::MIN_RATING, hard_limit::MAX_RATING);
                if *rating < lo || *rating > hi {
                    let reason = FieldErrorReason::OutOfRange(lo as i64, hi as i64);
                    errors.push(FieldValidationError::new("rating", reason));
                }
                if text.chars().count() > hard_limit::MAX_REVIEW_TEXT_CHARS {
                    let reason = FieldErrorReason::TooLong(hard_limit::MAX_REVIEW_TEXT_CHARS);
                    errors.push(FieldValidationError::new("review_text", reason));
                }
            }
            _others => {}
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
} // end of impl OrderTransitionReq

impl OrderModel {
    pub fn try_new(oid: String, args: OrderCreateArgs) -> Result<Self, OrderModelError> {
        let mut errors = Vec::new();
        [
            ("buyer_id", args.buyer_id.as_str()),
            ("seller_id", args.seller_id.as_str()),
            ("shop_id", args.shop_id.as_str()),
            ("item_id", args.item_id.as_str()),
        ]
        .into_iter()
        .filter_map(|(label, v)| FieldValidationError::check_text(label, v, None))
        .for_each(|e| errors.push(e));
        let max_qty = hard_limit::MAX_QUANTITY_PER_LINE;
        if args.quantity == 0 || args.quantity > max_qty {
            let reason = FieldErrorReason::OutOfRange(1, max_qty as i64);
            errors.push(FieldValidationError::new("quantity", reason));
        }
        if args.unit_price.is_sign_negative() {
            let reason = FieldErrorReason::OutOfRange(0, i64::MAX);
            errors.push(FieldValidationError::new("unit_price", reason));
        }
        if args.shipping_cost.is_sign_negative() {
            let reason = FieldErrorReason::OutOfRange(0, i64::MAX);
            errors.push(FieldValidationError::new("shipping_cost", reason));
        }
        if !errors.is_empty() {
            return Err(OrderModelError::Validation(errors));
        }
        let total = args
            .unit_price
            .checked_mul(Decimal::from(args.quantity))
            .and_then(|v| v.checked_add(args.shipping_cost))
            .ok_or_else(|| {
                let reason = FieldErrorReason::OutOfRange(0, i64::MAX);
                let e = FieldValidationError::new("unit_price", reason);
                OrderModelError::Validation(vec![e])
            })?;
        Ok(Self {
            id: oid,
            buyer_id: args.buyer_id,
            buyer_email: args.buyer_email,
            seller_id: args.seller_id,
            shop_id: args.shop_id,
            item_id: args.item_id,
            item_name: args.item_name,
            unit_price: args.unit_price,
            quantity: args.quantity,
            shipping_cost: args.shipping_cost,
            total,
            pay_method: args.pay_method,
            payment_slip: None,
            status: OrderStatus::initial(args.pay_method),
            review: None,
            custom_order_id: args.custom_order_id,
            create_time: args.time,
            last_update: args.time,
        })
    } // end of fn try_new

    pub fn authorize(&self, actor: &AppAuthedClaim) -> OrderPartyRole {
        OrderPartyRole {
            is_buyer: actor.same_user(&self.buyer_id) || actor.same_email(&self.buyer_email),
            is_seller: actor.same_user(&self.seller_id),
        }
    }

    /// Checks the caller and the requested operation against the current
    /// state without modifying anything.
    pub fn check_transition(
        &self,
        actor: &AppAuthedClaim,
        op: OrderOperation,
    ) -> Result<OrderStatus, OrderModelError> {
        let role = self.authorize(actor);
        if !role.is_party() {
            return Err(OrderModelError::Unauthorized {
                oid: self.id.clone(),
                usr_id: actor.profile.clone(),
            });
        }
        let expect = op.actor();
        if !role.can_act(expect) {
            return Err(OrderModelError::RoleMismatch {
                oid: self.id.clone(),
                op,
                expect,
            });
        }
        op.next_status(self.status, self.review.is_some())
            .map_err(|reason| OrderModelError::InvalidTransition {
                oid: self.id.clone(),
                op,
                curr: self.status,
                reason,
            })
    }

    pub fn apply(&mut self, args: OrderUpdateArgs) -> Result<(), OrderModelError> {
        let OrderUpdateArgs { actor, req, time } = args;
        let next = self.check_transition(&actor, req.operation())?;
        req.validate().map_err(OrderModelError::Validation)?;
        match req {
            OrderTransitionReq::UploadPaymentSlip { url } => {
                self.payment_slip = Some(PaymentSlipModel {
                    url,
                    uploaded_at: time,
                });
            }
            OrderTransitionReq::SubmitReview { rating, text } => {
                self.review = Some(ReviewModel {
                    rating,
                    text,
                    create_time: time,
                });
            }
            _others => {}
        }
        self.status = next;
        self.last_update = time;
        Ok(())
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }
    pub fn buyer_id(&self) -> &str {
        self.buyer_id.as_str()
    }
    pub fn buyer_email(&self) -> &str {
        self.buyer_email.as_str()
    }
    pub fn seller_id(&self) -> &str {
        self.seller_id.as_str()
    }
    pub fn shop_id(&self) -> &str {
        self.shop_id.as_str()
    }
    pub fn item_id(&self) -> &str {
        self.item_id.as_str()
    }
    pub fn item_name(&self) -> &str {
        self.item_name.as_str()
    }
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn shipping_cost(&self) -> Decimal {
        self.shipping_cost
    }
    pub fn total(&self) -> Decimal {
        self.total
    }
    pub fn pay_method(&self) -> PaymentMethod {
        self.pay_method
    }
    pub fn payment_slip(&self) -> Option<&PaymentSlipModel> {
        self.payment_slip.as_ref()
    }
    pub fn status(&self) -> OrderStatus {
        self.status
    }
    pub fn review(&self) -> Option<&ReviewModel> {
        self.review.as_ref()
    }
    pub fn custom_order_id(&self) -> Option<&str> {
        self.custom_order_id.as_deref()
    }
    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }
} // end of impl OrderModel

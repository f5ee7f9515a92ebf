use std::boxed::Box;
use std::sync::Arc;

use chrono::Utc;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::notification::{dispatch_detached, AbstractNotifier, AppNotification};
use crate::adapter::repository::AbstractOrderRepo;
use crate::adapter::storage::AbstractObjectStorage;
use crate::api::dto::{OrderSummaryDto, PaymentSlipUploadReqDto};
use crate::auth::AppAuthedClaim;
use crate::constant::hard_limit;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{
    FieldErrorReason, FieldValidationError, OrderActorRole, OrderModel, OrderOperation,
    OrderTransitionReq, OrderUpdateArgs,
};

/// Status transitions of an order driven by its buyer or seller. Each
/// operation is one atomic update of the order; notifications are sent
/// afterwards without waiting for delivery.
pub struct OrderTransitionUseCase {
    pub repo_order: Box<dyn AbstractOrderRepo>,
    pub notifier: Arc<Box<dyn AbstractNotifier>>,
    pub obj_storage: Arc<Box<dyn AbstractObjectStorage>>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl OrderTransitionUseCase {
    pub async fn upload_payment_slip(
        &self,
        oid: &str,
        req: PaymentSlipUploadReqDto,
    ) -> Result<OrderSummaryDto, WorkflowUcError> {
        Self::validate_slip(&req)?;
        // reject early before writing anything to object storage, the guard
        // is checked again within the atomic update
        let saved = self
            .repo_order
            .fetch(oid)
            .await?
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })?;
        let _next = saved.check_transition(&self.auth_claim, OrderOperation::UploadPaymentSlip)?;
        let path = format!("payment-slip/{}/{}", oid, Utc::now().timestamp_millis());
        let url = self
            .obj_storage
            .put(path.as_str(), req.content_type.as_str(), req.data)
            .await
            .map_err(|e| {
                let logctx = &self.logctx;
                app_log_event!(logctx, AppLogLevel::ERROR, "oid:{oid}, {e}");
                WorkflowUcError::ObjectStorage(e)
            })?;
        let m = self
            .transit(oid, OrderTransitionReq::UploadPaymentSlip { url })
            .await?;
        Ok(OrderSummaryDto::from(&m))
    } // end of fn upload_payment_slip

    pub async fn mark_shipped(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self.transit(oid, OrderTransitionReq::MarkShipped).await?;
        Ok(OrderSummaryDto::from(&m))
    }

    pub async fn mark_received(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self.transit(oid, OrderTransitionReq::MarkReceived).await?;
        Ok(OrderSummaryDto::from(&m))
    }

    pub async fn request_refund(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self.transit(oid, OrderTransitionReq::RequestRefund).await?;
        Ok(OrderSummaryDto::from(&m))
    }

    pub async fn approve_refund(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self.transit(oid, OrderTransitionReq::ApproveRefund).await?;
        Ok(OrderSummaryDto::from(&m))
    }

    pub async fn cancel_refund(&self, oid: &str) -> Result<OrderSummaryDto, WorkflowUcError> {
        let m = self.transit(oid, OrderTransitionReq::CancelRefund).await?;
        Ok(OrderSummaryDto::from(&m))
    }

    async fn transit(
        &self,
        oid: &str,
        req: OrderTransitionReq,
    ) -> Result<OrderModel, WorkflowUcError> {
        let op = req.operation();
        let args = OrderUpdateArgs {
            actor: self.auth_claim.clone(),
            req,
            time: Utc::now(),
        };
        let logctx = &self.logctx;
        let m = self
            .repo_order
            .update(oid, args, OrderModel::apply)
            .await
            .map_err(|e| {
                app_log_event!(logctx, AppLogLevel::DEBUG, "oid:{oid}, op:{op}, {e}");
                WorkflowUcError::from(e)
            })?
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })?;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "oid:{oid}, op:{op}, status:{:?}, usr:{}",
            m.status(),
            self.auth_claim.profile
        );
        if let Some(item) = Self::notification(op, &m) {
            dispatch_detached(self.notifier.clone(), self.logctx.clone(), item);
        }
        Ok(m)
    } // end of fn transit

    fn notification(op: OrderOperation, m: &OrderModel) -> Option<AppNotification> {
        let oid = m.id();
        let (recipient, message) = match op {
            OrderOperation::UploadPaymentSlip => (
                OrderActorRole::Seller,
                format!("payment slip uploaded for order {oid}, please verify the transfer"),
            ),
            OrderOperation::MarkShipped => (
                OrderActorRole::Buyer,
                format!("your order {oid} has been shipped"),
            ),
            OrderOperation::RequestRefund => (
                OrderActorRole::Buyer,
                format!("your refund request for order {oid} has been received"),
            ),
            OrderOperation::ApproveRefund => (
                OrderActorRole::Buyer,
                format!("your refund for order {oid} has been approved"),
            ),
            OrderOperation::CancelRefund => (
                OrderActorRole::Buyer,
                format!("order {oid} has been cancelled by the seller and refunded"),
            ),
            OrderOperation::MarkReceived | OrderOperation::SubmitReview => {
                return None;
            }
        };
        Some(AppNotification {
            recipient,
            order: m.clone(),
            new_status: m.status(),
            message,
        })
    }

    fn validate_slip(req: &PaymentSlipUploadReqDto) -> Result<(), WorkflowUcError> {
        let reason = if req.data.is_empty() {
            Some(FieldErrorReason::Empty)
        } else if req.data.len() > hard_limit::MAX_PAYMENT_SLIP_NBYTES {
            Some(FieldErrorReason::TooLong(hard_limit::MAX_PAYMENT_SLIP_NBYTES))
        } else if req.content_type.trim().is_empty() {
            Some(FieldErrorReason::InvalidFormat)
        } else {
            None
        };
        if let Some(r) = reason {
            let e = FieldValidationError::new("payment_slip", r);
            Err(WorkflowUcError::Validation(vec![e]))
        } else {
            Ok(())
        }
    }
} // end of impl OrderTransitionUseCase

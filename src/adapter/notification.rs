use std::boxed::Box;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppNotifyCfg;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{OrderActorRole, OrderModel, OrderStatus};

#[derive(Debug)]
pub struct AppNotifyError {
    pub code: AppErrorCode,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct AppNotification {
    pub recipient: OrderActorRole,
    pub order: OrderModel,
    pub new_status: OrderStatus,
    pub message: String,
}

// delivery is asynchronous from the perspective of the state transition,
// callers never wait for the outcome
#[async_trait]
pub trait AbstractNotifier: Send + Sync {
    async fn send(&self, item: AppNotification) -> Result<(), AppNotifyError>;
}

pub struct AppLogNotifier {
    logctx: Arc<AppLogContext>,
}

impl Display for AppNotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notify, code:{:?}, detail:{}", self.code, self.detail)
    }
}

impl AppNotification {
    /// Email of the buyer, or user id of the seller. The delivery service
    /// resolves a seller id to its contact channel.
    pub fn recipient_key(&self) -> &str {
        match self.recipient {
            OrderActorRole::Buyer => self.order.buyer_email(),
            OrderActorRole::Seller => self.order.seller_id(),
        }
    }
}

impl AppLogNotifier {
    pub fn new(logctx: Arc<AppLogContext>) -> Self {
        Self { logctx }
    }
}

#[async_trait]
impl AbstractNotifier for AppLogNotifier {
    async fn send(&self, item: AppNotification) -> Result<(), AppNotifyError> {
        let key = item.recipient_key();
        if key.trim().is_empty() {
            return Err(AppNotifyError {
                code: AppErrorCode::InvalidInput,
                detail: format!("no-recipient, oid:{}", item.order.id()),
            });
        }
        let logctx = &self.logctx;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "recipient:{:?}, key:{}, oid:{}, status:{:?}, msg:{}",
            item.recipient,
            key,
            item.order.id(),
            item.new_status,
            item.message
        );
        Ok(())
    }
}

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &AppNotifyCfg,
) -> Result<Box<dyn AbstractNotifier>, AppError> {
    let obj: Box<dyn AbstractNotifier> = match cfg {
        AppNotifyCfg::Logging => Box::new(AppLogNotifier::new(logctx)),
    };
    Ok(obj)
}

/// Sends the notification on a detached task, failure is logged and never
/// reaches the caller of the state transition.
pub fn dispatch_detached(
    notifier: Arc<Box<dyn AbstractNotifier>>,
    logctx: Arc<AppLogContext>,
    item: AppNotification,
) {
    let _handle = tokio::spawn(async move {
        let oid = item.order.id().to_string();
        if let Err(e) = notifier.send(item).await {
            app_log_event!(logctx, AppLogLevel::ERROR, "oid:{oid}, {e}");
        }
    });
}

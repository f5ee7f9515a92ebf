use std::boxed::Box;
use std::sync::Arc;

use chrono::Utc;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::{AbstractBuyerReportRepo, AbstractOrderRepo};
use crate::api::dto::{BuyerReportDto, BuyerReportReqDto};
use crate::auth::AppAuthedClaim;
use crate::constant::app_meta;
use crate::generate_id_string;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::BuyerReportModel;

pub struct FileBuyerReportUseCase {
    pub repo_order: Box<dyn AbstractOrderRepo>,
    pub repo_report: Box<dyn AbstractBuyerReportRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl FileBuyerReportUseCase {
    /// The seller of an order files at most one report against its buyer.
    /// Two concurrent submissions may both pass the duplicate check, such
    /// reports are left to the moderation process.
    pub async fn execute(&self, req: BuyerReportReqDto) -> Result<BuyerReportDto, WorkflowUcError> {
        let oid = req.order_id.as_str();
        let order = self
            .repo_order
            .fetch(oid)
            .await?
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            })?;
        if !order.authorize(&self.auth_claim).is_seller {
            return Err(WorkflowUcError::Unauthorized {
                entity: WorkflowEntity::Order,
                id: oid.to_string(),
            });
        }
        let report = BuyerReportModel::try_new(
            generate_id_string(app_meta::MACHINE_CODE),
            oid,
            order.seller_id(),
            order.buyer_id(),
            req.complaint.as_str(),
            Utc::now(),
        )?;
        let logctx = &self.logctx;
        let existing = self
            .repo_report
            .fetch_by_order_seller(oid, order.seller_id())
            .await?;
        if !existing.is_empty() {
            app_log_event!(
                logctx,
                AppLogLevel::DEBUG,
                "oid:{oid}, seller:{}, num-existing:{}",
                order.seller_id(),
                existing.len()
            );
            return Err(WorkflowUcError::DuplicateReport {
                order_id: oid.to_string(),
                seller_id: order.seller_id().to_string(),
            });
        }
        self.repo_report.create(report.clone()).await?;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "oid:{oid}, report:{}, buyer:{}",
            report.id,
            report.buyer_id
        );
        Ok(BuyerReportDto::from(&report))
    } // end of fn execute
}

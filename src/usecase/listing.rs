use std::boxed::Box;
use std::sync::Arc;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::{AbstractListingRepo, AbstractSellerVerifyRepo, AppRepoError};
use crate::api::dto::{ListingPaymentReqDto, ListingPaymentRespDto};
use crate::auth::AppAuthedClaim;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{ListingModel, ListingUpdateArgs, SellerVerifyStatus};

// verification status can change at any time, always read it from the store
pub(super) async fn seller_bank_transfer_eligible(
    repo: &dyn AbstractSellerVerifyRepo,
    seller_id: &str,
    eligible: &[SellerVerifyStatus],
) -> Result<bool, AppRepoError> {
    let result = repo
        .fetch(seller_id)
        .await?
        .map(|m| m.bank_transfer_eligible(eligible))
        .unwrap_or(false);
    Ok(result)
}

pub struct ListingPaymentUseCase {
    pub repo_listing: Box<dyn AbstractListingRepo>,
    pub repo_verify: Box<dyn AbstractSellerVerifyRepo>,
    pub eligible_status: Vec<SellerVerifyStatus>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl ListingPaymentUseCase {
    pub async fn set_bank_transfer(
        &self,
        listing_id: &str,
        req: ListingPaymentReqDto,
    ) -> Result<ListingPaymentRespDto, WorkflowUcError> {
        let not_found = || WorkflowUcError::NotFound {
            entity: WorkflowEntity::Listing,
            id: listing_id.to_string(),
        };
        let saved = self.repo_listing.fetch(listing_id).await?.ok_or_else(not_found)?;
        if !self.auth_claim.same_user(saved.seller_id.as_str()) {
            return Err(WorkflowUcError::Unauthorized {
                entity: WorkflowEntity::Listing,
                id: listing_id.to_string(),
            });
        }
        let enable = req.bank_transfer;
        // disabling never depends on the seller status
        let seller_eligible = if enable {
            seller_bank_transfer_eligible(
                self.repo_verify.as_ref(),
                saved.seller_id.as_str(),
                &self.eligible_status,
            )
            .await?
        } else {
            true
        };
        let args = ListingUpdateArgs::BankTransfer {
            enable,
            seller_eligible,
        };
        let logctx = &self.logctx;
        let updated = self
            .repo_listing
            .update(listing_id, args, ListingModel::update)
            .await
            .map_err(|e| {
                app_log_event!(logctx, AppLogLevel::DEBUG, "listing:{listing_id}, {e}");
                WorkflowUcError::from(e)
            })?
            .ok_or_else(not_found)?;
        app_log_event!(
            logctx,
            AppLogLevel::INFO,
            "listing:{listing_id}, bank-transfer:{}",
            updated.bank_transfer
        );
        Ok(ListingPaymentRespDto::from(&updated))
    } // end of fn set_bank_transfer
}

use std::boxed::Box;
use std::sync::Arc;

use chrono::Utc;

use super::{WorkflowEntity, WorkflowUcError};
use crate::adapter::repository::{AbstractBankAccountRepo, AbstractListingRepo};
use crate::api::dto::{BankAccountDto, BankAccountReqDto, BlockingListingDto};
use crate::auth::AppAuthedClaim;
use crate::constant::{app_meta, hard_limit};
use crate::generate_id_string;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{BankAccountSetModel, BankAccountUpdateArgs};

/// Payout bank accounts owned by the authenticated seller. Each operation
/// is one write to the account-set document of the seller, so the default
/// account is never observed in an inconsistent state.
pub struct BankAccountUseCase {
    pub repo_bank: Box<dyn AbstractBankAccountRepo>,
    pub repo_listing: Box<dyn AbstractListingRepo>,
    pub auth_claim: AppAuthedClaim,
    pub logctx: Arc<AppLogContext>,
}

impl BankAccountUseCase {
    pub async fn list(&self) -> Result<Vec<BankAccountDto>, WorkflowUcError> {
        let saved = self.repo_bank.fetch(self.owner_id()).await?;
        Ok(Self::to_dtos(&saved))
    }

    pub async fn add(&self, req: BankAccountReqDto) -> Result<BankAccountDto, WorkflowUcError> {
        let acc_id = generate_id_string(app_meta::MACHINE_CODE);
        let args = BankAccountUpdateArgs::Add(acc_id.clone(), req.into(), Utc::now());
        let saved = self.write(args).await?;
        Self::pick(&saved, acc_id.as_str())
    }

    pub async fn edit(
        &self,
        acc_id: &str,
        req: BankAccountReqDto,
    ) -> Result<BankAccountDto, WorkflowUcError> {
        let args = BankAccountUpdateArgs::Edit(acc_id.to_string(), req.into());
        let saved = self.write(args).await?;
        Self::pick(&saved, acc_id)
    }

    /// Rejected while any active listing of the seller still offers bank
    /// transfer, the error names a few of them so the seller knows which
    /// listings to change first.
    pub async fn delete(&self, acc_id: &str) -> Result<Vec<BankAccountDto>, WorkflowUcError> {
        let current = self.repo_bank.fetch(self.owner_id()).await?;
        if current.find(acc_id).is_none() {
            return Err(WorkflowUcError::NotFound {
                entity: WorkflowEntity::BankAccount,
                id: acc_id.to_string(),
            });
        }
        let blocking = self
            .repo_listing
            .fetch_bank_transfer_active(self.owner_id())
            .await?;
        if !blocking.is_empty() {
            let logctx = &self.logctx;
            app_log_event!(
                logctx,
                AppLogLevel::DEBUG,
                "usr:{}, acc:{acc_id}, num-blocking:{}",
                self.owner_id(),
                blocking.len()
            );
            let limit = hard_limit::MAX_BLOCKING_LISTINGS_SHOWN;
            let num_remaining = blocking.len().saturating_sub(limit);
            let listings = blocking
                .iter()
                .take(limit)
                .map(BlockingListingDto::from)
                .collect();
            return Err(WorkflowUcError::BankAccountInUse {
                account_id: acc_id.to_string(),
                listings,
                num_remaining,
            });
        }
        let args = BankAccountUpdateArgs::Remove(acc_id.to_string());
        let saved = self.write(args).await?;
        Ok(Self::to_dtos(&saved))
    } // end of fn delete

    pub async fn set_default(&self, acc_id: &str) -> Result<Vec<BankAccountDto>, WorkflowUcError> {
        let args = BankAccountUpdateArgs::SetDefault(acc_id.to_string());
        let saved = self.write(args).await?;
        Ok(Self::to_dtos(&saved))
    }

    async fn write(
        &self,
        args: BankAccountUpdateArgs,
    ) -> Result<BankAccountSetModel, WorkflowUcError> {
        let logctx = &self.logctx;
        let usr_id = self.owner_id();
        let result = self
            .repo_bank
            .update(usr_id, args, BankAccountSetModel::update)
            .await;
        match result {
            Ok(saved) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::INFO,
                    "usr:{usr_id}, num-accounts:{}",
                    saved.accounts.len()
                );
                Ok(saved)
            }
            Err(e) => {
                app_log_event!(logctx, AppLogLevel::DEBUG, "usr:{usr_id}, {e}");
                Err(e.into())
            }
        }
    }

    fn owner_id(&self) -> &str {
        self.auth_claim.profile.as_str()
    }

    fn pick(saved: &BankAccountSetModel, acc_id: &str) -> Result<BankAccountDto, WorkflowUcError> {
        saved
            .find(acc_id)
            .map(BankAccountDto::from)
            .ok_or_else(|| WorkflowUcError::NotFound {
                entity: WorkflowEntity::BankAccount,
                id: acc_id.to_string(),
            })
    }

    fn to_dtos(saved: &BankAccountSetModel) -> Vec<BankAccountDto> {
        saved
            .accounts
            .iter()
            .map(BankAccountDto::from)
            .collect()
    }
} // end of impl BankAccountUseCase

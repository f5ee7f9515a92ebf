use std::sync::Arc;

use async_trait::async_trait;

use super::super::{
    AbstractBankAccountRepo, AppBankAccountRepoUpdateFn, AppRepoError, AppRepoErrorDetail,
    AppRepoErrorFnLabel,
};
use super::{fetch_one, fetch_one_locked, init_table, model_error, save_one_release, InMemDStore};
use crate::datastore::AppDataStoreContext;
use crate::model::{BankAccountSetModel, BankAccountUpdateArgs};

// one document per seller, keyed by the seller's user id
const TABLE_LABEL: &str = "bank_account";

pub struct BankAccountInMemRepo {
    datastore: InMemDStore,
}

impl BankAccountInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }
}

#[async_trait]
impl AbstractBankAccountRepo for BankAccountInMemRepo {
    async fn fetch(&self, owner_id: &str) -> Result<BankAccountSetModel, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchBankAccounts;
        let saved =
            fetch_one::<BankAccountSetModel>(&self.datastore, fn_label, TABLE_LABEL, owner_id)
                .await?;
        Ok(saved.unwrap_or_else(|| BankAccountSetModel::new(owner_id)))
    }

    async fn update(
        &self,
        owner_id: &str,
        args: BankAccountUpdateArgs,
        cb: AppBankAccountRepoUpdateFn,
    ) -> Result<BankAccountSetModel, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::UpdateBankAccounts;
        let (saved, lock) = fetch_one_locked::<BankAccountSetModel>(
            &self.datastore,
            fn_label,
            TABLE_LABEL,
            owner_id,
        )
        .await?;
        let mut mset = saved.unwrap_or_else(|| BankAccountSetModel::new(owner_id));
        cb(&mut mset, args)
            .map_err(|e| model_error(fn_label, AppRepoErrorDetail::BankAccount(e)))?;
        save_one_release(&self.datastore, fn_label, TABLE_LABEL, owner_id, &mset, lock)?;
        Ok(mset)
    }
}

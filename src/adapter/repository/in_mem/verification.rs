use std::sync::Arc;

use async_trait::async_trait;

use super::super::{
    AbstractSellerVerifyRepo, AppRepoError, AppRepoErrorDetail, AppRepoErrorFnLabel,
    AppVerifyRepoUpdateFn,
};
use super::{fetch_one, fetch_one_locked, init_table, model_error, save_one_release, InMemDStore};
use crate::datastore::AppDataStoreContext;
use crate::model::{SellerVerificationModel, VerificationUpdateArgs};

const TABLE_LABEL: &str = "seller_verification";

pub struct SellerVerifyInMemRepo {
    datastore: InMemDStore,
}

impl SellerVerifyInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }
}

#[async_trait]
impl AbstractSellerVerifyRepo for SellerVerifyInMemRepo {
    async fn fetch(&self, usr_id: &str) -> Result<Option<SellerVerificationModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchVerification;
        fetch_one::<SellerVerificationModel>(&self.datastore, fn_label, TABLE_LABEL, usr_id).await
    }

    async fn update(
        &self,
        usr_id: &str,
        args: VerificationUpdateArgs,
        cb: AppVerifyRepoUpdateFn,
    ) -> Result<SellerVerificationModel, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::UpdateVerification;
        let (saved, lock) = fetch_one_locked::<SellerVerificationModel>(
            &self.datastore,
            fn_label,
            TABLE_LABEL,
            usr_id,
        )
        .await?;
        let mut m = saved.unwrap_or_else(|| SellerVerificationModel::new(usr_id));
        cb(&mut m, args).map_err(|e| model_error(fn_label, AppRepoErrorDetail::Verification(e)))?;
        save_one_release(&self.datastore, fn_label, TABLE_LABEL, usr_id, &m, lock)?;
        Ok(m)
    }
}

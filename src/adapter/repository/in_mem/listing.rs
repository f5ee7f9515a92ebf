use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use super::super::{
    AbstractListingRepo, AppListingRepoUpdateFn, AppRepoError, AppRepoErrorDetail,
    AppRepoErrorFnLabel,
};
use super::{
    fetch_one, fetch_one_locked, filter_docs, init_table, model_error, save_docs,
    save_one_release, InMemDStore,
};
use crate::datastore::{AppDStoreEqualityFilter, AppDataStoreContext};
use crate::model::{ListingModel, ListingUpdateArgs};

const TABLE_LABEL: &str = "listing";

pub struct ListingInMemRepo {
    datastore: InMemDStore,
}

impl ListingInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }
}

#[async_trait]
impl AbstractListingRepo for ListingInMemRepo {
    async fn create(&self, listings: Vec<ListingModel>) -> Result<(), AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::CreateListing;
        let items = listings.iter().map(|m| (m.id.clone(), m)).collect();
        let _num_saved = save_docs(&self.datastore, fn_label, TABLE_LABEL, items).await?;
        Ok(())
    }

    async fn fetch(&self, listing_id: &str) -> Result<Option<ListingModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchListing;
        fetch_one::<ListingModel>(&self.datastore, fn_label, TABLE_LABEL, listing_id).await
    }

    async fn fetch_bank_transfer_active(
        &self,
        seller_id: &str,
    ) -> Result<Vec<ListingModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchBankTransferListings;
        let op = AppDStoreEqualityFilter(vec![
            ("seller_id".to_string(), JsnVal::String(seller_id.to_string())),
            ("active".to_string(), JsnVal::Bool(true)),
            ("bank_transfer".to_string(), JsnVal::Bool(true)),
        ]);
        let mut ms =
            filter_docs::<ListingModel>(&self.datastore, fn_label, TABLE_LABEL, &op).await?;
        ms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(ms)
    }

    async fn update(
        &self,
        listing_id: &str,
        args: ListingUpdateArgs,
        cb: AppListingRepoUpdateFn,
    ) -> Result<Option<ListingModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::UpdateListing;
        let (saved, lock) =
            fetch_one_locked::<ListingModel>(&self.datastore, fn_label, TABLE_LABEL, listing_id)
                .await?;
        let Some(mut m) = saved else {
            return Ok(None);
        };
        cb(&mut m, args).map_err(|e| model_error(fn_label, AppRepoErrorDetail::Listing(e)))?;
        save_one_release(&self.datastore, fn_label, TABLE_LABEL, listing_id, &m, lock)?;
        Ok(Some(m))
    }
} // end of impl AbstractListingRepo

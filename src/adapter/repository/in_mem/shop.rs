use std::sync::Arc;

use async_trait::async_trait;

use super::super::{
    AbstractShopRepo, AppRepoError, AppRepoErrorDetail, AppRepoErrorFnLabel, AppShopRepoRatingFn,
};
use super::{
    fetch_one, fetch_one_locked, init_table, model_error, save_docs, save_one_release,
    InMemDStore,
};
use crate::datastore::AppDataStoreContext;
use crate::model::{ShopModel, ShopRatingModel};

const TABLE_LABEL: &str = "shop";

pub struct ShopInMemRepo {
    datastore: InMemDStore,
}

impl ShopInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }
}

#[async_trait]
impl AbstractShopRepo for ShopInMemRepo {
    async fn create(&self, shop: ShopModel) -> Result<(), AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::CreateShop;
        let items = vec![(shop.id.clone(), &shop)];
        let _num_saved = save_docs(&self.datastore, fn_label, TABLE_LABEL, items).await?;
        Ok(())
    }

    async fn fetch(&self, shop_id: &str) -> Result<Option<ShopModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchShop;
        fetch_one::<ShopModel>(&self.datastore, fn_label, TABLE_LABEL, shop_id).await
    }

    async fn update_rating(
        &self,
        shop_id: &str,
        sample: u8,
        cb: AppShopRepoRatingFn,
    ) -> Result<Option<ShopRatingModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::UpdateShopRating;
        let (saved, lock) =
            fetch_one_locked::<ShopModel>(&self.datastore, fn_label, TABLE_LABEL, shop_id)
                .await?;
        let Some(mut shop) = saved else {
            return Ok(None);
        };
        cb(&mut shop.rating, sample)
            .map_err(|e| model_error(fn_label, AppRepoErrorDetail::Rating(e)))?;
        save_one_release(&self.datastore, fn_label, TABLE_LABEL, shop_id, &shop, lock)?;
        Ok(Some(shop.rating))
    }
}

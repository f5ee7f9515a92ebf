use std::boxed::Box;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use super::super::{
    AbstractOrderRepo, AppOrderRepoUpdateFn, AppRepoError, AppRepoErrorDetail,
    AppRepoErrorFnLabel,
};
use super::{
    fetch_one, fetch_one_locked, filter_docs, init_table, model_error, save_docs,
    save_one_release, InMemDStore,
};
use crate::datastore::{AppDStoreEqualityFilter, AppDataStoreContext};
use crate::error::{AppError, AppErrorCode};
use crate::model::{OrderModel, OrderUpdateArgs};

const TABLE_LABEL: &str = "order";

pub struct OrderInMemRepo {
    datastore: InMemDStore,
}

impl OrderInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }

    async fn fetch_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<OrderModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchOrdersByParty;
        let op = AppDStoreEqualityFilter::single(field, JsnVal::String(value.to_string()));
        let mut ms =
            filter_docs::<OrderModel>(&self.datastore, fn_label, TABLE_LABEL, &op).await?;
        // oldest first, stable across calls
        ms.sort_by(|a, b| {
            a.create_time()
                .cmp(&b.create_time())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(ms)
    }
} // end of impl OrderInMemRepo

#[async_trait]
impl AbstractOrderRepo for OrderInMemRepo {
    async fn create(&self, orders: Vec<OrderModel>) -> Result<(), AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::CreateOrder;
        if orders.is_empty() {
            return Err(AppRepoError {
                fn_label,
                code: AppErrorCode::EmptyInputData,
                detail: AppRepoErrorDetail::DataStore(AppError {
                    code: AppErrorCode::EmptyInputData,
                    detail: Some("orders".to_string()),
                }),
            });
        }
        let items = orders
            .iter()
            .map(|m| (m.id().to_string(), m))
            .collect::<Vec<_>>();
        let _num_saved = save_docs(&self.datastore, fn_label, TABLE_LABEL, items).await?;
        Ok(())
    }

    async fn fetch(&self, oid: &str) -> Result<Option<OrderModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchOrder;
        fetch_one::<OrderModel>(&self.datastore, fn_label, TABLE_LABEL, oid).await
    }

    async fn fetch_by_buyer(&self, usr_id: &str) -> Result<Vec<OrderModel>, AppRepoError> {
        self.fetch_by_field("buyer_id", usr_id).await
    }

    async fn fetch_by_seller(&self, usr_id: &str) -> Result<Vec<OrderModel>, AppRepoError> {
        self.fetch_by_field("seller_id", usr_id).await
    }

    async fn fetch_by_custom_order(
        &self,
        custom_oid: &str,
    ) -> Result<Vec<OrderModel>, AppRepoError> {
        self.fetch_by_field("custom_order_id", custom_oid).await
    }

    async fn update(
        &self,
        oid: &str,
        args: OrderUpdateArgs,
        cb: AppOrderRepoUpdateFn,
    ) -> Result<Option<OrderModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::UpdateOrder;
        let (saved, lock) =
            fetch_one_locked::<OrderModel>(&self.datastore, fn_label, TABLE_LABEL, oid).await?;
        let mut m = match saved {
            Some(v) => v,
            None => {
                return Ok(None);
            }
        };
        // the lock is released without writing anything on rejection
        cb(&mut m, args).map_err(|e| model_error(fn_label, AppRepoErrorDetail::Order(e)))?;
        save_one_release(&self.datastore, fn_label, TABLE_LABEL, oid, &m, lock)?;
        Ok(Some(m))
    }
} // end of impl AbstractOrderRepo

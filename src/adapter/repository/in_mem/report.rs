use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;

use super::super::{AbstractBuyerReportRepo, AppRepoError, AppRepoErrorFnLabel};
use super::{filter_docs, init_table, save_docs, InMemDStore};
use crate::datastore::{AppDStoreEqualityFilter, AppDataStoreContext};
use crate::model::BuyerReportModel;

const TABLE_LABEL: &str = "buyer_report";

pub struct BuyerReportInMemRepo {
    datastore: InMemDStore,
}

impl BuyerReportInMemRepo {
    pub async fn new(dstore: Arc<AppDataStoreContext>) -> Result<Self, AppRepoError> {
        let datastore = init_table(dstore, TABLE_LABEL).await?;
        Ok(Self { datastore })
    }
}

#[async_trait]
impl AbstractBuyerReportRepo for BuyerReportInMemRepo {
    async fn create(&self, report: BuyerReportModel) -> Result<(), AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::CreateBuyerReport;
        let items = vec![(report.id.clone(), &report)];
        let _num_saved = save_docs(&self.datastore, fn_label, TABLE_LABEL, items).await?;
        Ok(())
    }

    async fn fetch_by_order_seller(
        &self,
        oid: &str,
        seller_id: &str,
    ) -> Result<Vec<BuyerReportModel>, AppRepoError> {
        let fn_label = AppRepoErrorFnLabel::FetchBuyerReports;
        let op = AppDStoreEqualityFilter(vec![
            ("order_id".to_string(), JsnVal::String(oid.to_string())),
            ("seller_id".to_string(), JsnVal::String(seller_id.to_string())),
        ]);
        filter_docs::<BuyerReportModel>(&self.datastore, fn_label, TABLE_LABEL, &op).await
    }
}

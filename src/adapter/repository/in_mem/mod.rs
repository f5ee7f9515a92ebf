mod bank_account;
mod listing;
mod order;
mod report;
mod shop;
mod verification;

use std::boxed::Box;
use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsnVal;

pub(super) use bank_account::BankAccountInMemRepo;
pub(super) use listing::ListingInMemRepo;
pub(super) use order::OrderInMemRepo;
pub(super) use report::BuyerReportInMemRepo;
pub(super) use shop::ShopInMemRepo;
pub(super) use verification::SellerVerifyInMemRepo;

use super::{AppRepoError, AppRepoErrorDetail, AppRepoErrorFnLabel};
use crate::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppDataStoreContext, AppInMemDstoreLock,
};
use crate::error::{AppError, AppErrorCode};

type InMemDStore = Arc<Box<dyn AbstInMemoryDStore>>;

fn store_error(fn_label: AppRepoErrorFnLabel, e: AppError) -> AppRepoError {
    AppRepoError {
        fn_label,
        code: e.code.clone(),
        detail: AppRepoErrorDetail::DataStore(e),
    }
}

fn codec_error(fn_label: AppRepoErrorFnLabel, e: serde_json::Error) -> AppRepoError {
    AppRepoError {
        fn_label,
        code: AppErrorCode::DataCorruption,
        detail: AppRepoErrorDetail::Codec(e.to_string()),
    }
}

// callers label the rejection with their model-specific detail
fn model_error(fn_label: AppRepoErrorFnLabel, detail: AppRepoErrorDetail) -> AppRepoError {
    AppRepoError {
        fn_label,
        code: AppErrorCode::InvalidInput,
        detail,
    }
}

async fn init_table(
    dstore: Arc<AppDataStoreContext>,
    label: &str,
) -> Result<InMemDStore, AppRepoError> {
    let fn_label = AppRepoErrorFnLabel::InitRepo;
    let m = dstore.in_mem.as_ref().cloned().ok_or_else(|| {
        let e = AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some(format!("in-memory, table:{label}")),
        };
        store_error(fn_label, e)
    })?;
    m.create_table(label)
        .await
        .map_err(|e| store_error(fn_label, e))?;
    Ok(m)
}

fn to_doc<T: Serialize>(fn_label: AppRepoErrorFnLabel, m: &T) -> Result<JsnVal, AppRepoError> {
    serde_json::to_value(m).map_err(|e| codec_error(fn_label, e))
}

fn from_doc<T: DeserializeOwned>(
    fn_label: AppRepoErrorFnLabel,
    v: JsnVal,
) -> Result<T, AppRepoError> {
    serde_json::from_value::<T>(v).map_err(|e| codec_error(fn_label, e))
}

async fn save_docs<T: Serialize>(
    store: &InMemDStore,
    fn_label: AppRepoErrorFnLabel,
    table: &str,
    items: Vec<(String, &T)>,
) -> Result<usize, AppRepoError> {
    let mut rows = HashMap::new();
    for (id, m) in items {
        rows.insert(id, to_doc(fn_label, m)?);
    }
    let data = HashMap::from([(table.to_string(), rows)]);
    store
        .save(data)
        .await
        .map_err(|e| store_error(fn_label, e))
}

async fn fetch_one<T: DeserializeOwned>(
    store: &InMemDStore,
    fn_label: AppRepoErrorFnLabel,
    table: &str,
    id: &str,
) -> Result<Option<T>, AppRepoError> {
    let info = HashMap::from([(table.to_string(), vec![id.to_string()])]);
    let mut fetched = store
        .fetch(info)
        .await
        .map_err(|e| store_error(fn_label, e))?;
    let doc = fetched.remove(table).and_then(|mut rows| rows.remove(id));
    doc.map(|v| from_doc::<T>(fn_label, v)).transpose()
}

async fn filter_docs<T: DeserializeOwned>(
    store: &InMemDStore,
    fn_label: AppRepoErrorFnLabel,
    table: &str,
    op: &dyn AbsDStoreFilterKeyOp,
) -> Result<Vec<T>, AppRepoError> {
    let keys = store
        .filter_keys(table.to_string(), op)
        .await
        .map_err(|e| store_error(fn_label, e))?;
    if keys.is_empty() {
        return Ok(Vec::new());
    }
    let info = HashMap::from([(table.to_string(), keys)]);
    let mut fetched = store
        .fetch(info)
        .await
        .map_err(|e| store_error(fn_label, e))?;
    fetched
        .remove(table)
        .unwrap_or_default()
        .into_values()
        .map(|v| from_doc::<T>(fn_label, v))
        .collect()
}

// load a single document and keep the store locked until the caller
// saves or drops the returned lock
async fn fetch_one_locked<T: DeserializeOwned>(
    store: &InMemDStore,
    fn_label: AppRepoErrorFnLabel,
    table: &str,
    id: &str,
) -> Result<(Option<T>, AppInMemDstoreLock), AppRepoError> {
    let info = HashMap::from([(table.to_string(), vec![id.to_string()])]);
    let (mut fetched, lock) = store
        .fetch_acquire(info)
        .await
        .map_err(|e| store_error(fn_label, e))?;
    let doc = fetched.remove(table).and_then(|mut rows| rows.remove(id));
    let model = doc.map(|v| from_doc::<T>(fn_label, v)).transpose()?;
    Ok((model, lock))
}

fn save_one_release<T: Serialize>(
    store: &InMemDStore,
    fn_label: AppRepoErrorFnLabel,
    table: &str,
    id: &str,
    m: &T,
    lock: AppInMemDstoreLock,
) -> Result<(), AppRepoError> {
    let row = HashMap::from([(id.to_string(), to_doc(fn_label, m)?)]);
    let data = HashMap::from([(table.to_string(), row)]);
    let _num_saved = store
        .save_release(data, lock)
        .map_err(|e| store_error(fn_label, e))?;
    Ok(())
}

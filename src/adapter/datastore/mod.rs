mod in_mem;

use std::boxed::Box;
use std::sync::Arc;

pub use in_mem::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppDStoreEqualityFilter, AppInMemDeleteInfo,
    AppInMemDstoreLock, AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleTable,
    AppInMemUpdateData, AppInMemoryDStore,
};

use crate::config::AppDataStoreCfg;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn AbstInMemoryDStore>>>,
}

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &[AppDataStoreCfg],
) -> Result<AppDataStoreContext, AppError> {
    let mut in_mem = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                if in_mem.is_some() {
                    app_log_event!(logctx, AppLogLevel::WARNING, "dup-inmem-store: {}", d.alias);
                    continue;
                }
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                in_mem = Some(Arc::new(item));
            }
        }
    }
    if in_mem.is_none() {
        return Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("in-memory".to_string()),
        });
    }
    Ok(AppDataStoreContext { in_mem })
}

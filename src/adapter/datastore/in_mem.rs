use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsnVal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

type InnerTable = HashMap<String, JsnVal>;
type InnerTableSet = HashMap<String, InnerTable>;

// table label, followed by document ids
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;
// document id to the document itself
pub type AppInMemFetchedSingleTable = HashMap<String, JsnVal>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;
pub type AppInMemDstoreLock = OwnedMutexGuard<InnerTableSet>;

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, k: &str, v: &JsnVal) -> bool;
}

#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> Result<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> Result<usize, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> Result<usize, AppError>;
    async fn fetch(&self, info: AppInMemFetchKeys) -> Result<AppInMemFetchedData, AppError>;
    // the lock has to be passed back to `save_release()` or dropped, other
    // callers wait until then
    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> Result<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemUpdateData,
        lock: AppInMemDstoreLock,
    ) -> Result<usize, AppError>;
    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> Result<Vec<String>, AppError>;
}

/// Matches documents whose top-level fields are equal to every given value
pub struct AppDStoreEqualityFilter(pub Vec<(String, JsnVal)>);

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    table_map: Arc<Mutex<InnerTableSet>>,
}

impl AbsDStoreFilterKeyOp for AppDStoreEqualityFilter {
    fn filter(&self, _k: &str, v: &JsnVal) -> bool {
        self.0
            .iter()
            .all(|(field, expect)| v.get(field.as_str()) == Some(expect))
    }
}

impl AppDStoreEqualityFilter {
    pub fn single(field: &str, expect: JsnVal) -> Self {
        Self(vec![(field.to_string(), expect)])
    }
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            table_map: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn _missing_table(label: &str) -> AppError {
        AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        }
    }

    fn _fetch_common(
        tables: &InnerTableSet,
        info: AppInMemFetchKeys,
    ) -> Result<AppInMemFetchedData, AppError> {
        let mut out = HashMap::new();
        for (label, ids) in info {
            let table = tables
                .get(label.as_str())
                .ok_or_else(|| Self::_missing_table(label.as_str()))?;
            let rows = ids
                .into_iter()
                .filter_map(|id| table.get(id.as_str()).map(|row| (id, row.clone())))
                .collect::<AppInMemFetchedSingleTable>();
            out.insert(label, rows);
        }
        Ok(out)
    }

    fn _save_common(
        &self,
        tables: &mut InnerTableSet,
        data: AppInMemUpdateData,
    ) -> Result<usize, AppError> {
        // check all tables before writing anything
        for (label, rows) in data.iter() {
            let table = tables
                .get(label.as_str())
                .ok_or_else(|| Self::_missing_table(label.as_str()))?;
            let num_new = rows.keys().filter(|k| !table.contains_key(*k)).count();
            let limit = self.max_items_per_table as usize;
            if table.len() + num_new > limit {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!("table:{label}, limit:{limit}")),
                });
            }
        }
        let mut num_saved = 0usize;
        for (label, rows) in data {
            if let Some(table) = tables.get_mut(label.as_str()) {
                num_saved += rows.len();
                table.extend(rows);
            }
        }
        Ok(num_saved)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> Result<(), AppError> {
        let mut guard = self.table_map.lock().await;
        // repositories sharing the same store may create the same table more than once
        guard.entry(label.to_string()).or_default();
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> Result<usize, AppError> {
        let mut guard = self.table_map.lock().await;
        self._save_common(&mut guard, data)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> Result<usize, AppError> {
        let mut guard = self.table_map.lock().await;
        if let Some(label) = info.keys().find(|l| !guard.contains_key(l.as_str())) {
            return Err(Self::_missing_table(label.as_str()));
        }
        let num_deleted = info
            .into_iter()
            .map(|(label, ids)| {
                guard
                    .get_mut(label.as_str())
                    .map(|table| {
                        ids.iter()
                            .filter_map(|id| table.remove(id.as_str()))
                            .count()
                    })
                    .unwrap_or(0)
            })
            .sum();
        Ok(num_deleted)
    }

    async fn fetch(&self, info: AppInMemFetchKeys) -> Result<AppInMemFetchedData, AppError> {
        let guard = self.table_map.lock().await;
        Self::_fetch_common(&guard, info)
    }

    async fn fetch_acquire(
        &self,
        info: AppInMemFetchKeys,
    ) -> Result<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.table_map.clone().lock_owned().await;
        let fetched = Self::_fetch_common(&guard, info)?;
        Ok((fetched, guard))
    }

    fn save_release(
        &self,
        data: AppInMemUpdateData,
        mut lock: AppInMemDstoreLock,
    ) -> Result<usize, AppError> {
        // the guard is dropped at the end of this function
        self._save_common(&mut lock, data)
    }

    async fn filter_keys(
        &self,
        tbl_label: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> Result<Vec<String>, AppError> {
        let guard = self.table_map.lock().await;
        let table = guard
            .get(tbl_label.as_str())
            .ok_or_else(|| Self::_missing_table(tbl_label.as_str()))?;
        let keys = table
            .iter()
            .filter(|(k, v)| op.filter(k.as_str(), v))
            .map(|(k, _v)| k.clone())
            .collect();
        Ok(keys)
    }
} // end of impl AbstInMemoryDStore

use std::boxed::Box;
use std::collections::HashMap;
use std::fmt::Display;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::AppObjStorageCfg;
use crate::error::{AppError, AppErrorCode};

#[derive(Debug)]
pub struct AppObjStorageError {
    pub code: AppErrorCode,
    pub detail: String,
}

#[async_trait]
pub trait AbstractObjectStorage: Send + Sync {
    /// save the blob at the path, return publicly resolvable URL
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppObjStorageError>;
}

type StoredObject = (String, Vec<u8>);

pub struct InMemObjStorage {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl Display for AppObjStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj-storage, code:{:?}, detail:{}", self.code, self.detail)
    }
}

impl InMemObjStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch(&self, path: &str) -> Option<StoredObject> {
        let guard = self.objects.lock().await;
        guard.get(path).cloned()
    }
}

#[async_trait]
impl AbstractObjectStorage for InMemObjStorage {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppObjStorageError> {
        let path = path.trim_matches('/');
        let detail = if path.is_empty() {
            Some("empty-path")
        } else if content_type.is_empty() {
            Some("empty-content-type")
        } else if data.is_empty() {
            Some("empty-data")
        } else {
            None
        };
        if let Some(d) = detail {
            return Err(AppObjStorageError {
                code: AppErrorCode::InvalidInput,
                detail: d.to_string(),
            });
        }
        let mut guard = self.objects.lock().await;
        guard.insert(path.to_string(), (content_type.to_string(), data));
        Ok(format!("{}/{}", self.base_url, path))
    }
}

pub(crate) fn build_context(
    cfg: &AppObjStorageCfg,
) -> Result<Box<dyn AbstractObjectStorage>, AppError> {
    let obj: Box<dyn AbstractObjectStorage> = match cfg {
        AppObjStorageCfg::InMemory { base_url } => Box::new(InMemObjStorage::new(base_url)),
    };
    Ok(obj)
}

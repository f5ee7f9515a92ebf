use std::boxed::Box;
use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub mod adapter;
pub mod api;
pub mod auth;
pub mod config;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod usecase;

pub use adapter::datastore::{self, AppDataStoreContext};
pub use auth::AppAuthedClaim;
pub use config::{AppBasepathCfg, AppConfig, AppInMemoryDbCfg, AppLoggingCfg};

use adapter::notification::{self, AbstractNotifier};
use adapter::storage::{self, AbstractObjectStorage};
use error::AppError;

pub(crate) type AppLogAlias = Arc<String>;

#[derive(Debug)]
pub struct ShrStateInitError {
    pub progress: ShrStateInitProgress,
    pub error: AppError,
}

#[derive(Debug)]
pub enum ShrStateInitProgress {
    DataStore,
    Notification,
    ObjectStorage,
}

// global state shared by all threads
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<logging::AppLogContext>,
    _dstore: Arc<AppDataStoreContext>,
    _notifier: Arc<Box<dyn AbstractNotifier>>,
    _obj_storage: Arc<Box<dyn AbstractObjectStorage>>,
}

impl AppSharedState {
    pub fn new(cfg: AppConfig) -> Result<Self, ShrStateInitError> {
        let log = logging::AppLogContext::new(&cfg.basepath, &cfg.service.logging);
        let log = Arc::new(log);
        let dstore = datastore::build_context(log.clone(), &cfg.service.data_store).map_err(
            |error| ShrStateInitError {
                progress: ShrStateInitProgress::DataStore,
                error,
            },
        )?;
        let notifier = notification::build_context(log.clone(), &cfg.service.notification)
            .map_err(|error| ShrStateInitError {
                progress: ShrStateInitProgress::Notification,
                error,
            })?;
        let obj_storage = storage::build_context(&cfg.service.object_storage).map_err(|error| {
            ShrStateInitError {
                progress: ShrStateInitProgress::ObjectStorage,
                error,
            }
        })?;
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            _dstore: Arc::new(dstore),
            _notifier: Arc::new(notifier),
            _obj_storage: Arc::new(obj_storage),
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<logging::AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> Arc<AppDataStoreContext> {
        self._dstore.clone()
    }

    pub fn notifier(&self) -> Arc<Box<dyn AbstractNotifier>> {
        self._notifier.clone()
    }

    pub fn object_storage(&self) -> Arc<Box<dyn AbstractObjectStorage>> {
        self._obj_storage.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            _dstore: self._dstore.clone(),
            _notifier: self._notifier.clone(),
            _obj_storage: self._obj_storage.clone(),
        }
    }
}

pub fn generate_custom_uid(machine_code: u8) -> Uuid {
    // UUIDv8 allows custom layout, the first byte of the node part is
    // reserved for machine code, the rest is timestamp and random bytes
    let (secs, nano) = Timestamp::now(NoContext).to_unix();
    let millis = (secs * 1000).saturating_add((nano as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    Builder::from_unix_timestamp_millis(millis, &node_id).into_uuid()
}

pub(crate) fn generate_id_string(machine_code: u8) -> String {
    generate_custom_uid(machine_code).simple().to_string()
}

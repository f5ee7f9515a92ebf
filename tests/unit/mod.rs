mod repository;

use std::sync::Arc;

use order_trust::config::AppCfgHardLimit;
use order_trust::constant::hard_limit;
use order_trust::logging::AppLogContext;
use order_trust::{AppBasepathCfg, AppConfig, AppSharedState};

pub(crate) const EXAMPLE_REL_PATH: &str = "/tests/unit/examples/";

pub(crate) fn ut_service_basepath() -> String {
    env!("CARGO_MANIFEST_DIR").to_string()
}

pub(crate) fn ut_setup_config(cfg_fname: &str) -> AppConfig {
    let service_basepath = ut_service_basepath();
    let fullpath = service_basepath.clone() + EXAMPLE_REL_PATH + cfg_fname;
    let limit = AppCfgHardLimit {
        nitems_per_inmem_table: hard_limit::MAX_ITEMS_STORED_PER_MODEL,
    };
    AppConfig {
        service: AppConfig::parse_from_file(fullpath, limit).unwrap(),
        basepath: AppBasepathCfg {
            system: service_basepath.clone(),
            service: service_basepath,
        },
    }
}

pub(crate) fn ut_setup_share_state(cfg_fname: &str) -> AppSharedState {
    let cfg = ut_setup_config(cfg_fname);
    AppSharedState::new(cfg).unwrap()
}

pub(crate) fn ut_setup_logctx() -> Arc<AppLogContext> {
    let cfg = ut_setup_config("config_ok.json");
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.service.logging);
    Arc::new(logctx)
}

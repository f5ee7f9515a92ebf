mod order;

use std::sync::Arc;

use order_trust::AppDataStoreContext;

use crate::ut_setup_share_state;

pub(crate) fn ut_setup_dstore() -> Arc<AppDataStoreContext> {
    let shr_state = ut_setup_share_state("config_ok.json");
    shr_state.datastore()
}

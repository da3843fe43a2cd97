mod notification;
mod profile;

use std::sync::Arc;

use artisanhub::AppDataStoreContext;

use crate::{ut_setup_share_state, MockConfidential};

pub(crate) fn ds_ctx_setup() -> Arc<AppDataStoreContext> {
    let shr_state = ut_setup_share_state("config_ok.json", Box::new(MockConfidential {}));
    shr_state.datastore().clone()
}

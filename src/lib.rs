pub mod api;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod network;
pub mod repository;
pub mod usecase;

mod adapter;
mod auth;
mod config;
pub mod confidentiality;

use std::result::Result as DefaultResult;
use std::sync::atomic::{AtomicBool, AtomicU32};
use std::sync::Arc;

use uuid::{Builder, NoContext, Timestamp, Uuid};

pub use adapter::datastore::{
    AbsDStoreFilterKeyOp, AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemDstoreLock,
    AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleRow, AppInMemFetchedSingleTable,
    AppInMemUpdateData, AppInMemoryDStore,
};
pub use auth::{
    validate_encoded_token, AbstractAuthKeystore, AppAuthKeystore, AppAuthedClaim, AppUserRole,
    AuthJwtError,
};
pub use config::{
    ApiServerCfg, AppAuthCfg, AppBasepathCfg, AppConfidentialCfg, AppConfig, AppDataStoreCfg,
    AppInMemoryDbCfg, AppLogHandlerCfg, AppLoggerCfg, AppLoggingCfg, WebApiListenCfg,
    WebApiRouteCfg,
};

use confidentiality::AbstractConfidentiality;
use error::AppError;
use logging::AppLogContext;

pub type WebApiPath = String;
pub type WebApiHdlrLabel = &'static str;
pub type AppLogAlias = Arc<String>;

pub struct AppDataStoreContext {
    pub in_mem: Option<Arc<Box<dyn AbstInMemoryDStore>>>,
}

// share common objects across all the requests
pub struct AppSharedState {
    _cfg: Arc<AppConfig>,
    _log: Arc<AppLogContext>,
    dstore: Arc<AppDataStoreContext>,
    _auth_keys: Arc<Box<dyn AbstractAuthKeystore>>,
    _shutdown: Arc<AtomicBool>,
    _num_reqs_processing: Arc<AtomicU32>,
}

impl AppSharedState {
    pub fn new(
        cfg: AppConfig,
        log: AppLogContext,
        confidential: Box<dyn AbstractConfidentiality>,
    ) -> DefaultResult<Self, AppError> {
        let log = Arc::new(log);
        let in_mem = adapter::datastore::build_context(log.clone(), &cfg.api_server.data_store);
        let in_mem = in_mem.map(Arc::new);
        let dstore = Arc::new(AppDataStoreContext { in_mem });
        let keystore = AppAuthKeystore::try_build(&cfg.api_server.auth, confidential.as_ref())?;
        let _auth_keys: Arc<Box<dyn AbstractAuthKeystore>> = Arc::new(Box::new(keystore));
        Ok(Self {
            _cfg: Arc::new(cfg),
            _log: log,
            dstore,
            _auth_keys,
            _shutdown: Arc::new(AtomicBool::new(false)),
            _num_reqs_processing: Arc::new(AtomicU32::new(0)),
        })
    } // end of fn new

    pub fn config(&self) -> &Arc<AppConfig> {
        &self._cfg
    }

    pub fn log_context(&self) -> &Arc<AppLogContext> {
        &self._log
    }

    pub fn datastore(&self) -> &Arc<AppDataStoreContext> {
        &self.dstore
    }

    pub fn auth_keystore(&self) -> Arc<Box<dyn AbstractAuthKeystore>> {
        self._auth_keys.clone()
    }

    pub fn shutdown(&self) -> Arc<AtomicBool> {
        self._shutdown.clone()
    }

    /// number of requests which are currently being processed
    /// in this service
    pub fn num_requests(&self) -> Arc<AtomicU32> {
        self._num_reqs_processing.clone()
    }
} // end of impl AppSharedState

impl Clone for AppSharedState {
    fn clone(&self) -> Self {
        Self {
            _cfg: self._cfg.clone(),
            _log: self._log.clone(),
            dstore: self.dstore.clone(),
            _auth_keys: self._auth_keys.clone(),
            _shutdown: self._shutdown.clone(),
            _num_reqs_processing: self._num_reqs_processing.clone(),
        }
    }
}

/// UUIDv8 with current time in milliseconds and randomly-generated
/// node ID, the first byte of the node ID is overwritten with the
/// given machine code so IDs minted by different app instances never
/// collide even within the same millisecond
pub fn generate_custom_uid(machine_code: u8) -> Uuid {
    let ts_ctx = NoContext;
    let (secs, nanos) = Timestamp::now(ts_ctx).to_unix();
    let millis = (secs * 1000).saturating_add((nanos as u64) / 1_000_000);
    let mut node_id = rand::random::<[u8; 10]>();
    node_id[0] = machine_code;
    let builder = Builder::from_unix_timestamp_millis(millis, &node_id);
    builder.into_uuid()
}

use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// rows of a table are indexed by a caller-defined primary-key string,
// each column is kept in its serialized text form
pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;

type AllTables = HashMap<String, AppInMemFetchedSingleTable>;

pub trait AbsDStoreFilterKeyOp: Send + Sync {
    fn filter(&self, key: &String, row: &Vec<String>) -> bool;
}

// lock handed out by `fetch_acquire()`, callers pass it back through
// `save_release()` so one read-modify-write cycle excludes all other
// operations on this store
pub struct AppInMemDstoreLock {
    guard: OwnedMutexGuard<AllTables>,
}

#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;
    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;
    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;
    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError>;
    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError>;
    fn save_release(
        &self,
        data: AppInMemFetchedData,
        lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError>;
} // end of trait AbstInMemoryDStore

pub struct AppInMemoryDStore {
    max_items_per_table: u32,
    tables: Arc<AsyncMutex<AllTables>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            max_items_per_table: cfg.max_items,
            tables: Arc::new(AsyncMutex::new(HashMap::new())),
        }
    }

    fn _check_tables_exist(
        all: &AllTables,
        labels: impl Iterator<Item = impl AsRef<str>>,
    ) -> DefaultResult<(), AppError> {
        for label in labels {
            if !all.contains_key(label.as_ref()) {
                return Err(AppError {
                    code: AppErrorCode::DataTableNotExist,
                    detail: Some(label.as_ref().to_string()),
                });
            }
        }
        Ok(())
    }

    fn _apply_update(
        all: &mut AllTables,
        data: AppInMemUpdateData,
        max_items: u32,
    ) -> DefaultResult<usize, AppError> {
        Self::_check_tables_exist(all, data.keys())?;
        for (label, rows) in data.iter() {
            let table = all.get(label.as_str()).unwrap();
            let num_new = rows.keys().filter(|k| !table.contains_key(*k)).count();
            if table.len() + num_new > max_items as usize {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!("table:{}, limit:{}", label, max_items)),
                });
            }
        }
        let mut num_saved = 0usize;
        for (label, rows) in data {
            let table = all.get_mut(label.as_str()).unwrap();
            num_saved += rows.len();
            for (pkey, row) in rows {
                let _old = table.insert(pkey, row);
            }
        }
        Ok(num_saved)
    } // end of fn _apply_update

    fn _collect_fetched(
        all: &AllTables,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<AppInMemFetchedData, AppError> {
        Self::_check_tables_exist(all, keys.keys())?;
        let mut out = HashMap::new();
        for (label, pkeys) in keys {
            let table = all.get(label.as_str()).unwrap();
            let iter = pkeys
                .into_iter()
                .filter_map(|k| table.get(k.as_str()).map(|row| (k, row.clone())));
            let found: AppInMemFetchedSingleTable = HashMap::from_iter(iter);
            out.insert(label, found);
        }
        Ok(out)
    }
} // end of impl AppInMemoryDStore

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut all = self.tables.lock().await;
        if !all.contains_key(label) {
            all.insert(label.to_string(), HashMap::new());
        }
        Ok(())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut all = self.tables.lock().await;
        Self::_apply_update(&mut all, data, self.max_items_per_table)
    }

    async fn fetch(&self, keys: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let all = self.tables.lock().await;
        Self::_collect_fetched(&all, keys)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut all = self.tables.lock().await;
        Self::_check_tables_exist(&all, info.keys())?;
        let mut num_deleted = 0usize;
        for (label, pkeys) in info {
            let table = all.get_mut(label.as_str()).unwrap();
            for k in pkeys {
                if table.remove(k.as_str()).is_some() {
                    num_deleted += 1;
                }
            }
        }
        Ok(num_deleted)
    }

    async fn filter_keys(
        &self,
        table: String,
        op: &dyn AbsDStoreFilterKeyOp,
    ) -> DefaultResult<Vec<String>, AppError> {
        let all = self.tables.lock().await;
        Self::_check_tables_exist(&all, [table.as_str()].into_iter())?;
        let t = all.get(table.as_str()).unwrap();
        let out = t
            .iter()
            .filter(|(k, row)| op.filter(k, row))
            .map(|(k, _row)| k.clone())
            .collect::<Vec<_>>();
        Ok(out)
    }

    async fn fetch_acquire(
        &self,
        keys: AppInMemFetchKeys,
    ) -> DefaultResult<(AppInMemFetchedData, AppInMemDstoreLock), AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let data = Self::_collect_fetched(&guard, keys)?;
        Ok((data, AppInMemDstoreLock { guard }))
    }

    fn save_release(
        &self,
        data: AppInMemFetchedData,
        mut lock: AppInMemDstoreLock,
    ) -> DefaultResult<usize, AppError> {
        let out = Self::_apply_update(&mut lock.guard, data, self.max_items_per_table);
        drop(lock);
        out
    }
} // end of impl AbstInMemoryDStore for AppInMemoryDStore

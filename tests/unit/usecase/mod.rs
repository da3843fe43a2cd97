mod manage_notification;

use std::boxed::Box;
use std::cell::Cell;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local};
use tokio::sync::Mutex as AsyncMutex;

use artisanhub::constant::app_meta;
use artisanhub::error::{AppError, AppErrorCode};
use artisanhub::model::{NotificationModel, OrderModel, UserProfileModel};
use artisanhub::repository::{
    AbsNotificationRepo, AbsOrderRepo, AbsUserProfileRepo, AppOrderItemPatchResult,
    AppOrderRepoUpdateItemFunc, OrderItemStatusPatch,
};
use artisanhub::{AppAuthedClaim, AppUserRole};

pub(crate) fn ut_setup_auth_claim(profile: u32, role: AppUserRole) -> AppAuthedClaim {
    let now = Local::now().fixed_offset();
    AppAuthedClaim {
        profile,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(10)).timestamp(),
        aud: vec![app_meta::LABAL.to_string()],
        role,
        nickname: Some("Ines Ferrand".to_string()),
        email: Some("ines@crafted.example".to_string()),
    }
}

fn ut_mock_exhausted(fn_label: &str) -> AppError {
    AppError {
        code: AppErrorCode::InvalidInput,
        detail: Some(fn_label.to_string()),
    }
}

pub(crate) struct MockOrderRepo {
    _mocked_create: AsyncMutex<Cell<Vec<DefaultResult<(), AppError>>>>,
    _mocked_fetch_one: AsyncMutex<Cell<Vec<DefaultResult<Option<OrderModel>, AppError>>>>,
    _mocked_fetch_many: AsyncMutex<Cell<Vec<DefaultResult<Vec<OrderModel>, AppError>>>>,
    _mocked_patch: AsyncMutex<Cell<Vec<DefaultResult<AppOrderItemPatchResult, AppError>>>>,
}

impl MockOrderRepo {
    pub(crate) fn build(
        create_r: Vec<DefaultResult<(), AppError>>,
        fetch_one_r: Vec<DefaultResult<Option<OrderModel>, AppError>>,
        fetch_many_r: Vec<DefaultResult<Vec<OrderModel>, AppError>>,
        patch_r: Vec<DefaultResult<AppOrderItemPatchResult, AppError>>,
    ) -> Self {
        Self {
            _mocked_create: AsyncMutex::new(Cell::new(create_r)),
            _mocked_fetch_one: AsyncMutex::new(Cell::new(fetch_one_r)),
            _mocked_fetch_many: AsyncMutex::new(Cell::new(fetch_many_r)),
            _mocked_patch: AsyncMutex::new(Cell::new(patch_r)),
        }
    }
}

#[async_trait]
impl AbsOrderRepo for MockOrderRepo {
    async fn create(&self, _order: OrderModel) -> DefaultResult<(), AppError> {
        let mut g = self._mocked_create.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockOrderRepo::create"))
        } else {
            scripted.remove(0)
        }
    }
    async fn fetch_by_id(&self, _oid: &str) -> DefaultResult<Option<OrderModel>, AppError> {
        let mut g = self._mocked_fetch_one.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockOrderRepo::fetch_by_id"))
        } else {
            scripted.remove(0)
        }
    }
    async fn fetch_by_buyer(&self, _buyer_id: u32) -> DefaultResult<Vec<OrderModel>, AppError> {
        let mut g = self._mocked_fetch_many.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockOrderRepo::fetch_by_buyer"))
        } else {
            scripted.remove(0)
        }
    }
    async fn fetch_by_artisan(&self, _artisan_id: u32) -> DefaultResult<Vec<OrderModel>, AppError> {
        let mut g = self._mocked_fetch_many.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockOrderRepo::fetch_by_artisan"))
        } else {
            scripted.remove(0)
        }
    }
    async fn update_item_status(
        &self,
        _oid: &str,
        _patch: OrderItemStatusPatch,
        _cb: AppOrderRepoUpdateItemFunc,
    ) -> DefaultResult<AppOrderItemPatchResult, AppError> {
        let mut g = self._mocked_patch.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockOrderRepo::update_item_status"))
        } else {
            scripted.remove(0)
        }
    }
} // end of impl AbsOrderRepo for MockOrderRepo

pub(crate) struct MockNotificationRepo {
    // alerts passed to `create_many`, shared with the test body so it
    // can inspect them after the use case consumed the repo
    _saved: Arc<AsyncMutex<Vec<NotificationModel>>>,
    _mocked_create_err: AsyncMutex<Cell<Vec<AppError>>>,
    _mocked_fetch_latest: AsyncMutex<Cell<Vec<DefaultResult<Vec<NotificationModel>, AppError>>>>,
    _mocked_fetch_one: AsyncMutex<Cell<Vec<DefaultResult<Option<NotificationModel>, AppError>>>>,
    _mocked_mark_read: AsyncMutex<Cell<Vec<DefaultResult<Option<NotificationModel>, AppError>>>>,
    _mocked_mark_all: AsyncMutex<Cell<Vec<DefaultResult<usize, AppError>>>>,
}

impl MockNotificationRepo {
    pub(crate) fn build(
        create_errs: Vec<AppError>,
        fetch_latest_r: Vec<DefaultResult<Vec<NotificationModel>, AppError>>,
        fetch_one_r: Vec<DefaultResult<Option<NotificationModel>, AppError>>,
        mark_read_r: Vec<DefaultResult<Option<NotificationModel>, AppError>>,
        mark_all_r: Vec<DefaultResult<usize, AppError>>,
    ) -> (Self, Arc<AsyncMutex<Vec<NotificationModel>>>) {
        let saved = Arc::new(AsyncMutex::new(Vec::new()));
        let obj = Self {
            _saved: saved.clone(),
            _mocked_create_err: AsyncMutex::new(Cell::new(create_errs)),
            _mocked_fetch_latest: AsyncMutex::new(Cell::new(fetch_latest_r)),
            _mocked_fetch_one: AsyncMutex::new(Cell::new(fetch_one_r)),
            _mocked_mark_read: AsyncMutex::new(Cell::new(mark_read_r)),
            _mocked_mark_all: AsyncMutex::new(Cell::new(mark_all_r)),
        };
        (obj, saved)
    }
}

#[async_trait]
impl AbsNotificationRepo for MockNotificationRepo {
    async fn create_many(&self, items: Vec<NotificationModel>) -> DefaultResult<usize, AppError> {
        let mut g = self._mocked_create_err.lock().await;
        let scripted = g.get_mut();
        if !scripted.is_empty() {
            return Err(scripted.remove(0));
        }
        let num = items.len();
        let mut saved = self._saved.lock().await;
        saved.extend(items);
        Ok(num)
    }
    async fn fetch_latest_by_user(
        &self,
        _usr_id: u32,
        _limit: usize,
    ) -> DefaultResult<Vec<NotificationModel>, AppError> {
        let mut g = self._mocked_fetch_latest.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockNotificationRepo::fetch_latest"))
        } else {
            scripted.remove(0)
        }
    }
    async fn fetch_by_id(&self, _id: &str) -> DefaultResult<Option<NotificationModel>, AppError> {
        let mut g = self._mocked_fetch_one.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockNotificationRepo::fetch_by_id"))
        } else {
            scripted.remove(0)
        }
    }
    async fn mark_read(&self, _id: &str) -> DefaultResult<Option<NotificationModel>, AppError> {
        let mut g = self._mocked_mark_read.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockNotificationRepo::mark_read"))
        } else {
            scripted.remove(0)
        }
    }
    async fn mark_all_read(&self, _usr_id: u32) -> DefaultResult<usize, AppError> {
        let mut g = self._mocked_mark_all.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockNotificationRepo::mark_all_read"))
        } else {
            scripted.remove(0)
        }
    }
} // end of impl AbsNotificationRepo for MockNotificationRepo

pub(crate) struct MockUserProfileRepo {
    _mocked_save: AsyncMutex<Cell<Vec<DefaultResult<(), AppError>>>>,
    _mocked_fetch_many: AsyncMutex<Cell<Vec<DefaultResult<Vec<UserProfileModel>, AppError>>>>,
}

impl MockUserProfileRepo {
    pub(crate) fn build(
        save_r: Vec<DefaultResult<(), AppError>>,
        fetch_many_r: Vec<DefaultResult<Vec<UserProfileModel>, AppError>>,
    ) -> Self {
        Self {
            _mocked_save: AsyncMutex::new(Cell::new(save_r)),
            _mocked_fetch_many: AsyncMutex::new(Cell::new(fetch_many_r)),
        }
    }
}

#[async_trait]
impl AbsUserProfileRepo for MockUserProfileRepo {
    async fn save(&self, _profile: UserProfileModel) -> DefaultResult<(), AppError> {
        let mut g = self._mocked_save.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockUserProfileRepo::save"))
        } else {
            scripted.remove(0)
        }
    }
    async fn fetch(&self, _usr_id: u32) -> DefaultResult<Option<UserProfileModel>, AppError> {
        Err(AppError {
            code: AppErrorCode::NotImplemented,
            detail: None,
        })
    }
    async fn fetch_many(
        &self,
        _usr_ids: Vec<u32>,
    ) -> DefaultResult<Vec<UserProfileModel>, AppError> {
        let mut g = self._mocked_fetch_many.lock().await;
        let scripted = g.get_mut();
        if scripted.is_empty() {
            Err(ut_mock_exhausted("MockUserProfileRepo::fetch_many"))
        } else {
            scripted.remove(0)
        }
    }
}

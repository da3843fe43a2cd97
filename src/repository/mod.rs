mod in_mem;

use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::{
    NotificationModel, OrderItemModel, OrderItemStatus, OrderItemUpdateError, OrderModel,
    UserProfileModel,
};
use crate::AppDataStoreContext;

// make in-memory repos visible for testing purpose
pub use in_mem::notification::NotificationInMemRepo;
pub use in_mem::order::OrderInMemRepo;
pub use in_mem::profile::UserProfileInMemRepo;

pub struct OrderItemStatusPatch {
    pub item_id: u32,
    pub new_status: OrderItemStatus,
    pub acting_user: u32,
}

pub enum AppOrderItemPatchResult {
    OrderNotFound,
    Patched(OrderItemModel),
    Rejected(OrderItemUpdateError),
}

// callback which applies a patch to a fully loaded order model, the
// repository runs it while holding the storage lock so no concurrent
// request observes the order half-updated
pub type AppOrderRepoUpdateItemFunc =
    fn(
        &mut OrderModel,
        OrderItemStatusPatch,
    ) -> DefaultResult<OrderItemModel, OrderItemUpdateError>;

// the repository instance may be used across an await, the future
// created by app callers has to be able to pass to different threads,
// it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError>;

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<Option<OrderModel>, AppError>;

    /// all orders placed by the given buyer, most recent first
    async fn fetch_by_buyer(&self, buyer_id: u32) -> DefaultResult<Vec<OrderModel>, AppError>;

    /// all orders containing at least one line item belonging to the
    /// given artisan, most recent first
    async fn fetch_by_artisan(&self, artisan_id: u32)
        -> DefaultResult<Vec<OrderModel>, AppError>;

    async fn update_item_status(
        &self,
        oid: &str,
        patch: OrderItemStatusPatch,
        cb: AppOrderRepoUpdateItemFunc,
    ) -> DefaultResult<AppOrderItemPatchResult, AppError>;
} // end of trait AbsOrderRepo

#[async_trait]
pub trait AbsNotificationRepo: Sync + Send {
    async fn create_many(&self, items: Vec<NotificationModel>) -> DefaultResult<usize, AppError>;

    /// most recent notifications of the user, capped to the given limit
    async fn fetch_latest_by_user(
        &self,
        usr_id: u32,
        limit: usize,
    ) -> DefaultResult<Vec<NotificationModel>, AppError>;

    async fn fetch_by_id(&self, id: &str) -> DefaultResult<Option<NotificationModel>, AppError>;

    async fn mark_read(&self, id: &str) -> DefaultResult<Option<NotificationModel>, AppError>;

    /// returns the number of notifications which flipped from unread
    /// to read, already-read ones do not count
    async fn mark_all_read(&self, usr_id: u32) -> DefaultResult<usize, AppError>;
} // end of trait AbsNotificationRepo

#[async_trait]
pub trait AbsUserProfileRepo: Sync + Send {
    async fn save(&self, profile: UserProfileModel) -> DefaultResult<(), AppError>;

    async fn fetch(&self, usr_id: u32) -> DefaultResult<Option<UserProfileModel>, AppError>;

    async fn fetch_many(
        &self,
        usr_ids: Vec<u32>,
    ) -> DefaultResult<Vec<UserProfileModel>, AppError>;
}

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub async fn app_repo_notification(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsNotificationRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = NotificationInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

pub async fn app_repo_user_profile(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsUserProfileRepo>, AppError> {
    if let Some(m) = &ds.in_mem {
        let obj = UserProfileInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("unknown-type".to_string()),
        })
    }
}

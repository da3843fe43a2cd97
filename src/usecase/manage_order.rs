use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;

use crate::api::web::dto::{
    BuyerSummaryDto, OrderArtisanViewDto, OrderCreateReqData, OrderCreateRespErrorDto,
    OrderRespDto,
};
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogLevel};
use crate::model::{
    NotificationModel, OrderItemModel, OrderItemStatus, OrderItemUpdateError, OrderModel,
    UserProfileModel,
};
use crate::repository::{
    AbsNotificationRepo, AbsOrderRepo, AbsUserProfileRepo, AppOrderItemPatchResult,
    OrderItemStatusPatch,
};
use crate::{AppAuthedClaim, AppSharedState, AppUserRole};

pub enum CreateOrderUcError {
    ReqContent(OrderCreateRespErrorDto),
    Server(Vec<AppError>),
}

pub struct CreateOrderUseCase {
    pub glb_state: AppSharedState,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_notify: Box<dyn AbsNotificationRepo>,
    pub repo_profile: Box<dyn AbsUserProfileRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl CreateOrderUseCase {
    pub async fn execute(
        self,
        req: OrderCreateReqData,
    ) -> DefaultResult<OrderRespDto, CreateOrderUcError> {
        let buyer_id = self.auth_claim.profile;
        let oid = OrderModel::generate_order_id(app_meta::MACHINE_CODE);
        let order = OrderModel::try_from_request(oid, buyer_id, req)
            .map_err(CreateOrderUcError::ReqContent)?;
        if let Err(e) = self.repo_order.create(order.clone()).await {
            let logctx_p = self.glb_state.log_context().clone();
            app_log_event!(logctx_p, AppLogLevel::ERROR, "repo-fail-save: {e}");
            return Err(CreateOrderUcError::Server(vec![e]));
        }
        // the order is durable at this point, the profile replica and
        // the artisan alerts are best-effort follow-ups
        self.refresh_buyer_profile().await;
        self.fanout_new_order_alerts(&order).await;
        Ok((&order).into())
    } // end of fn execute

    async fn refresh_buyer_profile(&self) {
        let profile = UserProfileModel::from_claim(&self.auth_claim);
        if let Err(e) = self.repo_profile.save(profile).await {
            let logctx_p = self.glb_state.log_context().clone();
            app_log_event!(logctx_p, AppLogLevel::WARNING, "profile-replica-fail: {e}");
        }
    }

    async fn fanout_new_order_alerts(&self, order: &OrderModel) {
        let alerts = order
            .artisan_item_counts()
            .into_iter()
            .map(|(artisan_id, num_items)| {
                NotificationModel::new_order_alert(artisan_id, num_items, order.id.as_str())
            })
            .collect::<Vec<_>>();
        let expect_cnt = alerts.len();
        match self.repo_notify.create_many(alerts).await {
            Ok(num) => {
                if num != expect_cnt {
                    let logctx_p = self.glb_state.log_context().clone();
                    app_log_event!(
                        logctx_p,
                        AppLogLevel::WARNING,
                        "notify-fanout-partial: {num}/{expect_cnt}"
                    );
                }
            }
            Err(e) => {
                let logctx_p = self.glb_state.log_context().clone();
                app_log_event!(logctx_p, AppLogLevel::ERROR, "notify-fanout-fail: {e}");
            }
        }
    } // end of fn fanout_new_order_alerts
} // end of impl CreateOrderUseCase

pub struct ListBuyerOrdersUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl ListBuyerOrdersUseCase {
    pub async fn execute(self) -> DefaultResult<Vec<OrderRespDto>, AppError> {
        let found = self
            .repo_order
            .fetch_by_buyer(self.auth_claim.profile)
            .await?;
        Ok(found.iter().map(OrderRespDto::from).collect())
    }
}

pub enum ArtisanOrderListUcResult {
    PermissionDeny,
    Success(Vec<OrderArtisanViewDto>),
}

pub struct ListArtisanOrdersUseCase {
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_profile: Box<dyn AbsUserProfileRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl ListArtisanOrdersUseCase {
    pub async fn execute(self) -> DefaultResult<ArtisanOrderListUcResult, AppError> {
        if !self.auth_claim.contain_role(AppUserRole::Artisan) {
            return Ok(ArtisanOrderListUcResult::PermissionDeny);
        }
        let found = self
            .repo_order
            .fetch_by_artisan(self.auth_claim.profile)
            .await?;
        let mut buyer_ids = found.iter().map(|o| o.buyer_id).collect::<Vec<_>>();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();
        let profiles = self.repo_profile.fetch_many(buyer_ids).await?;
        let profile_map = profiles
            .into_iter()
            .map(|p| (p.usr_id, p))
            .collect::<HashMap<_, _>>();
        let views = found
            .iter()
            .map(|o| {
                let buyer = profile_map
                    .get(&o.buyer_id)
                    .map(BuyerSummaryDto::from)
                    .unwrap_or_else(|| BuyerSummaryDto {
                        name: format!("user-{}", o.buyer_id),
                        email: String::new(),
                    });
                o.into_artisan_view(buyer)
            })
            .collect::<Vec<_>>();
        Ok(ArtisanOrderListUcResult::Success(views))
    } // end of fn execute
} // end of impl ListArtisanOrdersUseCase

pub enum UpdateItemStatusUcResult {
    PermissionDeny,
    InvalidStatus,
    OrderNotFound,
    ItemNotFound,
    NotOwner,
    Success(OrderRespDto),
}

pub struct UpdateItemStatusUseCase {
    pub glb_state: AppSharedState,
    pub repo_order: Box<dyn AbsOrderRepo>,
    pub repo_notify: Box<dyn AbsNotificationRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl UpdateItemStatusUseCase {
    pub async fn execute(
        self,
        oid: String,
        item_id: u32,
        status_label: String,
    ) -> DefaultResult<UpdateItemStatusUcResult, AppError> {
        if !self.auth_claim.contain_role(AppUserRole::Artisan) {
            return Ok(UpdateItemStatusUcResult::PermissionDeny);
        }
        let new_status = match OrderItemStatus::from_str(status_label.as_str()) {
            Ok(s) => s,
            Err(_e) => return Ok(UpdateItemStatusUcResult::InvalidStatus),
        };
        let patch = OrderItemStatusPatch {
            item_id,
            new_status,
            acting_user: self.auth_claim.profile,
        };
        let result = self
            .repo_order
            .update_item_status(oid.as_str(), patch, |o, p| {
                o.update_item_status(p.item_id, p.new_status, p.acting_user)
            })
            .await?;
        match result {
            AppOrderItemPatchResult::OrderNotFound => Ok(UpdateItemStatusUcResult::OrderNotFound),
            AppOrderItemPatchResult::Rejected(OrderItemUpdateError::ItemNotFound) => {
                Ok(UpdateItemStatusUcResult::ItemNotFound)
            }
            AppOrderItemPatchResult::Rejected(OrderItemUpdateError::NotArtisanOwner) => {
                Ok(UpdateItemStatusUcResult::NotOwner)
            }
            AppOrderItemPatchResult::Patched(item) => {
                let order = self
                    .repo_order
                    .fetch_by_id(oid.as_str())
                    .await?
                    .ok_or(AppError {
                        code: AppErrorCode::OrderNotExist,
                        detail: Some(oid.clone()),
                    })?;
                self.notify_buyer(&order, &item).await;
                Ok(UpdateItemStatusUcResult::Success((&order).into()))
            }
        }
    } // end of fn execute

    async fn notify_buyer(&self, order: &OrderModel, item: &OrderItemModel) {
        let alert = NotificationModel::status_update_alert(
            order.buyer_id,
            item.title.as_str(),
            item.status,
            order.id.as_str(),
        );
        if let Err(e) = self.repo_notify.create_many(vec![alert]).await {
            let logctx_p = self.glb_state.log_context().clone();
            app_log_event!(logctx_p, AppLogLevel::ERROR, "status-alert-fail: {e}");
        }
    }
} // end of impl UpdateItemStatusUseCase

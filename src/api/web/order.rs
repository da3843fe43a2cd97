use axum::debug_handler;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::{
    header as HttpHeader, HeaderMap as HttpHeaderMap, HeaderValue as HttpHeaderValue,
    StatusCode as HttpStatusCode,
};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::api::web::dto::{OrderCreateReqData, OrderItemStatusUpdateReqDto};
use crate::constant as AppConst;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::{app_repo_notification, app_repo_order, app_repo_user_profile};
use crate::usecase::{
    ArtisanOrderListUcResult, CreateOrderUcError, CreateOrderUseCase, ListArtisanOrdersUseCase,
    ListBuyerOrdersUseCase, UpdateItemStatusUcResult, UpdateItemStatusUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

pub(super) fn resp_json_headers() -> HttpHeaderMap {
    let mut hdr_map = HttpHeaderMap::new();
    hdr_map.insert(
        HttpHeader::CONTENT_TYPE,
        HttpHeaderValue::from_static(AppConst::HTTP_CONTENT_TYPE_JSON),
    );
    hdr_map
}

pub(super) fn serialize_or_500<T: Serialize>(
    value: &T,
    ok_status: HttpStatusCode,
) -> (HttpStatusCode, String) {
    match serde_json::to_string(value) {
        Ok(s) => (ok_status, s),
        Err(_e) => (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            r#"{"reason":"serialization-failure"}"#.to_string(),
        ),
    }
}

// always to specify state type explicitly to the debug macro
#[debug_handler(state = AppSharedState)]
pub(super) async fn create_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderCreateReqData>,
) -> impl IntoResponse {
    let usr_id = authed.profile;
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_notification(ds.clone()).await,
        app_repo_user_profile(ds.clone()).await,
    );
    let (resp_status_code, serial_resp_body) =
        if let (Ok(repo_order), Ok(repo_notify), Ok(repo_profile)) = results {
            let uc = CreateOrderUseCase {
                glb_state: _appstate,
                repo_order,
                repo_notify,
                repo_profile,
                auth_claim: authed,
            };
            match uc.execute(req_body).await {
                Ok(value) => serialize_or_500(&value, HttpStatusCode::CREATED),
                Err(CreateOrderUcError::ReqContent(value)) => {
                    serialize_or_500(&value, HttpStatusCode::BAD_REQUEST)
                }
                Err(CreateOrderUcError::Server(errors)) => {
                    let msg = errors
                        .into_iter()
                        .map(|e| format!("{:?}", e))
                        .collect::<Vec<_>>()
                        .join(", ");
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "{msg}");
                    (
                        HttpStatusCode::INTERNAL_SERVER_ERROR,
                        r#"{"reason":"internal-error"}"#.to_string(),
                    )
                }
            }
        } else {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "repository init failure, user:{}",
                usr_id
            );
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                r#"{"reason":"internal-error"}"#.to_string(),
            )
        };
    (resp_status_code, resp_json_headers(), serial_resp_body)
} // end of create_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_buyer_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_order(ds.clone()).await {
        Ok(repo_order) => {
            let uc = ListBuyerOrdersUseCase {
                repo_order,
                auth_claim: authed,
            };
            match uc.execute().await {
                Ok(value) => serialize_or_500(&value, HttpStatusCode::OK),
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "list-buyer-orders: {e}");
                    (
                        HttpStatusCode::INTERNAL_SERVER_ERROR,
                        r#"{"reason":"internal-error"}"#.to_string(),
                    )
                }
            }
        }
        Err(e) => {
            app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure: {e}");
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                r#"{"reason":"internal-error"}"#.to_string(),
            )
        }
    };
    (resp_status_code, resp_json_headers(), serial_resp_body)
} // end of list_buyer_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_artisan_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_user_profile(ds.clone()).await,
    );
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_order), Ok(repo_profile)) = results
    {
        let uc = ListArtisanOrdersUseCase {
            repo_order,
            repo_profile,
            auth_claim: authed,
        };
        match uc.execute().await {
            Ok(ArtisanOrderListUcResult::Success(value)) => {
                serialize_or_500(&value, HttpStatusCode::OK)
            }
            Ok(ArtisanOrderListUcResult::PermissionDeny) => (
                HttpStatusCode::FORBIDDEN,
                r#"{"reason":"artisan-role-required"}"#.to_string(),
            ),
            Err(e) => {
                app_log_event!(log_ctx, AppLogLevel::ERROR, "list-artisan-orders: {e}");
                (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"reason":"internal-error"}"#.to_string(),
                )
            }
        }
    } else {
        app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure");
        (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            r#"{"reason":"internal-error"}"#.to_string(),
        )
    };
    (resp_status_code, resp_json_headers(), serial_resp_body)
} // end of list_artisan_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn item_status_patch_handler(
    ExtractPath((oid, item_id)): ExtractPath<(String, u32)>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
    ExtractJson(req_body): ExtractJson<OrderItemStatusUpdateReqDto>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let results = (
        app_repo_order(ds.clone()).await,
        app_repo_notification(ds.clone()).await,
    );
    let (resp_status_code, serial_resp_body) = if let (Ok(repo_order), Ok(repo_notify)) = results
    {
        let uc = UpdateItemStatusUseCase {
            glb_state: _appstate,
            repo_order,
            repo_notify,
            auth_claim: authed,
        };
        match uc.execute(oid, item_id, req_body.status).await {
            Ok(UpdateItemStatusUcResult::Success(value)) => {
                serialize_or_500(&value, HttpStatusCode::OK)
            }
            Ok(UpdateItemStatusUcResult::PermissionDeny) => (
                HttpStatusCode::FORBIDDEN,
                r#"{"reason":"artisan-role-required"}"#.to_string(),
            ),
            Ok(UpdateItemStatusUcResult::InvalidStatus) => (
                HttpStatusCode::BAD_REQUEST,
                r#"{"reason":"unknown-status"}"#.to_string(),
            ),
            Ok(UpdateItemStatusUcResult::OrderNotFound) => (
                HttpStatusCode::NOT_FOUND,
                r#"{"reason":"order-not-found"}"#.to_string(),
            ),
            Ok(UpdateItemStatusUcResult::ItemNotFound) => (
                HttpStatusCode::NOT_FOUND,
                r#"{"reason":"item-not-found"}"#.to_string(),
            ),
            Ok(UpdateItemStatusUcResult::NotOwner) => (
                HttpStatusCode::UNAUTHORIZED,
                r#"{"reason":"not-item-owner"}"#.to_string(),
            ),
            Err(e) => {
                app_log_event!(log_ctx, AppLogLevel::ERROR, "item-status-patch: {e}");
                (
                    HttpStatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"reason":"internal-error"}"#.to_string(),
                )
            }
        }
    } else {
        app_log_event!(log_ctx, AppLogLevel::ERROR, "repository init failure");
        (
            HttpStatusCode::INTERNAL_SERVER_ERROR,
            r#"{"reason":"internal-error"}"#.to_string(),
        )
    };
    (resp_status_code, resp_json_headers(), serial_resp_body)
} // end of item_status_patch_handler

use axum::debug_handler;
use axum::extract::{Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use super::order::{resp_json_headers, serialize_or_500};
use crate::api::web::dto::NotificationsMarkedRespDto;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_notification;
use crate::usecase::{
    ListNotificationsUseCase, MarkAllNotificationsReadUseCase, MarkNotificationReadUcResult,
    MarkNotificationReadUseCase,
};
use crate::{AppAuthedClaim, AppSharedState};

#[debug_handler(state = AppSharedState)]
pub(super) async fn list_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_notification(ds.clone()).await {
        Ok(repo) => {
            let uc = ListNotificationsUseCase {
                repo,
                auth_claim: authed,
            };
            match uc.execute().await {
                Ok(value) => serialize_or_500(&value, HttpStatusCode::OK),
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "list-notifications: {e}");
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
} // end of list_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn mark_read_handler(
    ExtractPath(notification_id): ExtractPath<String>,
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_notification(ds.clone()).await {
        Ok(repo) => {
            let uc = MarkNotificationReadUseCase {
                repo,
                auth_claim: authed,
            };
            match uc.execute(notification_id).await {
                Ok(MarkNotificationReadUcResult::Success(value)) => {
                    serialize_or_500(&value, HttpStatusCode::OK)
                }
                Ok(MarkNotificationReadUcResult::NotFound) => (
                    HttpStatusCode::NOT_FOUND,
                    r#"{"reason":"notification-not-found"}"#.to_string(),
                ),
                Ok(MarkNotificationReadUcResult::NotOwner) => (
                    HttpStatusCode::UNAUTHORIZED,
                    r#"{"reason":"not-notification-owner"}"#.to_string(),
                ),
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "mark-notification-read: {e}");
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
} // end of mark_read_handler

#[debug_handler(state = AppSharedState)]
pub(super) async fn mark_all_read_handler(
    authed: AppAuthedClaim,
    ExtractState(_appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let log_ctx = _appstate.log_context().clone();
    let ds = _appstate.datastore();
    let (resp_status_code, serial_resp_body) = match app_repo_notification(ds.clone()).await {
        Ok(repo) => {
            let uc = MarkAllNotificationsReadUseCase {
                repo,
                auth_claim: authed,
            };
            match uc.execute().await {
                Ok(num_marked) => {
                    let value = NotificationsMarkedRespDto { num_marked };
                    serialize_or_500(&value, HttpStatusCode::OK)
                }
                Err(e) => {
                    app_log_event!(log_ctx, AppLogLevel::ERROR, "mark-all-read: {e}");
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
} // end of mark_all_read_handler

use std::collections::HashMap;

use axum::routing::{get, patch, post, MethodRouter};

use crate::constant::api::web as WebConst;
use crate::{AppSharedState, WebApiHdlrLabel};

pub mod dto;
mod notification;
mod order;

pub type ApiRouteType = MethodRouter<AppSharedState>;
pub type ApiRouteTableType = HashMap<WebApiHdlrLabel, ApiRouteType>;

pub fn route_table() -> ApiRouteTableType {
    let mut out: ApiRouteTableType = HashMap::new();
    out.insert(WebConst::CREATE_NEW_ORDER, post(order::create_handler));
    out.insert(WebConst::LIST_BUYER_ORDERS, get(order::list_buyer_handler));
    out.insert(
        WebConst::LIST_ARTISAN_ORDERS,
        get(order::list_artisan_handler),
    );
    out.insert(
        WebConst::UPDATE_ORDER_ITEM_STATUS,
        patch(order::item_status_patch_handler),
    );
    out.insert(
        WebConst::LIST_NOTIFICATIONS,
        get(notification::list_handler),
    );
    out.insert(
        WebConst::MARK_NOTIFICATION_READ,
        patch(notification::mark_read_handler),
    );
    out.insert(
        WebConst::MARK_ALL_NOTIFICATIONS_READ,
        patch(notification::mark_all_read_handler),
    );
    out
}

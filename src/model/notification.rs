use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local as LocalTime};

use crate::api::web::dto::NotificationRespDto;
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::generate_custom_uid;
use crate::model::OrderItemStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    NewOrder,
    OrderStatusUpdate,
    System,
}

impl NotificationKind {
    pub fn as_wire_label(&self) -> &'static str {
        match self {
            Self::NewOrder => "new_order",
            Self::OrderStatusUpdate => "order_status_update",
            Self::System => "system",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = AppError;
    fn from_str(s: &str) -> DefaultResult<Self, Self::Err> {
        match s {
            "new_order" => Ok(Self::NewOrder),
            "order_status_update" => Ok(Self::OrderStatusUpdate),
            "system" => Ok(Self::System),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("notification-kind:{}", s)),
            }),
        }
    }
}

#[derive(Clone)]
pub struct NotificationModel {
    pub id_: String,
    pub user_id: u32,
    pub message: String,
    pub read: bool,
    pub kind: NotificationKind,
    pub related_order: Option<String>,
    pub create_time: DateTime<FixedOffset>,
}

impl NotificationModel {
    fn generate_id() -> String {
        generate_custom_uid(app_meta::MACHINE_CODE)
            .simple()
            .to_string()
    }

    /// alert for an artisan when a buyer places an order which contains
    /// any of the artisan's items, the count covers only that artisan's
    /// line items, not the whole order
    pub fn new_order_alert(artisan_id: u32, num_items: usize, oid: &str) -> Self {
        Self {
            id_: Self::generate_id(),
            user_id: artisan_id,
            message: format!("You have received a new order with {} items.", num_items),
            read: false,
            kind: NotificationKind::NewOrder,
            related_order: Some(oid.to_string()),
            create_time: LocalTime::now().fixed_offset(),
        }
    }

    /// alert for a buyer when an artisan moves one of the buyer's line
    /// items to another status
    pub fn status_update_alert(
        buyer_id: u32,
        item_title: &str,
        status: OrderItemStatus,
        oid: &str,
    ) -> Self {
        Self {
            id_: Self::generate_id(),
            user_id: buyer_id,
            message: format!(
                "The status of your item \"{}\" has been updated to {}.",
                item_title,
                status.as_wire_label()
            ),
            read: false,
            kind: NotificationKind::OrderStatusUpdate,
            related_order: Some(oid.to_string()),
            create_time: LocalTime::now().fixed_offset(),
        }
    }
} // end of impl NotificationModel

impl From<&NotificationModel> for NotificationRespDto {
    fn from(value: &NotificationModel) -> NotificationRespDto {
        NotificationRespDto {
            id: value.id_.clone(),
            user: value.user_id,
            message: value.message.clone(),
            is_read: value.read,
            kind: value.kind.as_wire_label().to_string(),
            related_order: value.related_order.clone(),
            created_at: value.create_time.to_rfc3339(),
        }
    }
}

pub mod app_meta {
    pub const LABAL: &str = "artisanhub";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_ORDER_ITEMS_PER_REQUEST: usize = 200;
    pub const MAX_NOTIFICATIONS_PER_FETCH: usize = 20;
}

pub(crate) mod api {
    use crate::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const CREATE_NEW_ORDER: WebApiHdlrLabel = "create_new_order";
        pub(crate) const LIST_BUYER_ORDERS: WebApiHdlrLabel = "list_buyer_orders";
        pub(crate) const LIST_ARTISAN_ORDERS: WebApiHdlrLabel = "list_artisan_orders";
        pub(crate) const UPDATE_ORDER_ITEM_STATUS: WebApiHdlrLabel = "update_order_item_status";
        pub(crate) const LIST_NOTIFICATIONS: WebApiHdlrLabel = "list_notifications";
        pub(crate) const MARK_NOTIFICATION_READ: WebApiHdlrLabel = "mark_notification_read";
        pub(crate) const MARK_ALL_NOTIFICATIONS_READ: WebApiHdlrLabel =
            "mark_all_notifications_read";
    }
} // end of inner-mod api

pub(crate) const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

pub mod logging {
    use serde::Deserialize;

    #[derive(Deserialize)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}

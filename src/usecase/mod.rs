mod manage_notification;
mod manage_order;

pub use manage_notification::{
    ListNotificationsUseCase, MarkAllNotificationsReadUseCase, MarkNotificationReadUcResult,
    MarkNotificationReadUseCase,
};
pub use manage_order::{
    ArtisanOrderListUcResult, CreateOrderUcError, CreateOrderUseCase, ListArtisanOrdersUseCase,
    ListBuyerOrdersUseCase, UpdateItemStatusUcResult, UpdateItemStatusUseCase,
};

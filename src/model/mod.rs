mod notification;
mod order;
mod profile;

pub use notification::{NotificationKind, NotificationModel};
pub use order::{
    OrderItemModel, OrderItemStatus, OrderItemUpdateError, OrderModel, PaymentMethod,
    ShippingAddressModel,
};
pub use profile::UserProfileModel;

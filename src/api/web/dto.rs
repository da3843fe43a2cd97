use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethodDto {
    #[default]
    Card,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct ShippingAddressDto {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrderItemReqDto {
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub qty: u32,
    pub product: String,
    pub artisan: u32,
}

#[derive(Deserialize, Serialize)]
pub struct OrderCreateReqData {
    pub order_items: Vec<OrderItemReqDto>,
    pub shipping_address: ShippingAddressDto,
    // the total comes from the frontend cart as-is, see the note
    // in `OrderModel::try_from_request`
    pub total_price: Decimal,
    #[serde(default)]
    pub payment_method: PaymentMethodDto,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
pub enum OrderNonFieldErrorReason {
    EmptyItems,
    TooManyItems,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
pub enum OrderItemErrorReason {
    ZeroQuantity,
    EmptyTitle,
    NegativePrice,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
pub enum AddrFieldErrorReason {
    Empty,
}

#[derive(Deserialize, Serialize, Default)]
pub struct ShippingAddrErrorDto {
    pub address: Option<AddrFieldErrorReason>,
    pub city: Option<AddrFieldErrorReason>,
    pub postal_code: Option<AddrFieldErrorReason>,
    pub country: Option<AddrFieldErrorReason>,
}

impl ShippingAddrErrorDto {
    pub fn any_field(&self) -> bool {
        self.address.is_some()
            || self.city.is_some()
            || self.postal_code.is_some()
            || self.country.is_some()
    }
}

#[derive(Deserialize, Serialize)]
pub struct OrderItemErrorDto {
    pub item_seq: u32,
    pub reason: OrderItemErrorReason,
}

#[derive(Deserialize, Serialize, Default)]
pub struct OrderCreateRespErrorDto {
    pub nonfield: Option<OrderNonFieldErrorReason>,
    pub order_items: Option<Vec<OrderItemErrorDto>>,
    pub shipping_address: Option<ShippingAddrErrorDto>,
}

#[derive(Deserialize, Serialize)]
pub struct OrderItemRespDto {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub qty: u32,
    pub product: String,
    pub artisan: u32,
    pub status: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrderRespDto {
    pub id: String,
    pub buyer: u32,
    pub order_items: Vec<OrderItemRespDto>,
    pub shipping_address: ShippingAddressDto,
    pub total_price: Decimal,
    pub payment_method: PaymentMethodDto,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Serialize)]
pub struct BuyerSummaryDto {
    pub name: String,
    pub email: String,
}

// the artisan view carries every item of the order, not only the ones
// belonging to the requesting artisan, frontend filters them for display
#[derive(Deserialize, Serialize)]
pub struct OrderArtisanViewDto {
    pub id: String,
    pub buyer: BuyerSummaryDto,
    pub order_items: Vec<OrderItemRespDto>,
    pub shipping_address: ShippingAddressDto,
    pub total_price: Decimal,
    pub payment_method: PaymentMethodDto,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrderItemStatusUpdateReqDto {
    pub status: String,
}

#[derive(Deserialize, Serialize)]
pub struct NotificationRespDto {
    pub id: String,
    pub user: u32,
    pub message: String,
    pub is_read: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub related_order: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize, Serialize)]
pub struct NotificationsMarkedRespDto {
    pub num_marked: usize,
}

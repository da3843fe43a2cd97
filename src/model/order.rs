use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local as LocalTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::web::dto::{
    AddrFieldErrorReason, BuyerSummaryDto, OrderArtisanViewDto, OrderCreateReqData,
    OrderCreateRespErrorDto, OrderItemErrorDto, OrderItemErrorReason, OrderItemReqDto,
    OrderItemRespDto, OrderNonFieldErrorReason, OrderRespDto, ShippingAddrErrorDto,
    ShippingAddressDto,
};
use crate::constant::limit;
use crate::error::{AppError, AppErrorCode};
use crate::generate_custom_uid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderItemStatus {
    Pending,
    Shipped,
    Delivered,
}

impl OrderItemStatus {
    pub fn as_wire_label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }
}

impl FromStr for OrderItemStatus {
    type Err = AppError;
    fn from_str(s: &str) -> DefaultResult<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            _others => Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("order-item-status:{}", s)),
            }),
        }
    }
}

impl From<OrderItemStatus> for u8 {
    fn from(value: OrderItemStatus) -> u8 {
        match value {
            OrderItemStatus::Pending => 0,
            OrderItemStatus::Shipped => 1,
            OrderItemStatus::Delivered => 2,
        }
    }
}
impl TryFrom<u8> for OrderItemStatus {
    type Error = AppError;
    fn try_from(value: u8) -> DefaultResult<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Shipped),
            2 => Ok(Self::Delivered),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("order-item-status:{}", value)),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Upi,
    CashOnDelivery,
}

impl From<PaymentMethod> for u8 {
    fn from(value: PaymentMethod) -> u8 {
        match value {
            PaymentMethod::Card => 0,
            PaymentMethod::Upi => 1,
            PaymentMethod::CashOnDelivery => 2,
        }
    }
}
impl TryFrom<u8> for PaymentMethod {
    type Error = AppError;
    fn try_from(value: u8) -> DefaultResult<Self, Self::Error> {
        match value {
            0 => Ok(Self::Card),
            1 => Ok(Self::Upi),
            2 => Ok(Self::CashOnDelivery),
            _others => Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!("payment-method:{}", value)),
            }),
        }
    }
}

#[derive(Clone)]
pub struct ShippingAddressModel {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddressModel {
    fn check_nonempty(label: &str) -> Option<AddrFieldErrorReason> {
        if label.trim().is_empty() {
            Some(AddrFieldErrorReason::Empty)
        } else {
            None
        }
    }
}

impl TryFrom<ShippingAddressDto> for ShippingAddressModel {
    type Error = ShippingAddrErrorDto;
    fn try_from(value: ShippingAddressDto) -> DefaultResult<Self, Self::Error> {
        let error = Self::Error {
            address: Self::check_nonempty(value.address.as_str()),
            city: Self::check_nonempty(value.city.as_str()),
            postal_code: Self::check_nonempty(value.postal_code.as_str()),
            country: Self::check_nonempty(value.country.as_str()),
        };
        if error.any_field() {
            Err(error)
        } else {
            Ok(Self {
                address: value.address,
                city: value.city,
                postal_code: value.postal_code,
                country: value.country,
            })
        }
    }
}

#[derive(Clone)]
pub struct OrderItemModel {
    /// sequence number of the item within its order, assigned from 1
    /// at order creation, never reused
    pub id_: u32,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub qty: u32,
    pub product_id: String,
    pub artisan_id: u32,
    pub status: OrderItemStatus,
}

impl OrderItemModel {
    fn try_from_request(seq: u32, value: OrderItemReqDto) -> DefaultResult<Self, OrderItemErrorDto> {
        let reason = if value.qty == 0 {
            Some(OrderItemErrorReason::ZeroQuantity)
        } else if value.title.trim().is_empty() {
            Some(OrderItemErrorReason::EmptyTitle)
        } else if value.price.is_sign_negative() {
            Some(OrderItemErrorReason::NegativePrice)
        } else {
            None
        };
        if let Some(reason) = reason {
            Err(OrderItemErrorDto {
                item_seq: seq,
                reason,
            })
        } else {
            Ok(Self {
                id_: seq,
                title: value.title,
                image: value.image,
                price: value.price,
                qty: value.qty,
                product_id: value.product,
                artisan_id: value.artisan,
                status: OrderItemStatus::Pending,
            })
        }
    } // end of fn try_from_request
}

#[derive(Debug, PartialEq, Eq)]
pub enum OrderItemUpdateError {
    ItemNotFound,
    NotArtisanOwner,
}

#[derive(Clone)]
pub struct OrderModel {
    pub id: String,
    pub buyer_id: u32,
    pub items: Vec<OrderItemModel>,
    pub shipping: ShippingAddressModel,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub create_time: DateTime<FixedOffset>,
    pub update_time: DateTime<FixedOffset>,
}

impl OrderModel {
    pub fn generate_order_id(machine_code: u8) -> String {
        let oid = generate_custom_uid(machine_code);
        Self::hex_str_order_id(oid)
    }
    fn hex_str_order_id(oid: Uuid) -> String {
        let bs = oid.into_bytes();
        bs.into_iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<String>>()
            .join("")
    }

    /// validate an incoming order request and build the model, the
    /// given order ID must be generated beforehand by the caller.
    /// Note the total price is recorded exactly as the client sent it,
    /// this service does not recompute it from the line items yet.
    pub fn try_from_request(
        oid: String,
        buyer_id: u32,
        value: OrderCreateReqData,
    ) -> DefaultResult<Self, OrderCreateRespErrorDto> {
        let nonfield = if value.order_items.is_empty() {
            Some(OrderNonFieldErrorReason::EmptyItems)
        } else if value.order_items.len() > limit::MAX_ORDER_ITEMS_PER_REQUEST {
            Some(OrderNonFieldErrorReason::TooManyItems)
        } else {
            None
        };
        if let Some(reason) = nonfield {
            return Err(OrderCreateRespErrorDto {
                nonfield: Some(reason),
                ..Default::default()
            });
        }
        let mut item_errors: Vec<OrderItemErrorDto> = Vec::new();
        let mut items: Vec<OrderItemModel> = Vec::new();
        for (idx, d) in value.order_items.into_iter().enumerate() {
            let seq = (idx as u32) + 1;
            match OrderItemModel::try_from_request(seq, d) {
                Ok(m) => items.push(m),
                Err(e) => item_errors.push(e),
            }
        }
        let addr_result = ShippingAddressModel::try_from(value.shipping_address);
        match (addr_result, item_errors.is_empty()) {
            (Ok(shipping), true) => {
                let now = LocalTime::now().fixed_offset();
                Ok(Self {
                    id: oid,
                    buyer_id,
                    items,
                    shipping,
                    total_price: value.total_price,
                    payment_method: value.payment_method.into(),
                    create_time: now,
                    update_time: now,
                })
            }
            (addr_result, _) => Err(OrderCreateRespErrorDto {
                nonfield: None,
                order_items: if item_errors.is_empty() {
                    None
                } else {
                    Some(item_errors)
                },
                shipping_address: addr_result.err(),
            }),
        }
    } // end of fn try_from_request

    /// number of line items per artisan, drives the per-artisan
    /// notification fan-out at order creation
    pub fn artisan_item_counts(&self) -> HashMap<u32, usize> {
        let mut out: HashMap<u32, usize> = HashMap::new();
        for item in self.items.iter() {
            *out.entry(item.artisan_id).or_insert(0) += 1;
        }
        out
    }

    /// apply a status change to one line item, ownership check runs
    /// after the item lookup so a wrong artisan probing a valid item
    /// gets a distinct error from a missing item
    pub fn update_item_status(
        &mut self,
        item_id: u32,
        new_status: OrderItemStatus,
        acting_user: u32,
    ) -> DefaultResult<OrderItemModel, OrderItemUpdateError> {
        let item = self
            .items
            .iter_mut()
            .find(|it| it.id_ == item_id)
            .ok_or(OrderItemUpdateError::ItemNotFound)?;
        if item.artisan_id != acting_user {
            return Err(OrderItemUpdateError::NotArtisanOwner);
        }
        // any transition between known statuses is allowed, artisans
        // do correct mis-clicks by moving an item back to Pending
        item.status = new_status;
        let snapshot = item.clone();
        self.update_time = LocalTime::now().fixed_offset();
        Ok(snapshot)
    } // end of fn update_item_status
} // end of impl OrderModel

impl From<&OrderItemModel> for OrderItemRespDto {
    fn from(value: &OrderItemModel) -> OrderItemRespDto {
        OrderItemRespDto {
            id: value.id_,
            title: value.title.clone(),
            image: value.image.clone(),
            price: value.price,
            qty: value.qty,
            product: value.product_id.clone(),
            artisan: value.artisan_id,
            status: value.status.as_wire_label().to_string(),
        }
    }
}

impl From<&ShippingAddressModel> for ShippingAddressDto {
    fn from(value: &ShippingAddressModel) -> ShippingAddressDto {
        ShippingAddressDto {
            address: value.address.clone(),
            city: value.city.clone(),
            postal_code: value.postal_code.clone(),
            country: value.country.clone(),
        }
    }
}

impl From<PaymentMethod> for crate::api::web::dto::PaymentMethodDto {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Upi => Self::Upi,
            PaymentMethod::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}
impl From<crate::api::web::dto::PaymentMethodDto> for PaymentMethod {
    fn from(value: crate::api::web::dto::PaymentMethodDto) -> Self {
        match value {
            crate::api::web::dto::PaymentMethodDto::Card => Self::Card,
            crate::api::web::dto::PaymentMethodDto::Upi => Self::Upi,
            crate::api::web::dto::PaymentMethodDto::CashOnDelivery => Self::CashOnDelivery,
        }
    }
}

impl From<&OrderModel> for OrderRespDto {
    fn from(value: &OrderModel) -> OrderRespDto {
        OrderRespDto {
            id: value.id.clone(),
            buyer: value.buyer_id,
            order_items: value.items.iter().map(OrderItemRespDto::from).collect(),
            shipping_address: (&value.shipping).into(),
            total_price: value.total_price,
            payment_method: value.payment_method.into(),
            created_at: value.create_time.to_rfc3339(),
            updated_at: value.update_time.to_rfc3339(),
        }
    }
}

impl OrderModel {
    pub fn into_artisan_view(&self, buyer: BuyerSummaryDto) -> OrderArtisanViewDto {
        OrderArtisanViewDto {
            id: self.id.clone(),
            buyer,
            order_items: self.items.iter().map(OrderItemRespDto::from).collect(),
            shipping_address: (&self.shipping).into(),
            total_price: self.total_price,
            payment_method: self.payment_method.into(),
            created_at: self.create_time.to_rfc3339(),
            updated_at: self.update_time.to_rfc3339(),
        }
    }
}

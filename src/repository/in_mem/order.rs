use std::boxed::Box;
use std::collections::{HashMap, HashSet};
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;

use super::super::{
    AbsOrderRepo, AppOrderItemPatchResult, AppOrderRepoUpdateItemFunc, OrderItemStatusPatch,
};
use super::{corrupted_column, parse_column, pick_column};
use crate::error::AppError;
use crate::model::{
    OrderItemModel, OrderItemStatus, OrderModel, PaymentMethod, ShippingAddressModel,
};
use crate::{
    AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedData, AppInMemFetchedSingleRow,
    AppInMemUpdateData,
};

mod _order_toplvl {
    use crate::AbsDStoreFilterKeyOp;

    pub(super) const TABLE_LABEL: &str = "order_toplvl_meta";

    pub(super) enum InMemColIdx {
        BuyerId,
        TotalPrice,
        PaymentMethod,
        CreateTime,
        UpdateTime,
        NumItems,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::BuyerId => 0,
                InMemColIdx::TotalPrice => 1,
                InMemColIdx::PaymentMethod => 2,
                InMemColIdx::CreateTime => 3,
                InMemColIdx::UpdateTime => 4,
                InMemColIdx::NumItems => 5,
                InMemColIdx::TotNumColumns => 6,
            }
        }
    }

    pub(super) struct FilterByBuyerOp {
        pub buyer_id: u32,
    }
    impl AbsDStoreFilterKeyOp for FilterByBuyerOp {
        fn filter(&self, _key: &String, row: &Vec<String>) -> bool {
            let idx: usize = InMemColIdx::BuyerId.into();
            row.get(idx)
                .map(|v| v.as_str() == self.buyer_id.to_string().as_str())
                .unwrap_or(false)
        }
    }
} // end of inner module _order_toplvl

mod _shipping_addr {
    pub(super) const TABLE_LABEL: &str = "order_shipping_addr";

    pub(super) enum InMemColIdx {
        Address,
        City,
        PostalCode,
        Country,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Address => 0,
                InMemColIdx::City => 1,
                InMemColIdx::PostalCode => 2,
                InMemColIdx::Country => 3,
                InMemColIdx::TotNumColumns => 4,
            }
        }
    }
}

mod _order_item {
    use crate::AbsDStoreFilterKeyOp;

    pub(super) const TABLE_LABEL: &str = "order_item";

    pub(super) enum InMemColIdx {
        Title,
        Image,
        Price,
        Qty,
        Product,
        Artisan,
        Status,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Title => 0,
                InMemColIdx::Image => 1,
                InMemColIdx::Price => 2,
                InMemColIdx::Qty => 3,
                InMemColIdx::Product => 4,
                InMemColIdx::Artisan => 5,
                InMemColIdx::Status => 6,
                InMemColIdx::TotNumColumns => 7,
            }
        }
    }

    // the order ID is hex digits only, the last dash always separates
    // the item sequence number
    pub(super) fn inmem_pkey(oid: &str, item_id: u32) -> String {
        format!("{oid}-{item_id}")
    }
    pub(super) fn inmem_get_oid(pkey: &str) -> Option<&str> {
        pkey.rsplit_once('-').map(|(oid, _seq)| oid)
    }

    pub(super) struct FilterByArtisanOp {
        pub artisan_id: u32,
    }
    impl AbsDStoreFilterKeyOp for FilterByArtisanOp {
        fn filter(&self, _key: &String, row: &Vec<String>) -> bool {
            let idx: usize = InMemColIdx::Artisan.into();
            row.get(idx)
                .map(|v| v.as_str() == self.artisan_id.to_string().as_str())
                .unwrap_or(false)
        }
    }
} // end of inner module _order_item

fn toplvl_row_from(value: &OrderModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._order_toplvl::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<AppInMemFetchedSingleRow>();
    let pay_method: u8 = value.payment_method.into();
    [
        (_order_toplvl::InMemColIdx::BuyerId, value.buyer_id.to_string()),
        (
            _order_toplvl::InMemColIdx::TotalPrice,
            value.total_price.to_string(),
        ),
        (
            _order_toplvl::InMemColIdx::PaymentMethod,
            pay_method.to_string(),
        ),
        (
            _order_toplvl::InMemColIdx::CreateTime,
            value.create_time.to_rfc3339(),
        ),
        (
            _order_toplvl::InMemColIdx::UpdateTime,
            value.update_time.to_rfc3339(),
        ),
        (
            _order_toplvl::InMemColIdx::NumItems,
            value.items.len().to_string(),
        ),
    ]
    .into_iter()
    .for_each(|(k, v)| {
        let idx: usize = k.into();
        row[idx] = v;
    });
    row
}

fn addr_row_from(value: &ShippingAddressModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._shipping_addr::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<AppInMemFetchedSingleRow>();
    [
        (_shipping_addr::InMemColIdx::Address, value.address.clone()),
        (_shipping_addr::InMemColIdx::City, value.city.clone()),
        (
            _shipping_addr::InMemColIdx::PostalCode,
            value.postal_code.clone(),
        ),
        (_shipping_addr::InMemColIdx::Country, value.country.clone()),
    ]
    .into_iter()
    .for_each(|(k, v)| {
        let idx: usize = k.into();
        row[idx] = v;
    });
    row
}

fn item_row_from(value: &OrderItemModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._order_item::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<AppInMemFetchedSingleRow>();
    let status: u8 = value.status.into();
    [
        (_order_item::InMemColIdx::Title, value.title.clone()),
        (_order_item::InMemColIdx::Image, value.image.clone()),
        (_order_item::InMemColIdx::Price, value.price.to_string()),
        (_order_item::InMemColIdx::Qty, value.qty.to_string()),
        (_order_item::InMemColIdx::Product, value.product_id.clone()),
        (_order_item::InMemColIdx::Artisan, value.artisan_id.to_string()),
        (_order_item::InMemColIdx::Status, status.to_string()),
    ]
    .into_iter()
    .for_each(|(k, v)| {
        let idx: usize = k.into();
        row[idx] = v;
    });
    row
}

fn decode_addr_row(row: &AppInMemFetchedSingleRow) -> DefaultResult<ShippingAddressModel, AppError> {
    Ok(ShippingAddressModel {
        address: pick_column(row, _shipping_addr::InMemColIdx::Address.into(), "address")?
            .to_string(),
        city: pick_column(row, _shipping_addr::InMemColIdx::City.into(), "city")?.to_string(),
        postal_code: pick_column(
            row,
            _shipping_addr::InMemColIdx::PostalCode.into(),
            "postal-code",
        )?
        .to_string(),
        country: pick_column(row, _shipping_addr::InMemColIdx::Country.into(), "country")?
            .to_string(),
    })
}

fn decode_item_row(
    seq: u32,
    row: &AppInMemFetchedSingleRow,
) -> DefaultResult<OrderItemModel, AppError> {
    let status_num = parse_column::<u8>(row, _order_item::InMemColIdx::Status.into(), "status")?;
    Ok(OrderItemModel {
        id_: seq,
        title: pick_column(row, _order_item::InMemColIdx::Title.into(), "title")?.to_string(),
        image: pick_column(row, _order_item::InMemColIdx::Image.into(), "image")?.to_string(),
        price: parse_column(row, _order_item::InMemColIdx::Price.into(), "price")?,
        qty: parse_column(row, _order_item::InMemColIdx::Qty.into(), "qty")?,
        product_id: pick_column(row, _order_item::InMemColIdx::Product.into(), "product")?
            .to_string(),
        artisan_id: parse_column(row, _order_item::InMemColIdx::Artisan.into(), "artisan")?,
        status: OrderItemStatus::try_from(status_num)?,
    })
}

pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_order_toplvl::TABLE_LABEL).await?;
        m.create_table(_shipping_addr::TABLE_LABEL).await?;
        m.create_table(_order_item::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    fn gen_update_data(order: &OrderModel) -> AppInMemUpdateData {
        let mut toplvl_rows = HashMap::new();
        toplvl_rows.insert(order.id.clone(), toplvl_row_from(order));
        let mut addr_rows = HashMap::new();
        addr_rows.insert(order.id.clone(), addr_row_from(&order.shipping));
        let mut item_rows = HashMap::new();
        for item in order.items.iter() {
            let pkey = _order_item::inmem_pkey(order.id.as_str(), item.id_);
            item_rows.insert(pkey, item_row_from(item));
        }
        let mut out: AppInMemUpdateData = HashMap::new();
        out.insert(_order_toplvl::TABLE_LABEL.to_string(), toplvl_rows);
        out.insert(_shipping_addr::TABLE_LABEL.to_string(), addr_rows);
        out.insert(_order_item::TABLE_LABEL.to_string(), item_rows);
        out
    } // end of fn gen_update_data

    async fn probe_num_items(&self, oid: &str) -> DefaultResult<Option<u32>, AppError> {
        let mut keys: AppInMemFetchKeys = HashMap::new();
        keys.insert(_order_toplvl::TABLE_LABEL.to_string(), vec![oid.to_string()]);
        let data = self.datastore.fetch(keys).await?;
        let row = data
            .get(_order_toplvl::TABLE_LABEL)
            .and_then(|t| t.get(oid));
        match row {
            Some(r) => {
                let n =
                    parse_column::<u32>(r, _order_toplvl::InMemColIdx::NumItems.into(), "num-items")?;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }

    fn full_fetch_keys(oid: &str, num_items: u32) -> AppInMemFetchKeys {
        let mut keys: AppInMemFetchKeys = HashMap::new();
        keys.insert(_order_toplvl::TABLE_LABEL.to_string(), vec![oid.to_string()]);
        keys.insert(
            _shipping_addr::TABLE_LABEL.to_string(),
            vec![oid.to_string()],
        );
        let item_keys = (1..=num_items)
            .map(|seq| _order_item::inmem_pkey(oid, seq))
            .collect::<Vec<_>>();
        keys.insert(_order_item::TABLE_LABEL.to_string(), item_keys);
        keys
    }

    fn try_decode_order(
        oid: &str,
        num_items: u32,
        data: &AppInMemFetchedData,
    ) -> DefaultResult<Option<OrderModel>, AppError> {
        let toplvl_row = data
            .get(_order_toplvl::TABLE_LABEL)
            .and_then(|t| t.get(oid));
        let addr_row = data
            .get(_shipping_addr::TABLE_LABEL)
            .and_then(|t| t.get(oid));
        let (toplvl_row, addr_row) = match (toplvl_row, addr_row) {
            (Some(a), Some(b)) => (a, b),
            _others => return Ok(None),
        };
        let buyer_id = parse_column::<u32>(
            toplvl_row,
            _order_toplvl::InMemColIdx::BuyerId.into(),
            "buyer-id",
        )?;
        let total_price = parse_column(
            toplvl_row,
            _order_toplvl::InMemColIdx::TotalPrice.into(),
            "total-price",
        )?;
        let pay_num = parse_column::<u8>(
            toplvl_row,
            _order_toplvl::InMemColIdx::PaymentMethod.into(),
            "payment-method",
        )?;
        let ctime_raw = pick_column(
            toplvl_row,
            _order_toplvl::InMemColIdx::CreateTime.into(),
            "create-time",
        )?;
        let utime_raw = pick_column(
            toplvl_row,
            _order_toplvl::InMemColIdx::UpdateTime.into(),
            "update-time",
        )?;
        let create_time = DateTime::parse_from_rfc3339(ctime_raw)
            .map_err(|_e| corrupted_column("create-time"))?;
        let update_time = DateTime::parse_from_rfc3339(utime_raw)
            .map_err(|_e| corrupted_column("update-time"))?;
        let item_table = data
            .get(_order_item::TABLE_LABEL)
            .ok_or_else(|| corrupted_column("order-item-table"))?;
        let mut items = Vec::with_capacity(num_items as usize);
        for seq in 1..=num_items {
            let pkey = _order_item::inmem_pkey(oid, seq);
            let row = item_table
                .get(pkey.as_str())
                .ok_or_else(|| corrupted_column("order-item-row"))?;
            items.push(decode_item_row(seq, row)?);
        }
        Ok(Some(OrderModel {
            id: oid.to_string(),
            buyer_id,
            items,
            shipping: decode_addr_row(addr_row)?,
            total_price,
            payment_method: PaymentMethod::try_from(pay_num)?,
            create_time,
            update_time,
        }))
    } // end of fn try_decode_order
} // end of impl OrderInMemRepo

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        let data = Self::gen_update_data(&order);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch_by_id(&self, oid: &str) -> DefaultResult<Option<OrderModel>, AppError> {
        let num_items = match self.probe_num_items(oid).await? {
            Some(n) => n,
            None => return Ok(None),
        };
        let keys = Self::full_fetch_keys(oid, num_items);
        let data = self.datastore.fetch(keys).await?;
        Self::try_decode_order(oid, num_items, &data)
    }

    async fn fetch_by_buyer(&self, buyer_id: u32) -> DefaultResult<Vec<OrderModel>, AppError> {
        let op = _order_toplvl::FilterByBuyerOp { buyer_id };
        let oids = self
            .datastore
            .filter_keys(_order_toplvl::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut out = Vec::with_capacity(oids.len());
        for oid in oids {
            if let Some(order) = self.fetch_by_id(oid.as_str()).await? {
                out.push(order);
            }
        }
        out.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(out)
    }

    async fn fetch_by_artisan(
        &self,
        artisan_id: u32,
    ) -> DefaultResult<Vec<OrderModel>, AppError> {
        let op = _order_item::FilterByArtisanOp { artisan_id };
        let item_keys = self
            .datastore
            .filter_keys(_order_item::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut seen: HashSet<String> = HashSet::new();
        for pkey in item_keys.iter() {
            let oid = _order_item::inmem_get_oid(pkey.as_str())
                .ok_or_else(|| corrupted_column("order-item-pkey"))?;
            seen.insert(oid.to_string());
        }
        let mut out = Vec::with_capacity(seen.len());
        for oid in seen {
            if let Some(order) = self.fetch_by_id(oid.as_str()).await? {
                out.push(order);
            }
        }
        out.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        Ok(out)
    } // end of fn fetch_by_artisan

    async fn update_item_status(
        &self,
        oid: &str,
        patch: OrderItemStatusPatch,
        cb: AppOrderRepoUpdateItemFunc,
    ) -> DefaultResult<AppOrderItemPatchResult, AppError> {
        // the item count of an order never changes after creation, so
        // probing it outside the lock stays consistent
        let num_items = match self.probe_num_items(oid).await? {
            Some(n) => n,
            None => return Ok(AppOrderItemPatchResult::OrderNotFound),
        };
        let keys = Self::full_fetch_keys(oid, num_items);
        let (data, lock) = self.datastore.fetch_acquire(keys).await?;
        let mut order = match Self::try_decode_order(oid, num_items, &data)? {
            Some(v) => v,
            None => return Ok(AppOrderItemPatchResult::OrderNotFound),
        };
        match cb(&mut order, patch) {
            Ok(item) => {
                let rows = Self::gen_update_data(&order);
                let _num_saved = self.datastore.save_release(rows, lock)?;
                Ok(AppOrderItemPatchResult::Patched(item))
            }
            Err(e) => {
                drop(lock);
                Ok(AppOrderItemPatchResult::Rejected(e))
            }
        }
    } // end of fn update_item_status
} // end of impl AbsOrderRepo for OrderInMemRepo

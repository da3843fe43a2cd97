use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;

use super::super::AbsNotificationRepo;
use super::{corrupted_column, parse_column, pick_column};
use crate::error::AppError;
use crate::model::{NotificationKind, NotificationModel};
use crate::{
    AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow, AppInMemUpdateData,
};

mod _notification {
    use crate::AbsDStoreFilterKeyOp;

    pub(super) const TABLE_LABEL: &str = "notification";
    pub(super) const FLAG_UNREAD: &str = "0";
    pub(super) const FLAG_READ: &str = "1";

    pub(super) enum InMemColIdx {
        UserId,
        Message,
        IsRead,
        Kind,
        RelatedOrder,
        CreateTime,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::UserId => 0,
                InMemColIdx::Message => 1,
                InMemColIdx::IsRead => 2,
                InMemColIdx::Kind => 3,
                InMemColIdx::RelatedOrder => 4,
                InMemColIdx::CreateTime => 5,
                InMemColIdx::TotNumColumns => 6,
            }
        }
    }

    pub(super) struct FilterByUserOp {
        pub usr_id: u32,
        pub unread_only: bool,
    }
    impl AbsDStoreFilterKeyOp for FilterByUserOp {
        fn filter(&self, _key: &String, row: &Vec<String>) -> bool {
            let usr_idx: usize = InMemColIdx::UserId.into();
            let matched_user = row
                .get(usr_idx)
                .and_then(|v| v.parse::<u32>().ok())
                .map(|n| n == self.usr_id)
                .unwrap_or(false);
            if matched_user && self.unread_only {
                let read_idx: usize = InMemColIdx::IsRead.into();
                row.get(read_idx)
                    .map(|v| v.as_str() == FLAG_UNREAD)
                    .unwrap_or(false)
            } else {
                matched_user
            }
        }
    }
} // end of inner module _notification

fn row_from(value: &NotificationModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._notification::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<AppInMemFetchedSingleRow>();
    let read_flag = if value.read {
        _notification::FLAG_READ
    } else {
        _notification::FLAG_UNREAD
    };
    [
        (
            _notification::InMemColIdx::UserId,
            value.user_id.to_string(),
        ),
        (_notification::InMemColIdx::Message, value.message.clone()),
        (_notification::InMemColIdx::IsRead, read_flag.to_string()),
        (
            _notification::InMemColIdx::Kind,
            value.kind.as_wire_label().to_string(),
        ),
        (
            _notification::InMemColIdx::RelatedOrder,
            value.related_order.clone().unwrap_or_default(),
        ),
        (
            _notification::InMemColIdx::CreateTime,
            value.create_time.to_rfc3339(),
        ),
    ]
    .into_iter()
    .for_each(|(k, v)| {
        let idx: usize = k.into();
        row[idx] = v;
    });
    row
} // end of fn row_from

fn decode_row(
    id: &str,
    row: &AppInMemFetchedSingleRow,
) -> DefaultResult<NotificationModel, AppError> {
    let read_raw = pick_column(row, _notification::InMemColIdx::IsRead.into(), "is-read")?;
    let kind_raw = pick_column(row, _notification::InMemColIdx::Kind.into(), "kind")?;
    let related_raw = pick_column(
        row,
        _notification::InMemColIdx::RelatedOrder.into(),
        "related-order",
    )?;
    let ctime_raw = pick_column(
        row,
        _notification::InMemColIdx::CreateTime.into(),
        "create-time",
    )?;
    let create_time =
        DateTime::parse_from_rfc3339(ctime_raw).map_err(|_e| corrupted_column("create-time"))?;
    Ok(NotificationModel {
        id_: id.to_string(),
        user_id: parse_column(row, _notification::InMemColIdx::UserId.into(), "user-id")?,
        message: pick_column(row, _notification::InMemColIdx::Message.into(), "message")?
            .to_string(),
        read: read_raw == _notification::FLAG_READ,
        kind: NotificationKind::from_str(kind_raw)?,
        related_order: if related_raw.is_empty() {
            None
        } else {
            Some(related_raw.to_string())
        },
        create_time,
    })
} // end of fn decode_row

pub struct NotificationInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl NotificationInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_notification::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }

    async fn fetch_by_keys(
        &self,
        keys: Vec<String>,
    ) -> DefaultResult<Vec<NotificationModel>, AppError> {
        let mut fetch_keys: AppInMemFetchKeys = HashMap::new();
        fetch_keys.insert(_notification::TABLE_LABEL.to_string(), keys);
        let data = self.datastore.fetch(fetch_keys).await?;
        let table = data
            .get(_notification::TABLE_LABEL)
            .ok_or_else(|| corrupted_column("notification-table"))?;
        let mut out = Vec::with_capacity(table.len());
        for (id, row) in table.iter() {
            out.push(decode_row(id.as_str(), row)?);
        }
        Ok(out)
    }
} // end of impl NotificationInMemRepo

#[async_trait]
impl AbsNotificationRepo for NotificationInMemRepo {
    async fn create_many(&self, items: Vec<NotificationModel>) -> DefaultResult<usize, AppError> {
        let rows = items
            .iter()
            .map(|m| (m.id_.clone(), row_from(m)))
            .collect::<HashMap<_, _>>();
        let mut data: AppInMemUpdateData = HashMap::new();
        data.insert(_notification::TABLE_LABEL.to_string(), rows);
        let num_saved = self.datastore.save(data).await?;
        Ok(num_saved)
    }

    async fn fetch_latest_by_user(
        &self,
        usr_id: u32,
        limit: usize,
    ) -> DefaultResult<Vec<NotificationModel>, AppError> {
        let op = _notification::FilterByUserOp {
            usr_id,
            unread_only: false,
        };
        let keys = self
            .datastore
            .filter_keys(_notification::TABLE_LABEL.to_string(), &op)
            .await?;
        let mut found = self.fetch_by_keys(keys).await?;
        found.sort_by(|a, b| b.create_time.cmp(&a.create_time));
        found.truncate(limit);
        Ok(found)
    }

    async fn fetch_by_id(&self, id: &str) -> DefaultResult<Option<NotificationModel>, AppError> {
        let found = self.fetch_by_keys(vec![id.to_string()]).await?;
        Ok(found.into_iter().next())
    }

    async fn mark_read(&self, id: &str) -> DefaultResult<Option<NotificationModel>, AppError> {
        let mut keys: AppInMemFetchKeys = HashMap::new();
        keys.insert(_notification::TABLE_LABEL.to_string(), vec![id.to_string()]);
        let (data, lock) = self.datastore.fetch_acquire(keys).await?;
        let row = data
            .get(_notification::TABLE_LABEL)
            .and_then(|t| t.get(id));
        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };
        let mut model = decode_row(id, row)?;
        model.read = true;
        let mut rows = HashMap::new();
        rows.insert(id.to_string(), row_from(&model));
        let mut update: AppInMemUpdateData = HashMap::new();
        update.insert(_notification::TABLE_LABEL.to_string(), rows);
        let _num_saved = self.datastore.save_release(update, lock)?;
        Ok(Some(model))
    } // end of fn mark_read

    async fn mark_all_read(&self, usr_id: u32) -> DefaultResult<usize, AppError> {
        let op = _notification::FilterByUserOp {
            usr_id,
            unread_only: true,
        };
        let unread_keys = self
            .datastore
            .filter_keys(_notification::TABLE_LABEL.to_string(), &op)
            .await?;
        if unread_keys.is_empty() {
            return Ok(0);
        }
        let mut keys: AppInMemFetchKeys = HashMap::new();
        keys.insert(_notification::TABLE_LABEL.to_string(), unread_keys);
        let (data, lock) = self.datastore.fetch_acquire(keys).await?;
        let table = data
            .get(_notification::TABLE_LABEL)
            .ok_or_else(|| corrupted_column("notification-table"))?;
        let mut rows = HashMap::new();
        for (id, row) in table.iter() {
            let mut model = decode_row(id.as_str(), row)?;
            model.read = true;
            rows.insert(id.clone(), row_from(&model));
        }
        let num_marked = rows.len();
        let mut update: AppInMemUpdateData = HashMap::new();
        update.insert(_notification::TABLE_LABEL.to_string(), rows);
        let _num_saved = self.datastore.save_release(update, lock)?;
        Ok(num_marked)
    } // end of fn mark_all_read
} // end of impl AbsNotificationRepo for NotificationInMemRepo

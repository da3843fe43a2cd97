use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use super::super::AbsUserProfileRepo;
use super::{corrupted_column, pick_column};
use crate::error::AppError;
use crate::model::UserProfileModel;
use crate::{
    AbstInMemoryDStore, AppInMemFetchKeys, AppInMemFetchedSingleRow, AppInMemUpdateData,
};

mod _user_profile {
    pub(super) const TABLE_LABEL: &str = "user_profile";

    pub(super) enum InMemColIdx {
        Name,
        Email,
        TotNumColumns,
    }
    impl From<InMemColIdx> for usize {
        fn from(value: InMemColIdx) -> usize {
            match value {
                InMemColIdx::Name => 0,
                InMemColIdx::Email => 1,
                InMemColIdx::TotNumColumns => 2,
            }
        }
    }
}

fn row_from(value: &UserProfileModel) -> AppInMemFetchedSingleRow {
    let mut row = (0.._user_profile::InMemColIdx::TotNumColumns.into())
        .map(|_n| String::new())
        .collect::<AppInMemFetchedSingleRow>();
    [
        (_user_profile::InMemColIdx::Name, value.name.clone()),
        (_user_profile::InMemColIdx::Email, value.email.clone()),
    ]
    .into_iter()
    .for_each(|(k, v)| {
        let idx: usize = k.into();
        row[idx] = v;
    });
    row
}

fn decode_row(
    pkey: &str,
    row: &AppInMemFetchedSingleRow,
) -> DefaultResult<UserProfileModel, AppError> {
    let usr_id = pkey
        .parse::<u32>()
        .map_err(|_e| corrupted_column("user-profile-pkey"))?;
    Ok(UserProfileModel {
        usr_id,
        name: pick_column(row, _user_profile::InMemColIdx::Name.into(), "name")?.to_string(),
        email: pick_column(row, _user_profile::InMemColIdx::Email.into(), "email")?.to_string(),
    })
}

pub struct UserProfileInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl UserProfileInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(_user_profile::TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsUserProfileRepo for UserProfileInMemRepo {
    async fn save(&self, profile: UserProfileModel) -> DefaultResult<(), AppError> {
        let mut rows = HashMap::new();
        rows.insert(profile.usr_id.to_string(), row_from(&profile));
        let mut data: AppInMemUpdateData = HashMap::new();
        data.insert(_user_profile::TABLE_LABEL.to_string(), rows);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch(&self, usr_id: u32) -> DefaultResult<Option<UserProfileModel>, AppError> {
        let found = self.fetch_many(vec![usr_id]).await?;
        Ok(found.into_iter().next())
    }

    async fn fetch_many(
        &self,
        usr_ids: Vec<u32>,
    ) -> DefaultResult<Vec<UserProfileModel>, AppError> {
        let pkeys = usr_ids.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let mut keys: AppInMemFetchKeys = HashMap::new();
        keys.insert(_user_profile::TABLE_LABEL.to_string(), pkeys);
        let data = self.datastore.fetch(keys).await?;
        let mut out = Vec::new();
        if let Some(table) = data.get(_user_profile::TABLE_LABEL) {
            for (pkey, row) in table.iter() {
                out.push(decode_row(pkey.as_str(), row)?);
            }
        }
        Ok(out)
    }
} // end of impl AbsUserProfileRepo for UserProfileInMemRepo

use std::boxed::Box;
use std::result::Result as DefaultResult;

use crate::api::web::dto::NotificationRespDto;
use crate::constant::limit;
use crate::error::AppError;
use crate::repository::AbsNotificationRepo;
use crate::AppAuthedClaim;

pub struct ListNotificationsUseCase {
    pub repo: Box<dyn AbsNotificationRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl ListNotificationsUseCase {
    pub async fn execute(self) -> DefaultResult<Vec<NotificationRespDto>, AppError> {
        let found = self
            .repo
            .fetch_latest_by_user(self.auth_claim.profile, limit::MAX_NOTIFICATIONS_PER_FETCH)
            .await?;
        Ok(found.iter().map(NotificationRespDto::from).collect())
    }
}

pub enum MarkNotificationReadUcResult {
    NotFound,
    NotOwner,
    Success(NotificationRespDto),
}

pub struct MarkNotificationReadUseCase {
    pub repo: Box<dyn AbsNotificationRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl MarkNotificationReadUseCase {
    pub async fn execute(
        self,
        id: String,
    ) -> DefaultResult<MarkNotificationReadUcResult, AppError> {
        let found = match self.repo.fetch_by_id(id.as_str()).await? {
            Some(v) => v,
            None => return Ok(MarkNotificationReadUcResult::NotFound),
        };
        if found.user_id != self.auth_claim.profile {
            return Ok(MarkNotificationReadUcResult::NotOwner);
        }
        match self.repo.mark_read(id.as_str()).await? {
            Some(m) => Ok(MarkNotificationReadUcResult::Success((&m).into())),
            None => Ok(MarkNotificationReadUcResult::NotFound),
        }
    } // end of fn execute
}

pub struct MarkAllNotificationsReadUseCase {
    pub repo: Box<dyn AbsNotificationRepo>,
    pub auth_claim: AppAuthedClaim,
}

impl MarkAllNotificationsReadUseCase {
    pub async fn execute(self) -> DefaultResult<usize, AppError> {
        self.repo.mark_all_read(self.auth_claim.profile).await
    }
}

use crate::api::web::dto::BuyerSummaryDto;
use crate::AppAuthedClaim;

/// local replica of the user profile fields this service needs when
/// rendering orders to artisans, refreshed from the verified auth
/// claim every time the user places an order
#[derive(Clone)]
pub struct UserProfileModel {
    pub usr_id: u32,
    pub name: String,
    pub email: String,
}

impl UserProfileModel {
    pub fn from_claim(claim: &AppAuthedClaim) -> Self {
        let name = claim
            .nickname
            .clone()
            .unwrap_or_else(|| format!("user-{}", claim.profile));
        let email = claim.email.clone().unwrap_or_default();
        Self {
            usr_id: claim.profile,
            name,
            email,
        }
    }
}

impl From<&UserProfileModel> for BuyerSummaryDto {
    fn from(value: &UserProfileModel) -> BuyerSummaryDto {
        BuyerSummaryDto {
            name: value.name.clone(),
            email: value.email.clone(),
        }
    }
}

use artisanhub::model::UserProfileModel;
use artisanhub::repository::{app_repo_user_profile, AbsUserProfileRepo};

use super::ds_ctx_setup;

async fn repo_setup() -> Box<dyn AbsUserProfileRepo> {
    let ds = ds_ctx_setup();
    app_repo_user_profile(ds).await.unwrap()
}

fn ut_profile(usr_id: u32, name: &str, email: &str) -> UserProfileModel {
    UserProfileModel {
        usr_id,
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn save_fetch_ok() {
    let repo = repo_setup().await;
    repo.save(ut_profile(586, "Ines Ferrand", "ines@crafted.example"))
        .await
        .unwrap();
    let loaded = repo.fetch(586).await.unwrap().unwrap();
    assert_eq!(loaded.usr_id, 586);
    assert_eq!(loaded.name.as_str(), "Ines Ferrand");
    assert_eq!(loaded.email.as_str(), "ines@crafted.example");
    // saving again replaces the replica
    repo.save(ut_profile(586, "Ines F.", "ines@crafted.example"))
        .await
        .unwrap();
    let loaded = repo.fetch(586).await.unwrap().unwrap();
    assert_eq!(loaded.name.as_str(), "Ines F.");
}

#[tokio::test]
async fn fetch_nonexist() {
    let repo = repo_setup().await;
    let result = repo.fetch(77701).await;
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn fetch_many_partial_hit() {
    let repo = repo_setup().await;
    repo.save(ut_profile(586, "Ines Ferrand", "ines@crafted.example"))
        .await
        .unwrap();
    repo.save(ut_profile(587, "Matteo Rossi", "matteo@crafted.example"))
        .await
        .unwrap();
    let result = repo.fetch_many(vec![586, 999, 587]).await;
    let mut loaded = result.unwrap();
    // missing IDs are skipped rather than reported as errors
    assert_eq!(loaded.len(), 2);
    loaded.sort_by_key(|p| p.usr_id);
    assert_eq!(loaded[0].usr_id, 586);
    assert_eq!(loaded[1].name.as_str(), "Matteo Rossi");
}

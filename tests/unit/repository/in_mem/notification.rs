use std::time::Duration;

use tokio::time::sleep;

use artisanhub::model::{NotificationKind, NotificationModel, OrderItemStatus};
use artisanhub::repository::{app_repo_notification, AbsNotificationRepo};

use super::ds_ctx_setup;

async fn repo_setup() -> Box<dyn AbsNotificationRepo> {
    let ds = ds_ctx_setup();
    app_repo_notification(ds).await.unwrap()
}

const UT_OID: &str = "91f0a2b55c7e46d8a3e9016c7b55d201";

#[tokio::test]
async fn create_many_fetch_latest_ok() {
    let repo = repo_setup().await;
    let batch = vec![
        NotificationModel::new_order_alert(140, 2, UT_OID),
        NotificationModel::new_order_alert(141, 1, UT_OID),
    ];
    let num = repo.create_many(batch).await.unwrap();
    assert_eq!(num, 2);
    let result = repo.fetch_latest_by_user(140, 20).await;
    let loaded = result.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].user_id, 140);
    assert_eq!(loaded[0].kind, NotificationKind::NewOrder);
    assert_eq!(loaded[0].related_order.as_deref().unwrap(), UT_OID);
    assert!(!loaded[0].read);
    let result = repo.fetch_latest_by_user(999, 20).await;
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_latest_capped_newest_first() {
    let repo = repo_setup().await;
    for n in 0..25usize {
        let m = NotificationModel::new_order_alert(140, n + 1, UT_OID);
        repo.create_many(vec![m]).await.unwrap();
        sleep(Duration::from_millis(3)).await;
    }
    let result = repo.fetch_latest_by_user(140, 20).await;
    let loaded = result.unwrap();
    assert_eq!(loaded.len(), 20);
    // newest entry carries the count from the last loop iteration
    assert_eq!(
        loaded[0].message.as_str(),
        "You have received a new order with 25 items."
    );
    assert_eq!(
        loaded[19].message.as_str(),
        "You have received a new order with 6 items."
    );
    let sorted_desc = loaded
        .windows(2)
        .all(|w| w[0].create_time >= w[1].create_time);
    assert!(sorted_desc);
}

#[tokio::test]
async fn mark_read_ok() {
    let repo = repo_setup().await;
    let m =
        NotificationModel::status_update_alert(586, "walnut serving board", OrderItemStatus::Shipped, UT_OID);
    let target_id = m.id_.clone();
    repo.create_many(vec![m]).await.unwrap();
    let result = repo.mark_read(target_id.as_str()).await;
    let updated = result.unwrap().unwrap();
    assert!(updated.read);
    assert_eq!(updated.id_.as_str(), target_id.as_str());
    // marking again is a no-op at this layer, the model stays read
    let updated = repo.mark_read(target_id.as_str()).await.unwrap().unwrap();
    assert!(updated.read);
    let loaded = repo.fetch_by_id(target_id.as_str()).await.unwrap().unwrap();
    assert!(loaded.read);
}

#[tokio::test]
async fn mark_read_nonexist() {
    let repo = repo_setup().await;
    let result = repo.mark_read("ffffffffffffffffffffffffffffffff").await;
    assert!(result.unwrap().is_none());
    let result = repo.fetch_by_id("ffffffffffffffffffffffffffffffff").await;
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn mark_all_read_counts_unread_only() {
    let repo = repo_setup().await;
    let batch = vec![
        NotificationModel::new_order_alert(140, 1, UT_OID),
        NotificationModel::new_order_alert(140, 3, UT_OID),
        NotificationModel::new_order_alert(140, 5, UT_OID),
        NotificationModel::new_order_alert(141, 2, UT_OID),
    ];
    let pre_read_id = batch[1].id_.clone();
    repo.create_many(batch).await.unwrap();
    repo.mark_read(pre_read_id.as_str()).await.unwrap();
    let num = repo.mark_all_read(140).await.unwrap();
    assert_eq!(num, 2);
    let loaded = repo.fetch_latest_by_user(140, 20).await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.iter().all(|m| m.read));
    // the other user's feed is untouched
    let loaded = repo.fetch_latest_by_user(141, 20).await.unwrap();
    assert!(!loaded[0].read);
    // nothing left to flip
    let num = repo.mark_all_read(140).await.unwrap();
    assert_eq!(num, 0);
} // end of fn mark_all_read_counts_unread_only

use std::boxed::Box;

use artisanhub::model::{NotificationModel, OrderItemStatus};
use artisanhub::usecase::{
    ListNotificationsUseCase, MarkAllNotificationsReadUseCase, MarkNotificationReadUcResult,
    MarkNotificationReadUseCase,
};
use artisanhub::AppUserRole;

use super::{ut_setup_auth_claim, MockNotificationRepo};

const UT_OID: &str = "91f0a2b55c7e46d8a3e9016c7b55d201";

#[tokio::test]
async fn list_notifications_ok() {
    let scripted = vec![
        NotificationModel::new_order_alert(140, 2, UT_OID),
        NotificationModel::status_update_alert(
            140,
            "raku tea bowl",
            OrderItemStatus::Delivered,
            UT_OID,
        ),
    ];
    let (repo, _h) =
        MockNotificationRepo::build(vec![], vec![Ok(scripted)], vec![], vec![], vec![]);
    let uc = ListNotificationsUseCase {
        repo: Box::new(repo),
        auth_claim: ut_setup_auth_claim(140, AppUserRole::Artisan),
    };
    let result = uc.execute().await;
    let resp = result.unwrap();
    assert_eq!(resp.len(), 2);
    assert_eq!(resp[0].kind.as_str(), "new_order");
    assert_eq!(resp[1].kind.as_str(), "order_status_update");
    assert!(resp.iter().all(|d| d.user == 140));
}

#[tokio::test]
async fn mark_one_read_not_found() {
    let (repo, _h) = MockNotificationRepo::build(vec![], vec![], vec![Ok(None)], vec![], vec![]);
    let uc = MarkNotificationReadUseCase {
        repo: Box::new(repo),
        auth_claim: ut_setup_auth_claim(586, AppUserRole::Buyer),
    };
    let result = uc.execute("ffffffffffffffffffffffffffffffff".to_string()).await;
    assert!(matches!(
        result.unwrap(),
        MarkNotificationReadUcResult::NotFound
    ));
}

#[tokio::test]
async fn mark_one_read_not_owner() {
    // the notification belongs to user 999, the caller is 586
    let found = NotificationModel::new_order_alert(999, 1, UT_OID);
    let target_id = found.id_.clone();
    let (repo, _h) =
        MockNotificationRepo::build(vec![], vec![], vec![Ok(Some(found))], vec![], vec![]);
    let uc = MarkNotificationReadUseCase {
        repo: Box::new(repo),
        auth_claim: ut_setup_auth_claim(586, AppUserRole::Buyer),
    };
    let result = uc.execute(target_id).await;
    assert!(matches!(
        result.unwrap(),
        MarkNotificationReadUcResult::NotOwner
    ));
}

#[tokio::test]
async fn mark_one_read_ok() {
    let found = NotificationModel::status_update_alert(
        586,
        "walnut serving board",
        OrderItemStatus::Shipped,
        UT_OID,
    );
    let target_id = found.id_.clone();
    let mut updated = found.clone();
    updated.read = true;
    let (repo, _h) = MockNotificationRepo::build(
        vec![],
        vec![],
        vec![Ok(Some(found))],
        vec![Ok(Some(updated))],
        vec![],
    );
    let uc = MarkNotificationReadUseCase {
        repo: Box::new(repo),
        auth_claim: ut_setup_auth_claim(586, AppUserRole::Buyer),
    };
    let result = uc.execute(target_id.clone()).await;
    let resp = match result.unwrap() {
        MarkNotificationReadUcResult::Success(d) => d,
        _others => panic!("expect the owner to mark it read"),
    };
    assert_eq!(resp.id.as_str(), target_id.as_str());
    assert!(resp.is_read);
}

#[tokio::test]
async fn mark_all_read_ok() {
    let (repo, _h) = MockNotificationRepo::build(vec![], vec![], vec![], vec![], vec![Ok(4)]);
    let uc = MarkAllNotificationsReadUseCase {
        repo: Box::new(repo),
        auth_claim: ut_setup_auth_claim(586, AppUserRole::Buyer),
    };
    let result = uc.execute().await;
    assert_eq!(result.unwrap(), 4);
}

use std::str::FromStr;

use artisanhub::api::web::dto::NotificationRespDto;
use artisanhub::error::AppErrorCode;
use artisanhub::model::{NotificationKind, NotificationModel, OrderItemStatus};

#[test]
fn kind_label_codec() {
    let cases = [
        (NotificationKind::NewOrder, "new_order"),
        (NotificationKind::OrderStatusUpdate, "order_status_update"),
        (NotificationKind::System, "system"),
    ];
    for (kind, label) in cases {
        assert_eq!(kind.as_wire_label(), label);
        assert_eq!(NotificationKind::from_str(label).unwrap(), kind);
    }
    let result = NotificationKind::from_str("carrier_pigeon");
    let e = result.err().unwrap();
    assert_eq!(e.code, AppErrorCode::DataCorruption);
}

#[test]
fn new_order_alert_ok() {
    let oid = "a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5";
    let m = NotificationModel::new_order_alert(140, 2, oid);
    assert_eq!(m.user_id, 140);
    assert!(!m.read);
    assert_eq!(m.kind, NotificationKind::NewOrder);
    assert_eq!(m.related_order.as_deref().unwrap(), oid);
    assert_eq!(
        m.message.as_str(),
        "You have received a new order with 2 items."
    );
    assert!(!m.id_.is_empty());
    let m2 = NotificationModel::new_order_alert(140, 2, oid);
    assert_ne!(m.id_, m2.id_);
}

#[test]
fn status_update_alert_ok() {
    let oid = "a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5";
    let m = NotificationModel::status_update_alert(
        586,
        "indigo linen scarf",
        OrderItemStatus::Shipped,
        oid,
    );
    assert_eq!(m.user_id, 586);
    assert_eq!(m.kind, NotificationKind::OrderStatusUpdate);
    assert_eq!(
        m.message.as_str(),
        "The status of your item \"indigo linen scarf\" has been updated to Shipped."
    );
}

#[test]
fn render_response_dto() {
    let oid = "a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5";
    let m = NotificationModel::new_order_alert(141, 1, oid);
    let d = NotificationRespDto::from(&m);
    assert_eq!(d.user, 141);
    assert!(!d.is_read);
    assert_eq!(d.kind.as_str(), "new_order");
    assert_eq!(d.related_order.as_ref().unwrap().as_str(), oid);
    let raw = serde_json::to_string(&d).unwrap();
    // the kind field is renamed on the wire
    assert!(raw.contains("\"type\":\"new_order\""));
    assert!(!raw.contains("\"kind\""));
}

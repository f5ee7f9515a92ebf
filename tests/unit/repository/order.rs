use chrono::{Duration, Utc};

use order_trust::adapter::repository::{app_repo_order, AppRepoErrorDetail, AppRepoErrorFnLabel};
use order_trust::error::AppErrorCode;
use order_trust::model::{
    OrderModel, OrderModelError, OrderStatus, OrderTransitionReq, OrderUpdateArgs, PaymentMethod,
};
use order_trust::AppAuthedClaim;

use super::ut_setup_dstore;
use crate::model::{ut_order_args, ut_seller_claim, UT_BUYER_ID, UT_SELLER_ID};

fn ut_new_order(oid: &str, buyer_id: &str, minutes_ago: i64, custom: Option<&str>) -> OrderModel {
    let time = Utc::now() - Duration::minutes(minutes_ago);
    let mut args = ut_order_args(PaymentMethod::CashOnDelivery, time);
    args.buyer_id = buyer_id.to_string();
    args.custom_order_id = custom.map(String::from);
    OrderModel::try_new(oid.to_string(), args).unwrap()
}

#[tokio::test]
async fn create_fetch_ok() {
    let repo = app_repo_order(ut_setup_dstore()).await.unwrap();
    let orders = vec![
        ut_new_order("o-001", UT_BUYER_ID, 9, Some("c-01")),
        ut_new_order("o-002", UT_BUYER_ID, 7, Some("c-01")),
        ut_new_order("o-003", "buyer-other", 8, None),
    ];
    let result = repo.create(orders).await;
    assert!(result.is_ok());

    let saved = repo.fetch("o-002").await.unwrap().unwrap();
    assert_eq!(saved.id(), "o-002");
    assert_eq!(saved.status(), OrderStatus::Pending);
    assert_eq!(saved.custom_order_id(), Some("c-01"));
    assert!(repo.fetch("o-999").await.unwrap().is_none());

    let bought = repo.fetch_by_buyer(UT_BUYER_ID).await.unwrap();
    let ids = bought.iter().map(|m| m.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["o-001", "o-002"]);
    // oldest first
    let sold = repo.fetch_by_seller(UT_SELLER_ID).await.unwrap();
    let ids = sold.iter().map(|m| m.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["o-001", "o-003", "o-002"]);
    let lines = repo.fetch_by_custom_order("c-01").await.unwrap();
    assert_eq!(lines.len(), 2);
    assert!(repo.fetch_by_custom_order("c-02").await.unwrap().is_empty());
} // end of fn create_fetch_ok

#[tokio::test]
async fn create_empty() {
    let repo = app_repo_order(ut_setup_dstore()).await.unwrap();
    let result = repo.create(Vec::new()).await;
    assert!(result.is_err());
    let error = result.unwrap_err();
    assert_eq!(error.fn_label, AppRepoErrorFnLabel::CreateOrder);
    assert_eq!(error.code, AppErrorCode::EmptyInputData);
}

#[tokio::test]
async fn update_ok() {
    let repo = app_repo_order(ut_setup_dstore()).await.unwrap();
    let _ = repo
        .create(vec![ut_new_order("o-001", UT_BUYER_ID, 3, None)])
        .await
        .unwrap();
    let args = OrderUpdateArgs {
        actor: ut_seller_claim(),
        req: OrderTransitionReq::MarkShipped,
        time: Utc::now(),
    };
    let result = repo.update("o-001", args, OrderModel::apply).await;
    let updated = result.unwrap().unwrap();
    assert_eq!(updated.status(), OrderStatus::Shipped);
    let saved = repo.fetch("o-001").await.unwrap().unwrap();
    assert_eq!(saved.status(), OrderStatus::Shipped);
    assert_eq!(saved.last_update(), updated.last_update());
}

#[tokio::test]
async fn update_rejected_unchanged() {
    let repo = app_repo_order(ut_setup_dstore()).await.unwrap();
    let _ = repo
        .create(vec![ut_new_order("o-001", UT_BUYER_ID, 3, None)])
        .await
        .unwrap();
    let args = OrderUpdateArgs {
        actor: ut_seller_claim(),
        req: OrderTransitionReq::ApproveRefund,
        time: Utc::now(),
    };
    let result = repo.update("o-001", args, OrderModel::apply).await;
    assert!(result.is_err());
    let error = result.unwrap_err();
    assert_eq!(error.fn_label, AppRepoErrorFnLabel::UpdateOrder);
    assert!(matches!(
        error.detail,
        AppRepoErrorDetail::Order(OrderModelError::InvalidTransition { .. })
    ));
    let saved = repo.fetch("o-001").await.unwrap().unwrap();
    assert_eq!(saved.status(), OrderStatus::Pending);
    // the store lock has been released after the rejection
    let args = OrderUpdateArgs {
        actor: AppAuthedClaim::new(UT_BUYER_ID, ""),
        req: OrderTransitionReq::RequestRefund,
        time: Utc::now(),
    };
    let updated = repo.update("o-001", args, OrderModel::apply).await.unwrap();
    assert_eq!(updated.unwrap().status(), OrderStatus::RefundRequested);
}

#[tokio::test]
async fn update_missing_order() {
    let repo = app_repo_order(ut_setup_dstore()).await.unwrap();
    let args = OrderUpdateArgs {
        actor: ut_seller_claim(),
        req: OrderTransitionReq::MarkShipped,
        time: Utc::now(),
    };
    let result = repo.update("o-404", args, OrderModel::apply).await;
    assert!(result.unwrap().is_none());
}

use rust_decimal::Decimal;

use order_trust::adapter::repository::{
    app_repo_listing, app_repo_order, app_repo_seller_verify,
};
use order_trust::api::dto::{OrderCreateReqDto, OrderLineReqDto};
use order_trust::constant::hard_limit;
use order_trust::model::{OrderStatus, PaymentMethod, SellerVerifyStatus};
use order_trust::usecase::{CreateOrderUseCase, OrderQueryUseCase, WorkflowUcError};
use order_trust::{AppAuthedClaim, AppSharedState};

use super::{ut_listing, ut_seed_listings, ut_seed_verification, ut_setup_state};
use crate::model::{ut_buyer_claim, ut_seller_claim, UT_BUYER_EMAIL, UT_BUYER_ID, UT_SELLER_ID};

async fn ut_create_order_uc(shr_state: &AppSharedState, auth_claim: AppAuthedClaim) -> CreateOrderUseCase {
    let ds = shr_state.datastore();
    CreateOrderUseCase {
        repo_order: app_repo_order(ds.clone()).await.unwrap(),
        repo_listing: app_repo_listing(ds.clone()).await.unwrap(),
        repo_verify: app_repo_seller_verify(ds).await.unwrap(),
        eligible_status: vec![SellerVerifyStatus::Completed],
        auth_claim,
        logctx: shr_state.log_context().clone(),
    }
}

fn ut_req(pay_method: PaymentMethod, lines: Vec<(&str, u32)>) -> OrderCreateReqDto {
    let lines = lines
        .into_iter()
        .map(|(id, qty)| OrderLineReqDto {
            listing_id: id.to_string(),
            quantity: qty,
        })
        .collect();
    OrderCreateReqDto { pay_method, lines }
}

#[rustfmt::skip]
async fn ut_setup_listings(shr_state: &AppSharedState) {
    let items = vec![
        ut_listing("listing-101", UT_SELLER_ID, true, true),
        ut_listing("listing-102", UT_SELLER_ID, true, false),
        ut_listing("listing-103", UT_SELLER_ID, false, true),
        ut_listing("listing-104", "seller-other", true, true),
    ];
    ut_seed_listings(shr_state, items).await;
}

#[tokio::test]
async fn single_line_ok() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", 2)]);
    let resp = uc.execute(req).await.unwrap();
    assert!(resp.custom_order_id.is_none());
    assert_eq!(resp.orders.len(), 1);
    let summary = &resp.orders[0];
    assert_eq!(summary.status, OrderStatus::Pending);
    assert_eq!(summary.total.as_str(), "2300.00");
    assert_eq!(summary.buyer_id.as_str(), UT_BUYER_ID);
    assert_eq!(summary.seller_id.as_str(), UT_SELLER_ID);
    assert_eq!(summary.item_name.as_str(), "teapot listing-102");
    let saved = uc.repo_order.fetch(summary.id.as_str()).await.unwrap().unwrap();
    assert_eq!(saved.buyer_email(), UT_BUYER_EMAIL);
}

#[tokio::test]
async fn multi_lines_share_custom_id() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    let req = ut_req(
        PaymentMethod::CashOnDelivery,
        vec![("listing-101", 1), ("listing-102", 3), ("listing-104", 1)],
    );
    let resp = uc.execute(req).await.unwrap();
    let custom_oid = resp.custom_order_id.unwrap();
    assert_eq!(resp.orders.len(), 3);
    assert!(resp
        .orders
        .iter()
        .all(|o| o.custom_order_id.as_deref() == Some(custom_oid.as_str())));
    let saved = uc.repo_order.fetch_by_custom_order(custom_oid.as_str()).await.unwrap();
    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|m| m.buyer_email() == UT_BUYER_EMAIL));
    let totals = resp.orders.iter().map(|o| o.total.as_str()).collect::<Vec<_>>();
    assert_eq!(totals, vec!["1300.00", "3300.00", "1300.00"]);
}

#[tokio::test]
async fn bank_transfer_eligible_seller() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let _ = ut_seed_verification(&shr_state, UT_SELLER_ID, Some(true)).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    let req = ut_req(PaymentMethod::BankTransfer, vec![("listing-101", 2)]);
    let resp = uc.execute(req).await.unwrap();
    assert_eq!(resp.orders[0].status, OrderStatus::PendingPayment);
    assert_eq!(resp.orders[0].pay_method, PaymentMethod::BankTransfer);
}

#[tokio::test]
async fn bank_transfer_not_offered() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let _ = ut_seed_verification(&shr_state, UT_SELLER_ID, Some(true)).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    // seller verified but listing-102 does not offer bank transfer,
    // the other seller has no verification
    for lid in ["listing-102", "listing-104"] {
        let req = ut_req(PaymentMethod::BankTransfer, vec![("listing-101", 1), (lid, 1)]);
        let error = uc.execute(req).await.unwrap_err();
        if let WorkflowUcError::Validation(errors) = &error {
            assert_eq!(errors[0].field.as_str(), "pay_method");
        } else {
            assert!(false);
        }
    }
    let saved = uc.repo_order.fetch_by_buyer(UT_BUYER_ID).await.unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn listing_unavailable() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    for lid in ["listing-103", "listing-nonexist"] {
        let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", 1), (lid, 1)]);
        let error = uc.execute(req).await.unwrap_err();
        assert_eq!(error.kind(), "NotFound");
        assert!(error.to_string().contains(lid));
    }
    let saved = uc.repo_order.fetch_by_buyer(UT_BUYER_ID).await.unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn invalid_lines() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![]);
    let error = uc.execute(req).await.unwrap_err();
    assert_eq!(error.kind(), "ValidationError");
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", 0)]);
    let error = uc.execute(req).await.unwrap_err();
    if let WorkflowUcError::Validation(errors) = &error {
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_str(), "quantity");
    } else {
        assert!(false);
    }
}

fn ut_validation_fields(error: &WorkflowUcError) -> Vec<&str> {
    if let WorkflowUcError::Validation(errors) = error {
        errors.iter().map(|e| e.field.as_str()).collect()
    } else {
        Vec::new()
    }
}

#[tokio::test]
async fn quantity_or_total_out_of_range() {
    let shr_state = ut_setup_state();
    let mut expensive = ut_listing("listing-105", "seller-other", true, false);
    expensive.unit_price = Decimal::MAX;
    ut_seed_listings(&shr_state, vec![expensive]).await;
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;

    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", u32::MAX)]);
    let error = uc.execute(req).await.unwrap_err();
    assert_eq!(ut_validation_fields(&error), vec!["quantity"]);
    let max_qty = hard_limit::MAX_QUANTITY_PER_LINE;
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", max_qty + 1)]);
    let error = uc.execute(req).await.unwrap_err();
    assert_eq!(ut_validation_fields(&error), vec!["quantity"]);

    // total exceeds the range of the decimal type
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-105", 2)]);
    let error = uc.execute(req).await.unwrap_err();
    assert_eq!(error.kind(), "ValidationError");
    assert_eq!(ut_validation_fields(&error), vec!["unit_price"]);
    let saved = uc.repo_order.fetch_by_buyer(UT_BUYER_ID).await.unwrap();
    assert!(saved.is_empty());

    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", max_qty)]);
    let resp = uc.execute(req).await.unwrap();
    assert_eq!(resp.orders[0].quantity, max_qty);
} // end of fn quantity_or_total_out_of_range

#[tokio::test]
async fn buyer_email_from_claim_only() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_buyer_claim()).await;
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-102", 1)]);
    let resp = uc.execute(req).await.unwrap();
    let oid = resp.orders[0].id.as_str();
    let saved = uc.repo_order.fetch(oid).await.unwrap().unwrap();
    assert_eq!(saved.buyer_email(), UT_BUYER_EMAIL);

    let uc_query = OrderQueryUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        auth_claim: AppAuthedClaim::new("unrelated-user-999", "someone-else@example.com"),
    };
    let error = uc_query.fetch_one(oid).await.unwrap_err();
    assert_eq!(error.kind(), "Unauthorized");
}

#[tokio::test]
async fn seller_buys_own_listing() {
    let shr_state = ut_setup_state();
    ut_setup_listings(&shr_state).await;
    let uc = ut_create_order_uc(&shr_state, ut_seller_claim()).await;
    let req = ut_req(
        PaymentMethod::CashOnDelivery,
        vec![("listing-104", 1), ("listing-102", 1)],
    );
    let error = uc.execute(req).await.unwrap_err();
    assert_eq!(error.kind(), "ValidationError");
    assert_eq!(ut_validation_fields(&error), vec!["listing_id"]);
    let saved = uc.repo_order.fetch_by_buyer(UT_SELLER_ID).await.unwrap();
    assert!(saved.is_empty());

    // ordering from another seller is still allowed
    let req = ut_req(PaymentMethod::CashOnDelivery, vec![("listing-104", 1)]);
    let resp = uc.execute(req).await.unwrap();
    assert_eq!(resp.orders[0].buyer_id.as_str(), UT_SELLER_ID);
}

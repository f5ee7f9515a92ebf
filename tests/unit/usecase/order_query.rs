use chrono::{Duration, Utc};

use order_trust::adapter::repository::app_repo_order;
use order_trust::model::{OrderCreateArgs, OrderModel, PaymentMethod};
use order_trust::usecase::OrderQueryUseCase;
use order_trust::{AppAuthedClaim, AppSharedState};

use super::{ut_seed_order, ut_setup_state};
use crate::model::{ut_buyer_claim, ut_order_args, ut_seller_claim, ut_stranger_claim, UT_SELLER_ID};

async fn ut_query_uc(shr_state: &AppSharedState, auth_claim: AppAuthedClaim) -> OrderQueryUseCase {
    OrderQueryUseCase {
        repo_order: app_repo_order(shr_state.datastore()).await.unwrap(),
        auth_claim,
    }
}

#[tokio::test]
async fn fetch_one_by_party() {
    let shr_state = ut_setup_state();
    let oid = "ord-qy-001";
    let _ = ut_seed_order(&shr_state, oid, PaymentMethod::BankTransfer).await;
    for claim in [ut_buyer_claim(), ut_seller_claim()] {
        let uc = ut_query_uc(&shr_state, claim).await;
        let summary = uc.fetch_one(oid).await.unwrap();
        assert_eq!(summary.id.as_str(), oid);
        assert_eq!(summary.total.as_str(), "2300.00");
    }
    let uc = ut_query_uc(&shr_state, ut_stranger_claim()).await;
    let error = uc.fetch_one(oid).await.unwrap_err();
    assert_eq!(error.kind(), "Unauthorized");
    let error = uc.fetch_one("ord-nonexist").await.unwrap_err();
    assert_eq!(error.kind(), "NotFound");
}

// the seller of the seeded orders also buys from another seller
fn ut_order_bought_by_seller(oid: &str) -> OrderModel {
    let time = Utc::now() - Duration::minutes(30);
    let args = OrderCreateArgs {
        buyer_id: UT_SELLER_ID.to_string(),
        buyer_email: "seller@example.com".to_string(),
        seller_id: "seller-other".to_string(),
        ..ut_order_args(PaymentMethod::CashOnDelivery, time)
    };
    OrderModel::try_new(oid.to_string(), args).unwrap()
}

#[tokio::test]
async fn list_bought_and_sold() {
    let shr_state = ut_setup_state();
    let _ = ut_seed_order(&shr_state, "ord-qy-002", PaymentMethod::CashOnDelivery).await;
    let _ = ut_seed_order(&shr_state, "ord-qy-003", PaymentMethod::Online).await;
    let repo = app_repo_order(shr_state.datastore()).await.unwrap();
    repo.create(vec![ut_order_bought_by_seller("ord-qy-004")])
        .await
        .unwrap();

    let uc = ut_query_uc(&shr_state, ut_seller_claim()).await;
    let listed = uc.list().await.unwrap();
    let ids = listed.iter().map(|o| o.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["ord-qy-004", "ord-qy-002", "ord-qy-003"]);

    let uc = ut_query_uc(&shr_state, ut_buyer_claim()).await;
    let listed = uc.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    let uc = ut_query_uc(&shr_state, ut_stranger_claim()).await;
    assert!(uc.list().await.unwrap().is_empty());
}

use chrono::Utc;
use rust_decimal::Decimal;

use order_trust::model::{
    FieldErrorReason, OrderActorRole, OrderModel, OrderModelError, OrderOperation,
    OrderStatus, OrderTransitionReq, OrderUpdateArgs, PaymentMethod, TransitionRejectReason,
};
use order_trust::AppAuthedClaim;

use super::{
    ut_buyer_claim, ut_order_args, ut_seller_claim, ut_setup_order, ut_stranger_claim,
    UT_BUYER_EMAIL,
};

const ALL_STATUS: [OrderStatus; 9] = [
    OrderStatus::PendingPayment,
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Received,
    OrderStatus::Cancelled,
    OrderStatus::RefundRequested,
    OrderStatus::Refunded,
];

fn ut_update_args(actor: AppAuthedClaim, req: OrderTransitionReq) -> OrderUpdateArgs {
    OrderUpdateArgs {
        actor,
        req,
        time: Utc::now(),
    }
}

#[test]
fn create_ok() {
    let m = ut_setup_order("0a1b", PaymentMethod::BankTransfer);
    assert_eq!(m.total(), Decimal::new(2300, 0));
    assert_eq!(m.status(), OrderStatus::PendingPayment);
    assert!(m.payment_slip().is_none());
    assert!(m.review().is_none());
    let m = ut_setup_order("0a1c", PaymentMethod::CashOnDelivery);
    assert_eq!(m.status(), OrderStatus::Pending);
    let m = ut_setup_order("0a1d", PaymentMethod::Online);
    assert_eq!(m.status(), OrderStatus::Pending);
}

#[test]
fn create_invalid_fields() {
    let mut args = ut_order_args(PaymentMethod::Online, Utc::now());
    args.quantity = 0;
    args.shop_id = "  ".to_string();
    args.shipping_cost = Decimal::new(-1, 0);
    let result = OrderModel::try_new("0a1e".to_string(), args);
    assert!(result.is_err());
    if let Err(OrderModelError::Validation(errors)) = result {
        let mut fields = errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>();
        fields.sort();
        assert_eq!(fields, vec!["quantity", "shipping_cost", "shop_id"]);
    } else {
        assert!(false);
    }
}

#[test]
fn create_total_out_of_range() {
    let mut args = ut_order_args(PaymentMethod::CashOnDelivery, Utc::now());
    args.unit_price = Decimal::MAX;
    let result = OrderModel::try_new("0a1f".to_string(), args);
    if let Err(OrderModelError::Validation(errors)) = result {
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_str(), "unit_price");
    } else {
        assert!(false);
    }
    let mut args = ut_order_args(PaymentMethod::CashOnDelivery, Utc::now());
    args.quantity = 1;
    args.unit_price = Decimal::MAX;
    args.shipping_cost = Decimal::ONE;
    let result = OrderModel::try_new("0a20".to_string(), args);
    assert!(matches!(result, Err(OrderModelError::Validation(_))));
    let mut args = ut_order_args(PaymentMethod::CashOnDelivery, Utc::now());
    args.quantity = order_trust::constant::hard_limit::MAX_QUANTITY_PER_LINE + 1;
    let result = OrderModel::try_new("0a21".to_string(), args);
    if let Err(OrderModelError::Validation(errors)) = result {
        assert_eq!(errors[0].field.as_str(), "quantity");
        assert!(matches!(errors[0].reason, FieldErrorReason::OutOfRange(1, _)));
    } else {
        assert!(false);
    }
}

#[rustfmt::skip]
#[test]
fn transition_table() {
    use OrderOperation as Op;
    use OrderStatus as S;
    let expect_ok = [
        (Op::UploadPaymentSlip, S::PendingPayment, S::Pending),
        (Op::MarkShipped, S::Pending, S::Shipped),
        (Op::MarkShipped, S::Confirmed, S::Shipped),
        (Op::MarkReceived, S::PendingPayment, S::Received),
        (Op::MarkReceived, S::Pending, S::Received),
        (Op::MarkReceived, S::Confirmed, S::Received),
        (Op::MarkReceived, S::Shipped, S::Received),
        (Op::MarkReceived, S::Delivered, S::Received),
        (Op::RequestRefund, S::PendingPayment, S::RefundRequested),
        (Op::RequestRefund, S::Pending, S::RefundRequested),
        (Op::RequestRefund, S::Confirmed, S::RefundRequested),
        (Op::RequestRefund, S::Shipped, S::RefundRequested),
        (Op::RequestRefund, S::Delivered, S::RefundRequested),
        (Op::ApproveRefund, S::RefundRequested, S::Refunded),
        (Op::CancelRefund, S::PendingPayment, S::Refunded),
        (Op::CancelRefund, S::Pending, S::Refunded),
        (Op::CancelRefund, S::Confirmed, S::Refunded),
        (Op::CancelRefund, S::Shipped, S::Refunded),
        (Op::CancelRefund, S::Delivered, S::Refunded),
        (Op::CancelRefund, S::RefundRequested, S::Refunded),
    ];
    let ops = [
        Op::UploadPaymentSlip, Op::MarkShipped, Op::MarkReceived, Op::RequestRefund,
        Op::ApproveRefund, Op::CancelRefund,
    ];
    for op in ops {
        for curr in ALL_STATUS {
            let result = op.next_status(curr, false);
            let expect = expect_ok.iter()
                .find(|(o, c, _)| *o == op && *c == curr)
                .map(|(_, _, to)| *to);
            match expect {
                Some(to) => assert_eq!(result, Ok(to)),
                None => {
                    assert!(result.is_err());
                    if op == Op::MarkShipped && curr == S::PendingPayment {
                        assert_eq!(result, Err(TransitionRejectReason::PaymentProofRequired));
                    } else {
                        assert_eq!(result, Err(TransitionRejectReason::NotAllowedFrom));
                    }
                }
            }
        }
    }
} // end of fn transition_table

#[test]
fn terminal_status_no_transition() {
    let ops = [
        OrderOperation::UploadPaymentSlip,
        OrderOperation::MarkShipped,
        OrderOperation::MarkReceived,
        OrderOperation::RequestRefund,
        OrderOperation::ApproveRefund,
        OrderOperation::CancelRefund,
    ];
    for curr in ALL_STATUS.into_iter().filter(|s| s.is_terminal()) {
        for op in ops {
            assert!(op.next_status(curr, false).is_err());
        }
    }
}

#[test]
fn review_transition() {
    let op = OrderOperation::SubmitReview;
    for curr in ALL_STATUS {
        let result = op.next_status(curr, false);
        match curr {
            OrderStatus::Cancelled => {
                assert_eq!(result, Err(TransitionRejectReason::NotAllowedFrom));
            }
            OrderStatus::PendingPayment => {
                assert_eq!(result, Err(TransitionRejectReason::PaymentProofRequired));
            }
            // review never changes the status
            _others => assert_eq!(result, Ok(curr)),
        }
    }
    let result = op.next_status(OrderStatus::Received, true);
    assert_eq!(result, Err(TransitionRejectReason::ReviewAlreadySubmitted));
}

#[test]
fn operation_actor() {
    assert_eq!(OrderOperation::UploadPaymentSlip.actor(), OrderActorRole::Buyer);
    assert_eq!(OrderOperation::MarkReceived.actor(), OrderActorRole::Buyer);
    assert_eq!(OrderOperation::RequestRefund.actor(), OrderActorRole::Buyer);
    assert_eq!(OrderOperation::SubmitReview.actor(), OrderActorRole::Buyer);
    assert_eq!(OrderOperation::MarkShipped.actor(), OrderActorRole::Seller);
    assert_eq!(OrderOperation::ApproveRefund.actor(), OrderActorRole::Seller);
    assert_eq!(OrderOperation::CancelRefund.actor(), OrderActorRole::Seller);
}

#[test]
fn authorize_parties() {
    let m = ut_setup_order("0a1b", PaymentMethod::Online);
    let role = m.authorize(&ut_buyer_claim());
    assert!(role.is_buyer);
    assert!(!role.is_seller);
    let role = m.authorize(&ut_seller_claim());
    assert!(!role.is_buyer);
    assert!(role.is_seller);
    let role = m.authorize(&ut_stranger_claim());
    assert!(!role.is_party());
    // guest checkout, buyer identified by email only
    let guest = AppAuthedClaim::new("usr-guest-77", &UT_BUYER_EMAIL.to_uppercase());
    assert!(m.authorize(&guest).is_buyer);
}

#[test]
fn apply_bank_transfer_flow_ok() {
    let mut m = ut_setup_order("0a1b", PaymentMethod::BankTransfer);
    let req = OrderTransitionReq::MarkShipped;
    let result = m.apply(ut_update_args(ut_seller_claim(), req));
    assert!(matches!(
        result,
        Err(OrderModelError::InvalidTransition {
            reason: TransitionRejectReason::PaymentProofRequired,
            ..
        })
    ));
    assert_eq!(m.status(), OrderStatus::PendingPayment);

    let url = "https://objstore.local/bucket/payment-slip/0a1b/1".to_string();
    let req = OrderTransitionReq::UploadPaymentSlip { url: url.clone() };
    assert!(m.apply(ut_update_args(ut_buyer_claim(), req)).is_ok());
    assert_eq!(m.status(), OrderStatus::Pending);
    assert_eq!(m.payment_slip().unwrap().url, url);

    let req = OrderTransitionReq::MarkShipped;
    assert!(m.apply(ut_update_args(ut_seller_claim(), req)).is_ok());
    assert_eq!(m.status(), OrderStatus::Shipped);
    let req = OrderTransitionReq::MarkReceived;
    assert!(m.apply(ut_update_args(ut_buyer_claim(), req)).is_ok());
    assert_eq!(m.status(), OrderStatus::Received);

    let req = OrderTransitionReq::SubmitReview {
        rating: 5,
        text: "lovely teapot".to_string(),
    };
    assert!(m.apply(ut_update_args(ut_buyer_claim(), req)).is_ok());
    assert_eq!(m.status(), OrderStatus::Received);
    assert_eq!(m.review().unwrap().rating, 5);
    // total is never recomputed
    assert_eq!(m.total(), Decimal::new(2300, 0));
} // end of fn apply_bank_transfer_flow_ok

#[test]
fn apply_wrong_party() {
    let mut m = ut_setup_order("0a1b", PaymentMethod::CashOnDelivery);
    // buyer cannot ship, seller cannot mark received
    let result = m.apply(ut_update_args(ut_buyer_claim(), OrderTransitionReq::MarkShipped));
    assert!(matches!(result, Err(OrderModelError::RoleMismatch { .. })));
    let result = m.apply(ut_update_args(ut_seller_claim(), OrderTransitionReq::MarkReceived));
    assert!(matches!(result, Err(OrderModelError::RoleMismatch { .. })));
    let result = m.apply(ut_update_args(ut_stranger_claim(), OrderTransitionReq::RequestRefund));
    assert!(matches!(result, Err(OrderModelError::Unauthorized { .. })));
    assert_eq!(m.status(), OrderStatus::Pending);
}

#[test]
fn apply_invalid_transition_unchanged() {
    let mut m = ut_setup_order("0a1b", PaymentMethod::Online);
    let result = m.apply(ut_update_args(ut_seller_claim(), OrderTransitionReq::ApproveRefund));
    if let Err(OrderModelError::InvalidTransition { op, curr, reason, .. }) = result {
        assert_eq!(op, OrderOperation::ApproveRefund);
        assert_eq!(curr, OrderStatus::Pending);
        assert_eq!(reason, TransitionRejectReason::NotAllowedFrom);
    } else {
        assert!(false);
    }
    assert_eq!(m.status(), OrderStatus::Pending);
    let last_update = m.last_update();
    assert!(m
        .apply(ut_update_args(ut_buyer_claim(), OrderTransitionReq::RequestRefund))
        .is_ok());
    assert!(m
        .apply(ut_update_args(ut_seller_claim(), OrderTransitionReq::CancelRefund))
        .is_ok());
    assert_eq!(m.status(), OrderStatus::Refunded);
    assert!(m.last_update() >= last_update);
    let result = m.apply(ut_update_args(ut_buyer_claim(), OrderTransitionReq::MarkReceived));
    assert!(result.is_err());
    assert_eq!(m.status(), OrderStatus::Refunded);
}

#[test]
fn apply_review_invalid_fields() {
    let mut m = ut_setup_order("0a1b", PaymentMethod::Online);
    let req = OrderTransitionReq::SubmitReview {
        rating: 6,
        text: "x".repeat(2001),
    };
    let result = m.apply(ut_update_args(ut_buyer_claim(), req));
    if let Err(OrderModelError::Validation(errors)) = result {
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_str(), "rating");
        assert_eq!(errors[0].reason, FieldErrorReason::OutOfRange(1, 5));
        assert_eq!(errors[1].field.as_str(), "review_text");
    } else {
        assert!(false);
    }
    assert!(m.review().is_none());
    let req = OrderTransitionReq::SubmitReview {
        rating: 0,
        text: String::new(),
    };
    let result = m.apply(ut_update_args(ut_buyer_claim(), req));
    assert!(matches!(result, Err(OrderModelError::Validation(_))));
}

#[test]
fn apply_review_once() {
    let mut m = ut_setup_order("0a1b", PaymentMethod::Online);
    let req = OrderTransitionReq::SubmitReview {
        rating: 4,
        text: String::new(),
    };
    assert!(m.apply(ut_update_args(ut_buyer_claim(), req)).is_ok());
    let req = OrderTransitionReq::SubmitReview {
        rating: 1,
        text: "changed my mind".to_string(),
    };
    let result = m.apply(ut_update_args(ut_buyer_claim(), req));
    assert!(matches!(
        result,
        Err(OrderModelError::InvalidTransition {
            reason: TransitionRejectReason::ReviewAlreadySubmitted,
            ..
        })
    ));
    assert_eq!(m.review().unwrap().rating, 4);
}

#[test]
fn status_serde_label() {
    for s in ALL_STATUS {
        let serial = serde_json::to_value(s).unwrap();
        assert_eq!(serial.as_str(), Some(s.label()));
    }
    let serial = serde_json::to_value(PaymentMethod::CashOnDelivery).unwrap();
    assert_eq!(serial.as_str(), Some("cash-on-delivery"));
}

use rust_decimal::Decimal;

use order_trust::model::{FieldErrorReason, RatingModelError, ShopModel, ShopRatingModel};

fn ut_aggregate_all(samples: &[u8]) -> ShopRatingModel {
    let mut m = ShopRatingModel::default();
    for s in samples {
        m.aggregate(*s).unwrap();
    }
    m
}

#[test]
fn aggregate_first_sample() {
    let shop = ShopModel::new("shop-0056", "seller-0034", "tea house");
    assert_eq!(shop.rating.count, 0);
    assert_eq!(shop.rating.avg, Decimal::ZERO);
    let mut m = shop.rating;
    assert!(m.aggregate(5).is_ok());
    assert_eq!(m.count, 1);
    assert_eq!(m.avg, Decimal::new(500, 2));
}

#[test]
fn aggregate_order_independent() {
    #[rustfmt::skip]
    let permutations = [
        [4u8, 5, 3], [4, 3, 5], [5, 4, 3], [5, 3, 4], [3, 4, 5], [3, 5, 4],
    ];
    for samples in permutations {
        let m = ut_aggregate_all(&samples);
        assert_eq!(m.count, 3);
        assert_eq!(m.avg, Decimal::new(4, 0));
    }
}

#[test]
fn aggregate_round_2_decimals() {
    let m = ut_aggregate_all(&[5, 4, 4]);
    assert_eq!(m.count, 3);
    // 13 / 3 = 4.3333...
    assert_eq!(m.avg, Decimal::new(433, 2));
    let m = ut_aggregate_all(&[5, 5, 4]);
    // 14 / 3 = 4.6666...
    assert_eq!(m.avg, Decimal::new(467, 2));
}

#[test]
fn aggregate_from_existing() {
    let mut m = ShopRatingModel::new(4, Decimal::new(375, 2));
    assert!(m.aggregate(1).is_ok());
    assert_eq!(m.count, 5);
    // (3.75 * 4 + 1) / 5 = 3.2
    assert_eq!(m.avg, Decimal::new(320, 2));
}

#[test]
fn aggregate_invalid_sample() {
    let mut m = ShopRatingModel::new(2, Decimal::new(450, 2));
    for sample in [0u8, 6, 255] {
        let result = m.aggregate(sample);
        if let Err(RatingModelError::InvalidSample(e)) = result {
            assert_eq!(e.field.as_str(), "rating");
            assert_eq!(e.reason, FieldErrorReason::OutOfRange(1, 5));
        } else {
            assert!(false);
        }
    }
    assert_eq!(m.count, 2);
    assert_eq!(m.avg, Decimal::new(450, 2));
}

#[test]
fn aggregate_count_overflow() {
    let mut m = ShopRatingModel::new(u32::MAX, Decimal::new(3, 0));
    let result = m.aggregate(3);
    assert_eq!(result, Err(RatingModelError::CountOverflow(u32::MAX)));
}

use order_trust::adapter::storage::{AbstractObjectStorage, InMemObjStorage};
use order_trust::error::AppErrorCode;

#[tokio::test]
async fn put_fetch_ok() {
    let storage = InMemObjStorage::new("https://objstore.local/bucket/");
    let data = vec![0x89u8, 0x50, 0x4e, 0x47, 0x0d, 0x0a];
    let result = storage
        .put("/payment-slip/0a1b/1700000000000", "image/png", data.clone())
        .await;
    assert!(result.is_ok());
    let url = result.unwrap();
    assert_eq!(
        url.as_str(),
        "https://objstore.local/bucket/payment-slip/0a1b/1700000000000"
    );
    let (ctype, saved) = storage
        .fetch("payment-slip/0a1b/1700000000000")
        .await
        .unwrap();
    assert_eq!(ctype.as_str(), "image/png");
    assert_eq!(saved, data);
    assert!(storage.fetch("payment-slip/0a1b").await.is_none());
}

#[tokio::test]
async fn put_invalid_input() {
    let storage = InMemObjStorage::new("https://objstore.local/bucket");
    #[rustfmt::skip]
    let cases = [
        ("", "image/png", vec![1u8, 2]),
        ("verification/u1/selfie", "", vec![1u8, 2]),
        ("verification/u1/selfie", "image/jpeg", vec![]),
    ];
    for (path, ctype, data) in cases {
        let result = storage.put(path, ctype, data).await;
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert_eq!(error.code, AppErrorCode::InvalidInput);
    }
}

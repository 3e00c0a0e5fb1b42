//! Integration tests for cart persistence across sessions.
//!
//! Each "session" is a fresh `CartStore` loaded from the same JSON storage
//! file, the way a shopper returning to the site gets their previous cart.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;

use rocket_cart::{DEFAULT_STORAGE_KEY, FileStorage, PersistentStore};
use rocket_cart_integration_tests::{TestContext, expected, lines, pid, shoe_catalog};
use serde_json::json;

async fn session(path: &Path) -> TestContext<FileStorage> {
    TestContext::new(shoe_catalog(), FileStorage::new(path)).await
}

#[tokio::test]
async fn test_cart_survives_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let first = session(&path).await;
    first.store.add_item(&pid("P1")).await.unwrap();
    first.store.add_item(&pid("P2")).await.unwrap();
    first.store.set_quantity(&pid("P1"), 4).await.unwrap();
    let committed = first.store.snapshot();
    drop(first);

    let second = session(&path).await;
    assert_eq!(second.store.snapshot(), committed);
    assert_eq!(lines(&second.store.snapshot()), expected(&[("P1", 4), ("P2", 1)]));

    // display attributes come from storage, not a new catalog lookup
    assert_eq!(second.catalog.catalog_calls(), 0);
    assert_eq!(
        second.store.snapshot().get(&pid("P2")).unwrap().display().title(),
        Some("Boot")
    );
}

#[tokio::test]
async fn test_loading_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let ctx = session(&path).await;
    assert!(ctx.store.snapshot().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_malformed_cart_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let malformed = [
        "not json at all".to_string(),
        json!({"productId": "P1", "quantity": 1}).to_string(),
        json!([{"productId": "P1", "quantity": 0}]).to_string(),
        json!([{"productId": "P1", "quantity": 1}, {"productId": "P1", "quantity": 2}])
            .to_string(),
        json!([{"name": "no id", "quantity": 1}]).to_string(),
    ];

    for raw in malformed {
        let storage = FileStorage::new(&path);
        storage.write(DEFAULT_STORAGE_KEY, raw.clone()).await.unwrap();

        let ctx = TestContext::new(shoe_catalog(), storage).await;
        assert!(ctx.store.snapshot().is_empty(), "expected empty cart for {raw}");

        // the cart is still fully usable and the next commit repairs storage
        ctx.store.add_item(&pid("P1")).await.unwrap();
        let stored = ctx.storage.read(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(
            serde_json::from_str::<rocket_cart::CartState>(&stored).unwrap(),
            ctx.store.snapshot()
        );
    }
}

#[tokio::test]
async fn test_corrupt_storage_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{{{{").unwrap();

    let ctx = session(&path).await;
    assert!(ctx.store.snapshot().is_empty());

    ctx.store.add_item(&pid("P3")).await.unwrap();
    let reloaded = session(&path).await;
    assert_eq!(lines(&reloaded.store.snapshot()), expected(&[("P3", 1)]));
}

#[tokio::test]
async fn test_numeric_product_ids_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let storage = FileStorage::new(&path);
    let stored = json!([{"productId": 1, "title": "Tênis de Caminhada", "price": 179.9, "quantity": 2}]);
    storage
        .write(DEFAULT_STORAGE_KEY, stored.to_string())
        .await
        .unwrap();

    let ctx = TestContext::new(shoe_catalog(), storage).await;
    let state = ctx.store.snapshot();

    assert_eq!(lines(&state), expected(&[("1", 2)]));
    assert_eq!(
        state.get(&pid("1")).unwrap().display().price().unwrap().to_string(),
        "$179.90"
    );
}

#[tokio::test]
async fn test_sessions_sharing_a_file_keep_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let storage = Arc::new(FileStorage::new(&path));
    storage
        .write("@RocketShoes:theme", "dark".to_string())
        .await
        .unwrap();

    let ctx = TestContext::with_shared(Arc::new(shoe_catalog()), Arc::clone(&storage)).await;
    ctx.store.add_item(&pid("P1")).await.unwrap();

    assert_eq!(
        storage.read("@RocketShoes:theme").await.unwrap().as_deref(),
        Some("dark")
    );
    assert!(storage.read(DEFAULT_STORAGE_KEY).await.unwrap().is_some());
}

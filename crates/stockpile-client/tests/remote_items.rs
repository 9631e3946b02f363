//! End-to-end tests of [`RemoteItems`] against an in-process server.

use std::sync::Arc;

use stockpile_client::{
    CacheStatus, ClientError, CreateItemRequest, RemoteItems, UpdateItemRequest,
};
use stockpile_core::{Item, SqliteItemStore};
use stockpile_server::{create_router, AppState};

/// Bind a fresh server on an ephemeral port. The returned handle can
/// be aborted to take the server down mid-test.
async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let store = SqliteItemStore::open_in_memory().unwrap();
    let app = create_router(Arc::new(AppState::new(Arc::new(store))));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), handle)
}

fn widget() -> CreateItemRequest {
    CreateItemRequest {
        name: "Widget".into(),
        description: None,
        price: 9.99,
    }
}

fn snapshot(items: &RemoteItems) -> Vec<Item> {
    items.cache().all().into_iter().cloned().collect()
}

#[tokio::test]
async fn mutations_patch_cache_on_success() {
    let (base, _server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    items.refresh().await.unwrap();
    assert_eq!(items.cache().status(), CacheStatus::Loaded);
    assert!(items.cache().is_empty());

    let created = items.create(&widget()).await.unwrap();
    assert_eq!(items.cache().len(), 1);
    assert_eq!(items.cache().get(created.id), Some(&created));

    let updated = items
        .update(
            created.id,
            &UpdateItemRequest {
                price: Some(19.99),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Widget");
    assert_eq!(items.cache().get(created.id).unwrap().price, 19.99);

    items.delete(created.id).await.unwrap();
    assert!(items.cache().is_empty());
}

#[tokio::test]
async fn delete_many_removes_only_matching_ids() {
    let (base, _server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    let a = items.create(&widget()).await.unwrap();
    let b = items.create(&widget()).await.unwrap();
    let c = items.create(&widget()).await.unwrap();

    items.delete_many(&[a.id, b.id, 999]).await.unwrap();
    assert_eq!(items.cache().ids(), &[c.id]);
}

#[tokio::test]
async fn rejected_update_leaves_cache_untouched() {
    let (base, _server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    let created = items.create(&widget()).await.unwrap();
    let before = snapshot(&items);

    let err = items
        .update(
            999,
            &UpdateItemRequest {
                price: Some(1.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    assert_eq!(snapshot(&items), before);
    assert_eq!(items.cache().get(created.id).unwrap().price, 9.99);
}

#[tokio::test]
async fn rejected_create_leaves_cache_untouched() {
    let (base, _server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    items.create(&widget()).await.unwrap();
    let before = snapshot(&items);

    let err = items
        .create(&CreateItemRequest {
            name: "".into(),
            description: None,
            price: 5.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 400, .. }));

    assert_eq!(snapshot(&items), before);
}

#[tokio::test]
async fn rejected_delete_leaves_cache_untouched() {
    let (base, _server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    items.create(&widget()).await.unwrap();
    let before = snapshot(&items);

    let err = items.delete(999).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    assert_eq!(snapshot(&items), before);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_set_and_records_error() {
    let (base, server) = spawn_server().await;
    let mut items = RemoteItems::new(base);

    items.create(&widget()).await.unwrap();

    server.abort();
    let _ = server.await;

    let err = items.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(items.cache().status(), CacheStatus::Errored);
    assert!(items.cache().error().is_some());
    assert_eq!(items.cache().len(), 1);
}

//! Outbox replay against a live server instance.

use async_trait::async_trait;
use fridge_tracker::{
    error::Result,
    item::AddItemRequest,
    notification::{PushMessage, PushTransport},
    outbox::{
        BackgroundSync, InventoryClient, Outbox, PendingMutation, SyncCoordinator, SyncReport,
        SyncTag,
    },
    routes::create_router,
    state::{AppState, Config},
    subscription::PushSubscription,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct NoopTransport;

#[async_trait]
impl PushTransport for NoopTransport {
    async fn deliver(&self, _subscription: &PushSubscription, _message: &PushMessage) -> Result<()> {
        Ok(())
    }
}

async fn spawn_server(dir: &std::path::Path) -> String {
    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        data_file: dir.join("data.json"),
        subscriptions_file: dir.join("subscriptions.json"),
        upc_api_base: "http://127.0.0.1:9".into(),
        upc_token: "unused".into(),
        vapid_private_key_file: dir.join("vapid.pem"),
        vapid_subject: "mailto:test@example.com".into(),
        expiry_check_schedule: "*/10 * * * * *".into(),
        expiry_warning_days: 2,
    };
    let state = AppState::new(config, Arc::new(NoopTransport)).await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_replay_is_idempotent_against_real_server() {
    let server_dir = tempfile::tempdir().unwrap();
    let base_url = spawn_server(server_dir.path()).await;
    let client = InventoryClient::new(&base_url).unwrap();

    // Milk made it to the server before the connection dropped
    client
        .add_item(&AddItemRequest {
            name: "Milk".into(),
            exp_date: "2024-01-10".into(),
        })
        .await
        .unwrap();

    let client_dir = tempfile::tempdir().unwrap();
    let outbox = Outbox::open(client_dir.path().join("outbox.json")).await;
    outbox.enqueue(PendingMutation::add("Milk", "2024-01-10")).await.unwrap();
    outbox.enqueue(PendingMutation::add("Eggs", "2024-01-20")).await.unwrap();
    outbox.enqueue(PendingMutation::delete("Butter")).await.unwrap();

    let sync = SyncCoordinator::new(outbox.clone(), client.clone());
    let report = sync.drain_all().await;

    assert_eq!(
        report,
        SyncReport {
            applied: 1,
            already_applied: 2,
            retained: 0
        }
    );
    assert!(outbox.is_empty().await);

    let mut names: Vec<String> = client
        .list_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Eggs", "Milk"]);

    // a second drain of the same changes is a no-op
    outbox.enqueue(PendingMutation::add("Eggs", "2024-01-20")).await.unwrap();
    let report = sync.drain_all().await;
    assert_eq!(report.already_applied, 1);
    assert_eq!(client.list_items().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_offline_add_then_delete_leaves_item_deleted() {
    for _ in 0..10 {
        let server_dir = tempfile::tempdir().unwrap();
        let base_url = spawn_server(server_dir.path()).await;
        let client = InventoryClient::new(&base_url).unwrap();

        let client_dir = tempfile::tempdir().unwrap();
        let outbox = Outbox::open(client_dir.path().join("outbox.json")).await;
        let sync = BackgroundSync::new();
        outbox.enqueue(PendingMutation::add("Milk", "2024-01-10")).await.unwrap();
        sync.register(SyncTag::NewItems).await;
        outbox.enqueue(PendingMutation::delete("Milk")).await.unwrap();
        sync.register(SyncTag::DeleteItems).await;

        let (online_tx, online_rx) = watch::channel(false);
        let coordinator = SyncCoordinator::new(outbox.clone(), client.clone());
        let task = tokio::spawn(sync.clone().run(coordinator, online_rx));
        online_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while !outbox.is_empty().await {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        assert!(client.list_items().await.unwrap().is_empty());

        drop(online_tx);
        task.await.unwrap();
    }
}

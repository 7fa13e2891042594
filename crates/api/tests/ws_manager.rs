//! Unit-level tests for the WebSocket connection manager's run-scoped
//! routing. No database required.

use axum::extract::ws::Message;
use picklijst_api::ws::WsManager;

#[tokio::test]
async fn messages_route_only_to_the_subscribed_run() {
    let manager = WsManager::new();
    let mut rx_a = manager.add("a".into(), 1).await;
    let mut rx_b = manager.add("b".into(), 2).await;

    manager.subscribe_to_run("a", 10).await;
    manager.subscribe_to_run("b", 20).await;

    let sent = manager.send_to_run(10, Message::Text("hallo".into())).await;
    assert_eq!(sent, 1);

    assert!(matches!(rx_a.try_recv(), Ok(Message::Text(_))));
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribed_connections_receive_nothing() {
    let manager = WsManager::new();
    let mut rx = manager.add("a".into(), 1).await;

    let sent = manager.send_to_run(10, Message::Text("hallo".into())).await;
    assert_eq!(sent, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn resubscribe_replaces_the_previous_run() {
    let manager = WsManager::new();
    let mut rx = manager.add("a".into(), 1).await;

    manager.subscribe_to_run("a", 10).await;
    manager.subscribe_to_run("a", 20).await;

    assert_eq!(manager.send_to_run(10, Message::Text("old".into())).await, 0);
    assert_eq!(manager.send_to_run(20, Message::Text("new".into())).await, 1);

    match rx.try_recv() {
        Ok(Message::Text(text)) => assert_eq!(text.as_str(), "new"),
        other => panic!("expected the new run's message, got {other:?}"),
    }
}

#[tokio::test]
async fn subscribing_an_unknown_connection_is_a_noop() {
    let manager = WsManager::new();
    assert!(!manager.subscribe_to_run("ghost", 10).await);
}

#[tokio::test]
async fn removed_connections_are_skipped() {
    let manager = WsManager::new();
    let _rx = manager.add("a".into(), 1).await;
    manager.subscribe_to_run("a", 10).await;
    manager.remove("a").await;

    assert_eq!(manager.connection_count().await, 0);
    assert_eq!(manager.send_to_run(10, Message::Text("x".into())).await, 0);
}

#[tokio::test]
async fn shutdown_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx = manager.add("a".into(), 1).await;

    manager.shutdown_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Close(None))));
    assert_eq!(manager.connection_count().await, 0);
}

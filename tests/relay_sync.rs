use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use clipsync_lib::client::{self, HttpClient, SessionEnd};
use clipsync_lib::clipboard::{ClipboardDevice, ClipboardValue, MemoryClipboard};
use clipsync_lib::config::ClientSettings;
use clipsync_lib::relay::ConnectionError;
use clipsync_lib::server::{self, ServerState};

const WAIT: Duration = Duration::from_secs(5);

async fn start_server() -> (SocketAddr, Arc<ServerState>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = ServerState::new();
    tokio::spawn(server::serve(listener, Arc::clone(&state)));
    (addr, state)
}

fn client_settings(addr: SocketAddr) -> ClientSettings {
    ClientSettings {
        server_url: format!("ws://{}/ws", addr),
        poll_interval_ms: 10,
    }
}

fn start_client(
    addr: SocketAddr,
    device: Arc<MemoryClipboard>,
) -> (CancellationToken, JoinHandle<Result<SessionEnd, ConnectionError>>) {
    let settings = client_settings(addr);
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let device: Arc<dyn ClipboardDevice> = device;
    let handle = tokio::spawn(async move { client::run(&settings, device, token).await });
    (shutdown, handle)
}

async fn eventually(what: &str, check: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT;
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {}", what);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn read_until(http: &HttpClient, expected: &str) {
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        let value = http.read().await.unwrap();
        if value == expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "server content stuck at {:?}",
            value.as_str()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_local_copy_reaches_server_cell() {
    let (addr, state) = start_server().await;
    let http = HttpClient::new(format!("http://{}", addr));
    let device = Arc::new(MemoryClipboard::new());
    let (shutdown, handle) = start_client(addr, Arc::clone(&device));

    device.set("hello");
    read_until(&http, "hello").await;
    assert_eq!(state.content(), "hello");

    shutdown.cancel();
    let end = tokio::time::timeout(WAIT, handle).await.unwrap().unwrap().unwrap();
    assert_eq!(end, SessionEnd::Shutdown);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_http_write_reaches_client_clipboard() {
    let (addr, state) = start_server().await;
    let http = HttpClient::new(format!("http://{}", addr));
    let device = Arc::new(MemoryClipboard::new());
    let (shutdown, _handle) = start_client(addr, Arc::clone(&device));

    eventually("peer to attach", || state.peer_id().is_some()).await;

    let response = http.write(&ClipboardValue::from("world")).await.unwrap();
    assert!(response.is_success());
    assert_eq!(response.body, r#"{"message":"content updated"}"#);

    eventually("client clipboard update", || device.get() == "world").await;
    assert_eq!(state.content(), "world");

    shutdown.cancel();
}

#[tokio::test]
async fn test_write_without_peer_succeeds() {
    let (addr, state) = start_server().await;
    let http = HttpClient::new(format!("http://{}", addr));

    let response = http.write(&ClipboardValue::from("lonely")).await.unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(http.read().await.unwrap(), "lonely");
    assert_eq!(state.peer_id(), None);
}

#[tokio::test]
async fn test_malformed_write_over_http_is_rejected() {
    let (addr, _state) = start_server().await;
    let http = HttpClient::new(format!("http://{}", addr));
    http.write(&ClipboardValue::from("before")).await.unwrap();

    let response = http.write_raw(r#"{"contents":"typo"}"#).await.unwrap();
    assert_eq!(response.status.as_u16(), 400);
    assert_eq!(response.body, r#"{"error":"invalid payload"}"#);
    assert_eq!(http.read().await.unwrap(), "before");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_value_from_peer_is_not_echoed_back() {
    // A bare WebSocket peer standing in for the server
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let device = Arc::new(MemoryClipboard::new());
    let (shutdown, _handle) = start_client(addr, Arc::clone(&device));

    let (tcp, _) = listener.accept().await.unwrap();
    let mut peer = tokio_tungstenite::accept_async(tcp).await.unwrap();

    peer.send(Message::Text("A".to_string())).await.unwrap();
    eventually("client clipboard update", || device.get() == "A").await;

    // Let the watcher poll the relayed value many times
    let reads = device.read_count();
    eventually("watcher polls", || device.read_count() >= reads + 10).await;
    let echoed = tokio::time::timeout(Duration::from_millis(200), peer.next()).await;
    assert!(echoed.is_err(), "client echoed a value back: {:?}", echoed);

    // A genuine local change still goes out
    device.set("B");
    let sent = tokio::time::timeout(WAIT, peer.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(sent, Message::Text("B".to_string()));

    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_session_ends_when_server_closes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let device = Arc::new(MemoryClipboard::new());
    let (_shutdown, handle) = start_client(addr, device);

    let (tcp, _) = listener.accept().await.unwrap();
    let mut peer = tokio_tungstenite::accept_async(tcp).await.unwrap();
    peer.close(None).await.unwrap();

    let end = tokio::time::timeout(WAIT, handle).await.unwrap().unwrap().unwrap();
    assert_eq!(end, SessionEnd::ConnectionClosed);
}

#[tokio::test]
async fn test_client_dial_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let device = Arc::new(MemoryClipboard::new());
    let (_shutdown, handle) = start_client(addr, device);

    let result = tokio::time::timeout(WAIT, handle).await.unwrap().unwrap();
    assert!(matches!(result, Err(ConnectionError::Dial { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_connection_replaces_previous_peer() {
    let (addr, state) = start_server().await;
    let http = HttpClient::new(format!("http://{}", addr));
    let url = format!("ws://{}/ws", addr);

    let (mut first, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    eventually("first peer", || state.peer_id().is_some()).await;
    let first_id = state.peer_id();

    let (mut second, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    eventually("second peer", || state.peer_id().is_some() && state.peer_id() != first_id).await;

    // The replaced connection is closed by the server
    let closed = tokio::time::timeout(WAIT, async {
        loop {
            match first.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok());

    // Writes now go to the second peer only
    http.write(&ClipboardValue::from("to-second")).await.unwrap();
    let received = tokio::time::timeout(WAIT, second.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(received, Message::Text("to-second".to_string()));

    // Messages from the second peer update the cell
    second.send(Message::Text("from-second".to_string())).await.unwrap();
    read_until(&http, "from-second").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_disconnect_clears_slot() {
    let (addr, state) = start_server().await;
    let url = format!("ws://{}/ws", addr);

    let (mut peer, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    eventually("peer to attach", || state.peer_id().is_some()).await;

    peer.send(Message::Text("last words".to_string())).await.unwrap();
    peer.close(None).await.unwrap();

    eventually("peer to detach", || state.peer_id().is_none()).await;
    assert_eq!(state.content(), "last words");

    // Later writes are a no-op forward
    state.write("after".into()).await;
    assert_eq!(state.content(), "after");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_new_peer_is_served_while_old_peer_is_stalled() {
    let (addr, state) = start_server().await;
    let url = format!("ws://{}/ws", addr);

    // The first peer never reads, so a large forward blocks on its socket
    let (_stalled, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    eventually("first peer", || state.peer_id().is_some()).await;
    let first_id = state.peer_id();

    const LARGE: usize = 64 * 1024 * 1024;
    let writer = Arc::clone(&state);
    tokio::spawn(async move { writer.write("x".repeat(LARGE).into()).await });
    eventually("large value in cell", || state.content().len() == LARGE).await;

    let (mut second, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    eventually("second peer", || state.peer_id().is_some() && state.peer_id() != first_id).await;

    second.send(Message::Text("from-new-peer".to_string())).await.unwrap();
    eventually("message from new peer", || state.content() == "from-new-peer").await;
}

//! End-to-end session tests against an in-process axum server.

use std::cell::RefCell;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::{get, post};
use session::channel::{EventReceiver, Payload, TungsteniteConnector};
use session::host::{HostApi, HttpHostApi};
use session::notice::Notice;
use session::state::SessionState;
use session::{GameCode, SessionConfig, SessionManager};

type LiveManager = SessionManager<TungsteniteConnector, Vec<Notice>, Box<dyn FnMut(Payload)>>;

async fn spawn_server(host_body: &'static str) -> SocketAddr {
    let app = Router::new()
        .route("/games/", post(move || async move { host_body }))
        .route("/games/ws/{code}", get(ws_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });
    addr
}

async fn ws_handler(Path(code): Path<String>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| echo(socket, code))
}

/// Greets with the code, echoes text, and closes on `bye`.
async fn echo(mut socket: WebSocket, code: String) {
    if socket
        .send(Message::Text(format!("welcome {code}").into()))
        .await
        .is_err()
    {
        return;
    }
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) if text.as_str() == "bye" => {
                let _ = socket.send(Message::Close(None)).await;
                return;
            }
            Message::Text(text) => {
                if socket.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            Message::Close(_) => return,
            _ => {}
        }
    }
}

fn manager(origin: &str) -> (LiveManager, EventReceiver, Rc<RefCell<Vec<Payload>>>) {
    let inbox = Rc::new(RefCell::new(Vec::new()));
    let inbox_in = Rc::clone(&inbox);
    let handler: Box<dyn FnMut(Payload)> = Box::new(move |p| inbox_in.borrow_mut().push(p));
    let (manager, events) = SessionManager::new(origin, TungsteniteConnector, Vec::new(), handler);
    (manager, events, inbox)
}

/// Feed events to the manager until `done` holds.
async fn pump_until<F>(manager: &mut LiveManager, events: &mut EventReceiver, done: F)
where
    F: Fn(&LiveManager) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !done(manager) {
        let event = tokio::time::timeout_at(deadline, events.recv())
            .await
            .expect("timed out waiting for channel event")
            .expect("event queue closed");
        manager.handle(event);
    }
}

#[tokio::test]
async fn join_receives_greeting_and_echo() {
    let addr = spawn_server("1234").await;
    let (mut manager, mut events, inbox) = manager(&format!("http://{addr}"));

    let state = manager.connect(GameCode::parse("AB12").expect("code"));
    assert_eq!(state, SessionState::Connecting);

    pump_until(&mut manager, &mut events, |m| m.state() == SessionState::Open).await;
    assert!(manager.is_connected());

    pump_until(&mut manager, &mut events, |_| !inbox.borrow().is_empty()).await;
    assert_eq!(inbox.borrow()[0], Payload::Text("welcome AB12".to_owned()));

    manager.send("e2e4").expect("open");
    pump_until(&mut manager, &mut events, |_| inbox.borrow().len() >= 2).await;
    assert_eq!(inbox.borrow()[1], Payload::Text("e2e4".to_owned()));
}

#[tokio::test]
async fn server_close_disconnects() {
    let addr = spawn_server("1234").await;
    let (mut manager, mut events, _inbox) = manager(&format!("http://{addr}"));

    manager.connect(GameCode::parse("1234").expect("code"));
    pump_until(&mut manager, &mut events, |m| m.state() == SessionState::Open).await;
    manager.send("bye").expect("open");

    pump_until(&mut manager, &mut events, |m| m.state().is_terminal()).await;
    assert!(!manager.is_connected());
    assert_eq!(
        manager.notifier().last().map(|n| n.message.as_str()),
        Some("Disconnected from game 1234.")
    );
}

#[tokio::test]
async fn refused_connection_reports_failure() {
    // Bind then drop to find a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let (mut manager, mut events, _inbox) = manager(&format!("http://{addr}"));
    manager.connect(GameCode::parse("1234").expect("code"));
    pump_until(&mut manager, &mut events, |m| m.state().is_terminal()).await;

    assert_eq!(manager.state(), SessionState::Errored);
    assert_eq!(
        manager.notifier().last().map(|n| n.message.as_str()),
        Some("Failed to connect to game 1234. Check console.")
    );
}

#[tokio::test]
async fn host_then_join() {
    let addr = spawn_server("4821").await;
    let origin = format!("http://{addr}");
    let api = HttpHostApi::new(&SessionConfig::default().with_origin(&origin)).expect("client");
    let (mut manager, mut events, inbox) = manager(&origin);

    let state = manager.host_game(&api).await;
    assert_eq!(state, Some(SessionState::Connecting));
    assert_eq!(manager.code().map(GameCode::as_str), Some("4821"));

    pump_until(&mut manager, &mut events, |_| !inbox.borrow().is_empty()).await;
    assert_eq!(inbox.borrow()[0], Payload::Text("welcome 4821".to_owned()));
}

#[tokio::test]
async fn host_with_bad_body_does_not_join() {
    let addr = spawn_server("123").await;
    let origin = format!("http://{addr}");
    let api = HttpHostApi::new(&SessionConfig::default().with_origin(&origin)).expect("client");

    let response = api.create_game().await.expect("response");
    assert_eq!(response.body, "123");

    let (mut manager, _events, _inbox) = manager(&origin);
    assert_eq!(manager.accept_hosted(Ok(response)), None);
    assert_eq!(manager.state(), SessionState::Idle);
}

#[test]
fn connector_outside_runtime_reports_unavailable() {
    let (mut manager, _events, _inbox) = manager("http://127.0.0.1:9");
    let state = manager.connect(GameCode::parse("1234").expect("code"));
    assert_eq!(state, SessionState::Errored);
    assert_eq!(
        manager.notifier().last().map(|n| n.message.as_str()),
        Some("Could not create WebSocket connection.")
    );
}

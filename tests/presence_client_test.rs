//! `PresenceClient` against a loopback HTTP stub.
//!
//! Run with: cargo test --test presence_client_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};

use presence_dashboard::chart::ChartVariant;
use presence_dashboard::config::Config;
use presence_dashboard::dashboard::DashboardController;
use presence_dashboard::error::DashboardError;
use presence_dashboard::presence::{PresenceApi, PresenceClient, UserId};

use common::RecordingSurface;

const TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone, Copy)]
enum Reply {
    Json(u16, &'static str),
    /// Accept the request and never answer
    Stall,
}

struct Stub {
    config: Config,
    requests: mpsc::UnboundedReceiver<String>,
}

impl Stub {
    async fn next_request(&mut self) -> String {
        self.requests.recv().await.unwrap_or_default()
    }
}

async fn stub(reply: Reply) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, requests) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(answer(stream, reply, tx.clone()));
        }
    });

    let base_url = format!("http://127.0.0.1:{port}");
    let config = Config::from_lookup(move |key| match key {
        "PRESENCE_API_BASE_URL" => Some(base_url.clone()),
        "REQUEST_TIMEOUT_SECONDS" => Some(TIMEOUT.as_secs().to_string()),
        _ => None,
    })
    .unwrap();

    Stub { config, requests }
}

async fn answer(mut stream: TcpStream, reply: Reply, requests: mpsc::UnboundedSender<String>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let head = String::from_utf8_lossy(&head);
    let request_line = head.lines().next().unwrap_or_default().to_string();
    let _ = requests.send(request_line);

    match reply {
        Reply::Json(status, body) => {
            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Stall => {
            tokio::time::sleep(TIMEOUT * 10).await;
            drop(stream);
        }
    }
}

#[tokio::test]
async fn users_are_fetched_from_the_v2_endpoint() {
    let mut stub = stub(Reply::Json(
        200,
        r#"[{"user_id": 10, "name": "Maciej Z.", "avatar": "https://intranet/img/10"}]"#,
    ))
    .await;
    let client = assert_ok!(PresenceClient::new(&stub.config));

    let users = assert_ok!(client.users().await);

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, UserId(10));
    assert_eq!(stub.next_request().await, "GET /api/v2/users HTTP/1.1");
}

#[tokio::test]
async fn mean_time_weekday_is_requested_per_user() {
    let mut stub = stub(Reply::Json(200, r#"[["Mon", 30371.0], ["Tue", 28800]]"#)).await;
    let client = assert_ok!(PresenceClient::new(&stub.config));

    let rows = assert_ok!(client.mean_time_weekday(UserId(10)).await);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].weekday, "Mon");
    assert_eq!(
        stub.next_request().await,
        "GET /api/v1/mean_time_weekday/10 HTTP/1.1"
    );
}

#[tokio::test]
async fn server_error_on_users_is_a_directory_failure() {
    let stub = stub(Reply::Json(500, r#"{"error": "boom"}"#)).await;
    let client = assert_ok!(PresenceClient::new(&stub.config));

    let err = assert_err!(client.users().await);

    assert!(matches!(err, DashboardError::DirectoryLoadFailure(ref m) if m.contains("500")));
}

#[tokio::test]
async fn malformed_intervals_are_a_dataset_failure() {
    let mut stub = stub(Reply::Json(200, r#"[["Mon", "early", 50]]"#)).await;
    let client = assert_ok!(PresenceClient::new(&stub.config));

    let err = assert_err!(client.presence_start_end(UserId(10)).await);

    assert!(matches!(err, DashboardError::DatasetFetchFailure(_)));
    assert_eq!(
        stub.next_request().await,
        "GET /api/v1/presence_start_end/10 HTTP/1.1"
    );
}

#[tokio::test]
async fn stalled_dataset_request_reports_timeout() {
    let stub = stub(Reply::Stall).await;
    let client = assert_ok!(PresenceClient::new(&stub.config));

    let err = assert_err!(client.mean_time_weekday(UserId(10)).await);

    assert!(matches!(err, DashboardError::Timeout(d) if d == TIMEOUT));
}

#[tokio::test]
async fn stalled_directory_shows_timeout_on_the_dashboard() {
    let stub = stub(Reply::Stall).await;
    let client = assert_ok!(PresenceClient::new(&stub.config));
    let dashboard = DashboardController::from_parts(
        Arc::new(client),
        RecordingSurface::default(),
        ChartVariant::MeanWeekday,
        TIMEOUT,
        None,
    );

    let err = assert_err!(dashboard.start().await);

    assert!(matches!(err, DashboardError::Timeout(d) if d == TIMEOUT));
    let view = dashboard.view();
    assert!(view.selector.is_none());
    assert_eq!(view.main.error(), Some("Request timed out after 1s"));
}

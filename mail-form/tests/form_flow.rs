use async_trait::async_trait;
use mail_form::{
    AppState,
    form::{Acknowledgment, FormClient, MailForm},
    proxy::Proxy,
    router,
};
use mail_relay::{
    handlers,
    service::{MailRelay, MailTransport, MessageId, OutgoingMail, TransportError},
};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    refuse: bool,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<MessageId, TransportError> {
        if self.refuse {
            return Err(TransportError::Rejected("mailbox unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(MessageId::from("<form-test@localhost>"))
    }
}

async fn spawn(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Starts a relay backed by `transport` and a form server in front of it.
async fn spawn_stack(transport: Arc<RecordingTransport>) -> SocketAddr {
    let relay = Arc::new(MailRelay::new(transport, "noreply@example.com"));
    let relay_addr = spawn(handlers::router(relay)).await;

    // The form server submits to itself, so bind first to learn the port.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let form_addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState {
        proxy: Proxy::new(format!("http://{relay_addr}")).unwrap(),
        client: FormClient::new(format!("http://{form_addr}")),
    });
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    form_addr
}

fn filled_form() -> MailForm {
    let mut form = MailForm::default();
    form.set_email("a@example.com");
    form.set_subject("Hi");
    form.set_message("Test");
    form
}

#[tokio::test]
async fn submit_through_proxy_is_acknowledged_once() {
    let transport = Arc::new(RecordingTransport::default());
    let form_addr = spawn_stack(transport.clone()).await;

    let form = filled_form();
    let ack = form.submit(&FormClient::new(format!("http://{form_addr}"))).await;

    assert_eq!(ack, Acknowledgment::Sent);
    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_deref(), Some("a@example.com"));
    assert_eq!(sent[0].subject.as_deref(), Some("Hi"));
    assert_eq!(sent[0].text.as_deref(), Some("Test"));
    // Fields are not reset after sending.
    assert_eq!(form, filled_form());
}

#[tokio::test]
async fn relay_error_is_a_failed_acknowledgment() {
    let transport = Arc::new(RecordingTransport {
        refuse: true,
        ..RecordingTransport::default()
    });
    let form_addr = spawn_stack(transport).await;

    let ack = filled_form()
        .submit(&FormClient::new(format!("http://{form_addr}")))
        .await;

    assert_eq!(ack, Acknowledgment::Failed);
}

#[tokio::test]
async fn unreachable_api_is_a_failed_acknowledgment() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ack = filled_form()
        .submit(&FormClient::new(format!("http://{addr}")))
        .await;

    assert_eq!(ack, Acknowledgment::Failed);
}

#[tokio::test]
async fn proxy_strips_api_prefix() {
    let form_addr = spawn_stack(Arc::new(RecordingTransport::default())).await;

    let response = reqwest::get(format!("http://{form_addr}/api/send-email"))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"message": "Not Found"}));
}

#[tokio::test]
async fn proxy_reports_missing_relay() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let state = Arc::new(AppState {
        proxy: Proxy::new(format!("http://{dead}")).unwrap(),
        client: FormClient::new(format!("http://{dead}")),
    });
    let form_addr = spawn(router(state)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{form_addr}/api/send-email"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn proxy_keeps_repeated_response_headers() {
    use axum::{
        http::header::SET_COOKIE,
        response::AppendHeaders,
        routing::get,
    };

    let upstream = axum::Router::new().route(
        "/cookies",
        get(|| async { (AppendHeaders([(SET_COOKIE, "a=1"), (SET_COOKIE, "b=2")]), "ok") }),
    );
    let upstream_addr = spawn(upstream).await;

    let state = Arc::new(AppState {
        proxy: Proxy::new(format!("http://{upstream_addr}")).unwrap(),
        client: FormClient::new(format!("http://{upstream_addr}")),
    });
    let form_addr = spawn(router(state)).await;

    let response = reqwest::get(format!("http://{form_addr}/api/cookies"))
        .await
        .unwrap();

    assert!(response.status().is_success());
    let cookies: Vec<_> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, ["a=1", "b=2"]);
}

#[tokio::test]
async fn index_serves_the_form() {
    let form_addr = spawn_stack(Arc::new(RecordingTransport::default())).await;

    let response = reqwest::get(format!("http://{form_addr}/")).await.unwrap();
    assert!(response.status().is_success());
    let page = response.text().await.unwrap();
    assert!(page.contains("<form"));
    assert!(page.contains(r#"name="email""#));
}

#[tokio::test]
async fn form_post_without_script_sends_and_acknowledges() {
    let transport = Arc::new(RecordingTransport::default());
    let form_addr = spawn_stack(transport.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{form_addr}/"))
        .form(&[
            ("email", "a@example.com"),
            ("subject", "Hi"),
            ("message", "Test"),
        ])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let page = response.text().await.unwrap();
    assert!(page.contains("Email sent!"));
    assert_eq!(transport.sent.lock().unwrap().len(), 1);
}

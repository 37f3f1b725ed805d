//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port. `host_executed_round_trip`
//! drives the I/O-free `ChimpClient` and runs each request itself with ureq;
//! the async tests go through `RewriteServiceClient` and `ReqwestTransport`.

use std::net::SocketAddr;
use std::time::Duration;

use chimp_core::{
    ChimpClient, ClientConfig, CreateSpinOptions, HttpRequest, HttpResponse, RewriteOptions,
    RewriteServiceClient, RewriteStatus,
};
use mock_server::{Db, DEFAULT_API_KEY, DEFAULT_EMAIL};

/// Start the mock server on its own thread and return its address.
fn spawn_server(db: Db) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, db).await
        })
        .unwrap();
    });

    addr
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data and the core client interprets them.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let body = req.body();
    let mut builder = agent.post(&req.url);
    for (key, value) in &req.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    let mut response = builder.send(body.as_bytes()).expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn host_executed_round_trip() {
    let addr = spawn_server(mock_server::default_state());
    let config = ClientConfig::new("integration")
        .unwrap()
        .with_base_url(format!("http://{addr}/"));
    let client = ChimpClient::new(config);

    // Step 1: rewrite to spintax.
    let req = client
        .build_rewrite(DEFAULT_EMAIL, DEFAULT_API_KEY, "Hello world", &RewriteOptions::default())
        .unwrap();
    let result = client.parse_rewrite(execute(req)).unwrap();
    assert_eq!(result.status, RewriteStatus::Success);
    assert_eq!(result.output, "{Hello|HELLO} {world|WORLD}");

    // Step 2: resolve the spintax, skipping the original words.
    let options = CreateSpinOptions {
        dont_include_original: Some(true),
        reorder_paragraphs: None,
    };
    let req = client
        .build_create_spin(DEFAULT_EMAIL, DEFAULT_API_KEY, &result.output, &options)
        .unwrap();
    let spun = client.parse_create_spin(execute(req)).unwrap();
    assert!(spun.is_success());
    assert_eq!(spun.output, "HELLO WORLD");

    // Step 3: statistics reflect the one standard rewrite.
    let req = client.build_statistics(DEFAULT_EMAIL, DEFAULT_API_KEY).unwrap();
    let stats = client.parse_statistics(execute(req)).unwrap();
    assert!(!stats.is_error());
    assert_eq!(stats.usedthismonth, 1);
    assert_eq!(stats.remainingthismonth, stats.apilimit - 1);

    // Step 4: wrong key is a remote failure, not an error.
    let req = client.build_statistics(DEFAULT_EMAIL, "wrong").unwrap();
    let stats = client.parse_statistics(execute(req)).unwrap();
    assert_eq!(stats.error, "Invalid email or API key");
    assert_eq!(stats.remainingthismonth, 0);
}

#[tokio::test]
async fn service_client_over_reqwest() {
    let db = mock_server::default_state();
    let addr = spawn_server(db.clone());
    let config = ClientConfig::new("integration")
        .unwrap()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Some(Duration::from_secs(10)));
    let client = RewriteServiceClient::new(config).unwrap();

    let options = RewriteOptions {
        rewrite: Some(true),
        grammar_check: Some(true),
        protected_terms: vec!["Rust".to_string()],
        ..Default::default()
    };
    let result = client
        .rewrite(DEFAULT_EMAIL, DEFAULT_API_KEY, "keep Rust safe", &options)
        .await;
    assert!(result.is_success(), "{}", result.output);
    assert_eq!(result.output, "KEEP Rust SAFE");

    let spun = client
        .create_spin(
            DEFAULT_EMAIL,
            DEFAULT_API_KEY,
            "{one|uno}\n\n{two|dos}",
            &CreateSpinOptions {
                dont_include_original: None,
                reorder_paragraphs: Some(true),
            },
        )
        .await;
    assert_eq!(spun.output, "two\n\none");

    let stats = client.usage_statistics(DEFAULT_EMAIL, DEFAULT_API_KEY).await;
    assert_eq!(stats.error, "");
    assert_eq!(stats.usedtoday, 1);

    let state = db.read().await;
    let rewrite = &state.received[0];
    assert_eq!(rewrite.operation, "ChimpRewrite");
    assert_eq!(
        rewrite.keys(),
        vec!["email", "apikey", "aid", "text", "rewrite", "grammarcheck", "protectedterms"]
    );
    assert_eq!(rewrite.get("aid"), Some("integration"));
    assert_eq!(rewrite.get("text"), Some("keep Rust safe"));
}

#[tokio::test]
async fn remote_rejection_is_reported_as_failure() {
    let addr = spawn_server(mock_server::default_state());
    let config = ClientConfig::new("integration")
        .unwrap()
        .with_base_url(format!("http://{addr}"));
    let client = RewriteServiceClient::new(config).unwrap();

    let result = client
        .rewrite(DEFAULT_EMAIL, "not-the-key", "text", &RewriteOptions::default())
        .await;
    assert_eq!(result.status, RewriteStatus::Failure);
    assert_eq!(result.output, "Invalid email or API key");
}

#[tokio::test]
async fn unreachable_server_is_reported_as_failure() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = ClientConfig::new("integration")
        .unwrap()
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Some(Duration::from_secs(5)));
    let client = RewriteServiceClient::new(config).unwrap();

    let stats = client.usage_statistics(DEFAULT_EMAIL, DEFAULT_API_KEY).await;
    assert!(stats.is_error());
    assert!(stats.error.starts_with("Request failed: "), "{}", stats.error);
    assert_eq!(stats.usedever, 0);
}

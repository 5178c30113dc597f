//! Integration tests for the statistics HTTP server

#[cfg(feature = "server")]
mod server_tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use transaction_statistics::server::{run, ServerConfig, API_PREFIX};
    use transaction_statistics::{StatisticsEngine, WindowConfig};

    async fn start_server() -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
        let engine = Arc::new(StatisticsEngine::new(&WindowConfig::default()));
        let (addr, shutdown_tx) = run(ServerConfig::new(0), engine)
            .await
            .expect("Failed to start server");

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        (addr, shutdown_tx)
    }

    fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    async fn post_transaction(
        client: &reqwest::Client,
        addr: SocketAddr,
        body: serde_json::Value,
    ) -> reqwest::StatusCode {
        client
            .post(format!("http://{}{}/transactions", addr, API_PREFIX))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (addr, shutdown_tx) = start_server().await;

        let response = reqwest::get(format!("http://{}/health", addr))
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_statistics_empty_is_no_content() {
        let (addr, shutdown_tx) = start_server().await;

        let response = reqwest::get(format!("http://{}{}/statistics", addr, API_PREFIX))
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_transaction_status_mapping() {
        let (addr, shutdown_tx) = start_server().await;
        let client = reqwest::Client::new();
        let now = now_millis();

        let status = post_transaction(
            &client,
            addr,
            serde_json::json!({ "amount": 12.0, "timestamp": now }),
        )
        .await;
        assert_eq!(status, reqwest::StatusCode::CREATED);

        // Older than 60 seconds
        let status = post_transaction(
            &client,
            addr,
            serde_json::json!({ "amount": 12.0, "timestamp": now - 80_000 }),
        )
        .await;
        assert_eq!(status, reqwest::StatusCode::NO_CONTENT);

        // In the future
        let status = post_transaction(
            &client,
            addr,
            serde_json::json!({ "amount": 12.0, "timestamp": now + 60_000 }),
        )
        .await;
        assert_eq!(status, reqwest::StatusCode::NO_CONTENT);

        // Missing field
        let status =
            post_transaction(&client, addr, serde_json::json!({ "amount": 12.0 })).await;
        assert_eq!(status, reqwest::StatusCode::NO_CONTENT);

        // Not JSON at all
        let status = client
            .post(format!("http://{}{}/transactions", addr, API_PREFIX))
            .header("Content-Type", "application/json")
            .body("{ not json")
            .send()
            .await
            .expect("Failed to send request")
            .status();
        assert_eq!(status, reqwest::StatusCode::NO_CONTENT);

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_statistics_after_recording() {
        let (addr, shutdown_tx) = start_server().await;
        let client = reqwest::Client::new();
        let now = now_millis();

        for amount in [12.0, 13.0, 22.50, 12.30] {
            let status = post_transaction(
                &client,
                addr,
                serde_json::json!({ "amount": amount, "timestamp": now }),
            )
            .await;
            assert_eq!(status, reqwest::StatusCode::CREATED);
        }

        let response = client
            .get(format!("http://{}{}/statistics", addr, API_PREFIX))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["count"], 4);
        assert!((body["sum"].as_f64().unwrap() - 59.8).abs() < 1e-9);
        assert!((body["avg"].as_f64().unwrap() - 14.95).abs() < 1e-9);
        assert_eq!(body["min"].as_f64(), Some(12.0));
        assert_eq!(body["max"].as_f64(), Some(22.5));

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let (addr, shutdown_tx) = start_server().await;

        let client = reqwest::Client::new();
        let response = client
            .request(
                reqwest::Method::OPTIONS,
                format!("http://{}{}/transactions", addr, API_PREFIX),
            )
            .header("Origin", "http://localhost")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to send request");

        assert!(
            response.status().is_success() || response.status() == reqwest::StatusCode::NO_CONTENT,
            "CORS preflight failed: {}",
            response.status()
        );

        let _ = shutdown_tx.send(());
    }
}

//! Integration tests for the chat server using process-based testing.

use std::io::Write;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;

/// Helper struct to manage server process lifecycle
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    /// Start a test server on the specified port with seeded sessions
    fn start(port: u16, sessions: &[&str]) -> Self {
        let mut args = vec![
            "run".to_string(),
            "-p".to_string(),
            "idobata-server".to_string(),
            "--bin".to_string(),
            "idobata-server".to_string(),
            "--".to_string(),
            "--port".to_string(),
            port.to_string(),
        ];
        for session in sessions {
            args.push("--session".to_string());
            args.push(session.to_string());
        }

        let process = Command::new("cargo")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        // Give server time to start
        thread::sleep(Duration::from_millis(1500));

        TestServer { process, port }
    }

    /// Get the WebSocket URL for this server
    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Get the HTTP base URL for this server
    fn http_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process when the test ends
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Helper struct to manage client process lifecycle
struct TestClient {
    process: Child,
    stdin: Option<ChildStdin>,
}

impl TestClient {
    /// Start a test client with the given URL and session token
    fn start(url: &str, token: &str) -> Self {
        Self::start_with_delay(url, token, Duration::from_millis(1000))
    }

    /// Start a test client with custom delay
    fn start_with_delay(url: &str, token: &str, delay: Duration) -> Self {
        let mut process = Command::new("cargo")
            .args([
                "run",
                "-p",
                "idobata-client",
                "--bin",
                "idobata-client",
                "--",
                "--url",
                url,
                "--token",
                token,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::piped())
            .spawn()
            .expect("Failed to start client");

        // Take stdin for sending messages
        let stdin = process.stdin.take();

        // Give client time to connect if requested
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        TestClient { process, stdin }
    }

    /// Send a message to the client's stdin
    fn send_message(&mut self, message: &str) -> Result<(), std::io::Error> {
        if let Some(stdin) = &mut self.stdin {
            writeln!(stdin, "{}", message)?;
            stdin.flush()?;
        }
        Ok(())
    }

    /// Check if the client process is still running (not crashed)
    fn is_running(&mut self) -> bool {
        matches!(self.process.try_wait(), Ok(None))
    }

    /// Wait for the client process to exit with timeout
    /// Returns Ok(ExitStatus) if process exits within timeout, Err otherwise
    fn wait_for_exit(&mut self, timeout: Duration) -> Result<std::process::ExitStatus, String> {
        use std::io::Read;

        let start = std::time::Instant::now();
        loop {
            // Check if process has exited
            if let Ok(Some(status)) = self.process.try_wait() {
                return Ok(status);
            }
            // Check timeout
            if start.elapsed() > timeout {
                // Try to read stderr for debugging
                let mut stderr_output = String::new();
                if let Some(ref mut stderr) = self.process.stderr {
                    let _ = stderr.read_to_string(&mut stderr_output);
                }
                return Err(format!(
                    "Timeout waiting for process to exit after {:?}. Stderr: {}",
                    timeout,
                    if stderr_output.is_empty() {
                        "(empty)"
                    } else {
                        &stderr_output
                    }
                ));
            }
            // Sleep briefly before checking again
            thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for TestClient {
    fn drop(&mut self) {
        // Kill the client process when done
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[test]
fn test_server_starts_successfully() {
    // テスト項目: サーバーが正常に起動する
    // given (前提条件):
    let port = 18080;

    // when (操作):
    let _server = TestServer::start(port, &["T1:alice"]);

    // then (期待する結果):
    // Server started successfully (no panic)
    thread::sleep(Duration::from_millis(100));
    // If we reach here, the server started successfully
}

#[test]
fn test_client_authenticates_with_valid_token() {
    // テスト項目: 有効なトークンを持つクライアントが接続・認証できる
    // given (前提条件):
    let port = 18081;
    let server = TestServer::start(port, &["T1:alice"]);

    // when (操作):
    let mut client = TestClient::start(&server.ws_url(), "T1");

    // then (期待する結果):
    // Client stays connected after the handshake
    thread::sleep(Duration::from_millis(500));
    assert!(
        client.is_running(),
        "Client with a valid token should remain connected"
    );
}

#[test]
fn test_client_with_invalid_token_is_rejected() {
    // テスト項目: 無効なトークンのクライアントは auth_failed を受けて終了する
    // given (前提条件):
    let port = 18082;
    let server = TestServer::start(port, &["T1:alice"]);

    // when (操作):
    let mut client = TestClient::start_with_delay(
        &server.ws_url(),
        "wrong-token",
        Duration::from_millis(0),
    );

    // then (期待する結果):
    // Client should exit with an error code after auth_failed
    let exit_result = client.wait_for_exit(Duration::from_secs(15));
    assert!(
        exit_result.is_ok(),
        "Client should have exited within timeout"
    );
    let exit_status = exit_result.unwrap();
    assert!(
        !exit_status.success(),
        "Client should have exited with error code (got: {:?})",
        exit_status
    );
}

#[test]
fn test_multiple_clients_can_connect() {
    // テスト項目: 異なるトークンを持つ複数のクライアントが接続できる
    // given (前提条件):
    let port = 18083;
    let server = TestServer::start(port, &["T1:alice", "T2:bob", "T3:charlie"]);

    // when (操作):
    let mut client1 = TestClient::start(&server.ws_url(), "T1");
    let mut client2 = TestClient::start(&server.ws_url(), "T2");
    let mut client3 = TestClient::start(&server.ws_url(), "T3");

    // then (期待する結果):
    thread::sleep(Duration::from_millis(300));
    assert!(
        client1.is_running() && client2.is_running() && client3.is_running(),
        "All three clients should be connected"
    );
}

#[test]
fn test_message_broadcast() {
    // テスト項目: メッセージ送受信が正常に動作する（クラッシュしない）
    // given (前提条件):
    let port = 18084;
    let server = TestServer::start(port, &["T1:alice", "T2:bob"]);

    let mut client_alice = TestClient::start(&server.ws_url(), "T1");
    let mut client_bob = TestClient::start(&server.ws_url(), "T2");

    // when (操作):
    // alice sends a message
    client_alice
        .send_message("Hello from alice!")
        .expect("Failed to send message from alice");

    // Give time for message to be broadcast
    thread::sleep(Duration::from_millis(500));

    // then (期待する結果):
    // Both clients should still be running (not crashed)
    assert!(
        client_alice.is_running(),
        "Alice's client should still be running after sending message"
    );
    assert!(
        client_bob.is_running(),
        "Bob's client should still be running after receiving message"
    );

    // Send another message from bob to alice
    client_bob
        .send_message("Hello from bob!")
        .expect("Failed to send message from bob");

    thread::sleep(Duration::from_millis(300));

    // Both clients should still be running
    assert!(
        client_alice.is_running() && client_bob.is_running(),
        "Both clients should remain stable during message exchange"
    );

    // Note: Actual message content verification is done in unit tests
    // (broadcast engine and DTO round-trip); this test exercises the full
    // server/client processes end to end
}

#[test]
fn test_join_and_leave_notifications() {
    // テスト項目: 参加・切断の通知が流れてもクライアントが安定している
    // given (前提条件):
    let port = 18085;
    let server = TestServer::start(port, &["T1:alice", "T2:bob"]);

    let mut client_alice = TestClient::start(&server.ws_url(), "T1");

    // when (操作): bob joins after alice
    let mut client_bob = TestClient::start(&server.ws_url(), "T2");
    thread::sleep(Duration::from_millis(300));

    // then (期待する結果):
    assert!(
        client_alice.is_running(),
        "Alice should remain connected when bob joins"
    );
    assert!(
        client_bob.is_running(),
        "Bob should be connected successfully"
    );

    // bob leaves; alice should observe the leave without crashing
    drop(client_bob);
    thread::sleep(Duration::from_millis(500));
    assert!(
        client_alice.is_running(),
        "Alice should remain connected after bob leaves"
    );
}

#[tokio::test]
async fn test_http_health_and_clients_endpoints() {
    // テスト項目: HTTP エンドポイントが稼働状況と接続中クライアントを返す
    // given (前提条件):
    let port = 18086;
    let server = TestServer::start(port, &["T1:alice"]);

    // when (操作): health check
    let health = reqwest::get(format!("{}/api/health", server.http_url()))
        .await
        .expect("health request failed");

    // then (期待する結果):
    assert!(health.status().is_success());

    // when (操作): alice connects, then query the client list
    let _client = TestClient::start(&server.ws_url(), "T1");
    let clients: serde_json::Value =
        reqwest::get(format!("{}/api/clients", server.http_url()))
            .await
            .expect("clients request failed")
            .json()
            .await
            .expect("clients response was not JSON");

    // then (期待する結果):
    assert_eq!(clients["count"], 1);
    assert_eq!(clients["clients"][0]["username"], "alice");
}

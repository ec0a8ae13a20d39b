//! Shared setup for client integration tests.

#![allow(dead_code)]

use mockito::ServerGuard;
use thurgood_client::{ApiClient, ClientConfig, CredentialResolver};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const TEST_KEY: &str = "test-key";

pub fn bearer() -> String {
    format!("Bearer {}", TEST_KEY)
}

pub fn client_with(base_url: impl Into<String>, credentials: CredentialResolver) -> ApiClient {
    let config = ClientConfig::new(base_url);
    ApiClient::new(&config, credentials).unwrap()
}

/// Client pointed at the mock server with a fixed test key.
pub fn client_for(server: &ServerGuard) -> ApiClient {
    client_with(server.url(), CredentialResolver::fixed(TEST_KEY))
}

/// Client pointed at the mock server that can find no API key.
pub fn anonymous_client(server: &ServerGuard) -> ApiClient {
    client_with(server.url(), CredentialResolver::new(Vec::new()))
}

/// Server that reads each request, writes `preamble` and then holds the
/// socket open without sending anything more. Returns its base URL.
pub async fn stalling_server(preamble: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(preamble).await;
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

//! Radarr/Sonarr v3 HTTP client.
//!
//! Every request carries the `X-Api-Key` header and a fixed timeout.
//! Requests are single-attempt; callers decide what a failure means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use super::types::{ArrCommand, CatalogItem, CatalogKind, CommandAck};
use super::{ArrApi, ArrError};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one Radarr or Sonarr instance.
pub struct ArrClient {
    client: Client,
    name: String,
    base_url: String,
    api_key: String,
}

impl ArrClient {
    /// Create a client for `api_url` (e.g., "http://localhost:7878").
    pub fn new(
        name: impl Into<String>,
        api_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ArrError> {
        let name = name.into();
        let api_key = api_key.into();
        if api_url.is_empty() || api_key.is_empty() {
            return Err(ArrError::NotConfigured(format!(
                "{}: api_url and api_key are required",
                name
            )));
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            name,
            base_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, endpoint)
    }

    async fn check_status(response: Response) -> Result<Response, ArrError> {
        let status = response.status();
        if status == 401 {
            return Err(ArrError::NotConfigured("Invalid API key".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ArrError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }
}

fn map_send_error(e: reqwest::Error) -> ArrError {
    if e.is_timeout() {
        ArrError::Timeout
    } else if e.is_connect() {
        ArrError::ConnectionFailed(e.to_string())
    } else {
        ArrError::Http(e)
    }
}

#[async_trait]
impl ArrApi for ArrClient {
    async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ArrError> {
        let url = self.url(kind.endpoint());
        debug!("[{}] GET {}", self.name, url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(|e| {
            ArrError::ParseError(format!("Failed to parse {} listing: {}", kind.endpoint(), e))
        })
    }

    async fn send_command(&self, command: &ArrCommand) -> Result<CommandAck, ArrError> {
        let url = self.url("command");
        debug!(
            "[{}] POST {} {} for item {}",
            self.name,
            url,
            command.name.as_str(),
            command.item_id
        );

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&command.body())
            .send()
            .await
            .map_err(map_send_error)?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(|e| {
            ArrError::ParseError(format!("Failed to parse command response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve a single HTTP response on a local port and hand back the raw request.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 8192];
            let mut request = Vec::new();
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/", addr), handle)
    }

    #[test]
    fn test_new_requires_credentials() {
        let result = ArrClient::new("radarr", "", "key");
        assert!(matches!(result, Err(ArrError::NotConfigured(_))));

        let result = ArrClient::new("radarr", "http://localhost:7878", "");
        assert!(matches!(result, Err(ArrError::NotConfigured(_))));
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = ArrClient::new("radarr", "http://localhost:7878/", "key").unwrap();
        assert_eq!(client.url("movie"), "http://localhost:7878/api/v3/movie");
    }

    #[tokio::test]
    async fn test_list_catalog_sends_api_key() {
        let (url, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "title": "The Whale", "year": 2022}]"#,
        );
        let client = ArrClient::new("radarr", &url, "secret-key").unwrap();

        let items = client.list_catalog(CatalogKind::Movie).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "The Whale");

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/v3/movie "));
        assert!(request.to_ascii_lowercase().contains("x-api-key: secret-key"));
    }

    #[tokio::test]
    async fn test_send_command_posts_body() {
        let (url, server) = serve_once("201 Created", r#"{"id": 99, "status": "queued"}"#);
        let client = ArrClient::new("sonarr", &url, "k").unwrap();

        let ack = client
            .send_command(&ArrCommand::refresh(CatalogKind::Series, 5))
            .await
            .unwrap();
        assert_eq!(ack.id, Some(99));

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/v3/command "));
        assert!(request.contains(r#""seriesIds":[5]"#));
        assert!(request.contains(r#""name":"RefreshSeries""#));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_not_configured() {
        let (url, server) = serve_once("401 Unauthorized", "{}");
        let client = ArrClient::new("radarr", &url, "bad").unwrap();

        let result = client.list_catalog(CatalogKind::Movie).await;
        assert!(matches!(result, Err(ArrError::NotConfigured(_))));
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#);
        let client = ArrClient::new("radarr", &url, "k").unwrap();

        let result = client.list_catalog(CatalogKind::Movie).await;
        match result {
            Err(ArrError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ArrClient::new("radarr", &format!("http://{}", addr), "k").unwrap();
        let result = client.list_catalog(CatalogKind::Movie).await;
        assert!(matches!(result, Err(ArrError::ConnectionFailed(_))));
    }
}

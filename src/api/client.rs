//! Suno studio API HTTP client.

use std::time::Duration;

use reqwest::{header, Client, Method, Response, StatusCode};

use crate::api::auth::{auth_headers, now_millis};
use crate::api::types::*;
use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("suno-downloader/", env!("CARGO_PKG_VERSION"));

/// Wait assumed for a 429 without a usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Suno API client.
pub struct SunoApi {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl SunoApi {
    /// Create a new API client.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Send an authenticated request to an API path.
    async fn request(&self, method: Method, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let headers = auth_headers(
            &self.credentials.token,
            &self.credentials.device_id,
            now_millis(),
        )?;

        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .headers(headers)
            .send()
            .await?;

        tracing::debug!("Response status: {}", response.status());

        Ok(response)
    }

    /// Fetch a playlist and its entries.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistResponse> {
        let path = format!("/api/playlist/{}", playlist_id);
        let response = self.request(Method::GET, &path).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PlaylistNotFound(playlist_id.to_string()));
        }
        let response = check_status(response).await?;

        let text = response.text().await?;
        tracing::debug!("Playlist response length: {} bytes", text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse playlist: {} - Response: {}",
                e,
                truncate(&text, 500)
            ))
        })
    }

    /// Ask for a signed download URL for a clip.
    ///
    /// Returns `None` when the endpoint answers without a usable URL.
    pub async fn request_download_url(&self, clip_id: &str) -> Result<Option<String>> {
        let path = format!("/api/billing/clips/{}/download/", clip_id);
        let response = check_status(self.request(Method::POST, &path).await?).await?;
        let text = response.text().await?;
        tracing::debug!("Download URL response: {}", truncate(&text, 500));

        match serde_json::from_str::<DownloadUrlResponse>(&text) {
            Ok(body) => Ok(body.into_url()),
            Err(e) => {
                tracing::debug!("Download URL response for {} is not JSON: {}", clip_id, e);
                Ok(None)
            }
        }
    }

    /// Start downloading a media file. Signed URLs carry their own auth.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "*/*")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(retry_after(&response)));
        }
        if status.is_server_error() {
            return Err(Error::Server(status.as_u16()));
        }
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to download file: HTTP {}",
                status
            )));
        }

        Ok(response)
    }
}

/// Map error statuses onto our error type.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    // Check for rate limiting
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited(retry_after(&response)));
    }

    if status.is_server_error() {
        return Err(Error::Server(status.as_u16()));
    }

    let body = response.text().await.unwrap_or_default();

    // Check for auth errors
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!("Auth error response: {}", truncate(&body, 500));
        return Err(Error::Authentication(format!(
            "HTTP {}: {}",
            status,
            if body.is_empty() {
                "token expired or invalid, copy a fresh one from the browser"
            } else {
                truncate(&body, 200)
            }
        )));
    }

    Err(Error::Api(format!("HTTP {}: {}", status.as_u16(), truncate(&body, 200))))
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAYLIST_ID: &str = "f1485f8c-c27f-4bb9-bc8e-aff0665715df";

    fn api_for(server: &MockServer) -> SunoApi {
        let credentials = Credentials {
            token: "test-token".to_string(),
            device_id: "device-1".to_string(),
        };
        SunoApi::new(&server.uri(), credentials, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_playlist_sends_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/api/playlist/{}", PLAYLIST_ID)))
            .and(header_eq("authorization", "Bearer test-token"))
            .and(header_eq("device-id", "device-1"))
            .and(header_exists("browser-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": PLAYLIST_ID,
                "name": "Night Drive",
                "playlist_clips": [{"clip": {"id": "c1", "title": "Intro"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let playlist = api_for(&server).get_playlist(PLAYLIST_ID).await.unwrap();
        assert_eq!(playlist.display_title(), Some("Night Drive"));
        assert_eq!(playlist.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_get_playlist_status_mapping() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/playlist/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/playlist/private"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/playlist/busy"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let api = api_for(&server);
        assert!(matches!(
            api.get_playlist("missing").await,
            Err(Error::PlaylistNotFound(_))
        ));
        assert!(matches!(
            api.get_playlist("private").await,
            Err(Error::Authentication(_))
        ));
        assert!(matches!(
            api.get_playlist("busy").await,
            Err(Error::RateLimited(7))
        ));
    }

    #[tokio::test]
    async fn test_request_download_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/billing/clips/c1/download/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "download_url": "https://cdn.example/c1.mp3?sig=1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/billing/clips/c2/download/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = api_for(&server);
        assert_eq!(
            api.request_download_url("c1").await.unwrap().as_deref(),
            Some("https://cdn.example/c1.mp3?sig=1")
        );
        assert_eq!(api.request_download_url("c2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_download_file_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gone.mp3"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky.mp3"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let gone = api
            .download_file(&format!("{}/gone.mp3", server.uri()))
            .await
            .unwrap_err();
        assert!(!gone.is_retryable());

        let flaky = api
            .download_file(&format!("{}/flaky.mp3", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(flaky, Error::Server(503)));
    }

    #[test]
    fn test_truncate_char_boundary() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 100), "short");
    }
}

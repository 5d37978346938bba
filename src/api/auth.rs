//! Authentication headers for API requests.

use chrono::Utc;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::error::{Error, Result};

/// Header carrying the browser device identifier.
pub const DEVICE_ID_HEADER: &str = "device-id";

/// Header carrying the per-request browser token.
pub const BROWSER_TOKEN_HEADER: &str = "browser-token";

/// Build the `browser-token` value for a request made at `timestamp_ms`.
///
/// The web client sends a small JSON object stamped with the current time.
pub fn browser_token(timestamp_ms: i64) -> String {
    serde_json::json!({ "token": timestamp_ms.to_string() }).to_string()
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Config(format!("{} contains characters not allowed in a header", name)))
}

/// Build the authenticated header set for one API request.
pub fn auth_headers(token: &str, device_id: &str, timestamp_ms: i64) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = header_value("token", &format!("Bearer {}", token))?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(DEVICE_ID_HEADER, header_value("device_id", device_id)?);
    headers.insert(
        BROWSER_TOKEN_HEADER,
        header_value("browser-token", &browser_token(timestamp_ms))?,
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );

    Ok(headers)
}

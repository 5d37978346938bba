//! Configuration validation logic.

use crate::config::loader::{Config, MAX_WAIT_SECONDS};
use crate::error::{Error, Result};
use regex::Regex;
use uuid::Uuid;

/// Validate the run settings and playlist list.
///
/// Credentials are checked separately once they have been resolved, since they
/// may come from Bitwarden rather than the file.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_playlists(&config.playlist_ids())?;

    if config.download_workers == 0 {
        return Err(Error::ConfigValidation {
            field: "download_workers".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if config.download_retry_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "download_retry_attempts".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if config.http_timeout_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "http_timeout_seconds".to_string(),
            message: "Must be at least 1 second".to_string(),
        });
    }

    validate_wait(
        "delay_between_downloads_seconds",
        config.delay_between_downloads_seconds,
    )?;
    validate_wait(
        "download_retry_backoff_seconds",
        config.download_retry_backoff_seconds,
    )?;

    url::Url::parse(&config.api_base).map_err(|e| Error::ConfigValidation {
        field: "api_base".to_string(),
        message: format!("'{}' is not a valid URL: {}", config.api_base, e),
    })?;

    Ok(())
}

fn validate_wait(field: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || !(0.0..=MAX_WAIT_SECONDS).contains(&seconds) {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!(
                "Must be a number of seconds between 0 and {}, got {}",
                MAX_WAIT_SECONDS, seconds
            ),
        });
    }
    Ok(())
}

fn looks_like_placeholder(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains("replace_with") || lower.contains("replaceme") || lower.starts_with("your_")
}

/// Validate the bearer token.
pub fn validate_token(token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::MissingConfig(
            "token (run --init and paste your bearer token into config.yaml)".to_string(),
        ));
    }

    if looks_like_placeholder(token) {
        return Err(Error::ConfigValidation {
            field: "token".to_string(),
            message: "Token appears to be a placeholder. Paste the bearer token from your browser's developer tools.".to_string(),
        });
    }

    if token.chars().any(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "token".to_string(),
            message: "Token must not contain whitespace (copy it without the 'Bearer ' prefix)"
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the device ID.
pub fn validate_device_id(device_id: &str) -> Result<()> {
    let device_id = device_id.trim();
    if device_id.is_empty() {
        return Err(Error::MissingConfig(
            "device_id (copy the 'device-id' request header from your browser)".to_string(),
        ));
    }

    if looks_like_placeholder(device_id) {
        return Err(Error::ConfigValidation {
            field: "device_id".to_string(),
            message: "Device ID appears to be a placeholder.".to_string(),
        });
    }

    Ok(())
}

/// Validate that at least one playlist is given and that every entry parses.
pub fn validate_playlists<S: AsRef<str>, I: IntoIterator<Item = S>>(playlists: I) -> Result<()> {
    let playlists: Vec<_> = playlists.into_iter().collect();

    if playlists.is_empty() {
        return Err(Error::MissingConfig(
            "playlists (give IDs on the command line or list them in config.yaml)".to_string(),
        ));
    }

    for playlist in playlists {
        parse_playlist_id(playlist.as_ref())?;
    }

    Ok(())
}

/// Extract a playlist ID from a URL or direct ID string.
///
/// Returns the lowercase hyphenated UUID form.
pub fn parse_playlist_id(input: &str) -> Result<String> {
    let input = input.trim();

    let invalid = |message: String| Error::ConfigValidation {
        field: "playlists".to_string(),
        message,
    };

    // If it's a URL, extract the playlist ID
    if input.starts_with("http://") || input.starts_with("https://") {
        // Pattern: https://suno.com/playlist/f1485f8c-c27f-4bb9-bc8e-aff0665715df
        let url = url::Url::parse(input)?;
        let playlist_pattern = Regex::new(r"/playlist/([0-9A-Fa-f-]{32,36})/?$")
            .map_err(|e| Error::Config(format!("Invalid playlist pattern: {}", e)))?;

        let id = playlist_pattern
            .captures(url.path())
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| {
                invalid(format!("Could not extract playlist ID from URL: {}", input))
            })?;

        return canonical_uuid(id.as_str())
            .ok_or_else(|| invalid(format!("Invalid playlist ID in URL: {}", input)));
    }

    canonical_uuid(input).ok_or_else(|| {
        invalid(format!(
            "Invalid playlist ID: '{}'. Must be a UUID or a suno.com playlist URL.",
            input
        ))
    })
}

fn canonical_uuid(input: &str) -> Option<String> {
    Uuid::parse_str(input)
        .ok()
        .map(|id| id.hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "f1485f8c-c27f-4bb9-bc8e-aff0665715df";

    #[test]
    fn test_parse_playlist_id_direct() {
        assert_eq!(parse_playlist_id(ID).unwrap(), ID);
        assert_eq!(parse_playlist_id(&format!("  {}  ", ID)).unwrap(), ID);
        assert_eq!(parse_playlist_id(&ID.to_uppercase()).unwrap(), ID);
    }

    #[test]
    fn test_parse_playlist_id_url() {
        let url = format!("https://suno.com/playlist/{}", ID);
        assert_eq!(parse_playlist_id(&url).unwrap(), ID);

        let url = format!("https://suno.com/playlist/{}/?sh=abc", ID);
        assert_eq!(parse_playlist_id(&url).unwrap(), ID);
    }

    #[test]
    fn test_parse_playlist_id_invalid() {
        assert!(parse_playlist_id("12345").is_err());
        assert!(parse_playlist_id("not-a-uuid").is_err());
        assert!(parse_playlist_id("").is_err());
        assert!(parse_playlist_id(&format!("https://suno.com/song/{}", ID)).is_err());
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("eyJhbGciOiJSUzI1NiJ9.payload.sig").is_ok());
        assert!(matches!(validate_token(""), Err(Error::MissingConfig(_))));
        assert!(validate_token("REPLACE_WITH_YOUR_BEARER_TOKEN").is_err());
        assert!(validate_token("Bearer abc").is_err());
    }

    #[test]
    fn test_validate_device_id() {
        assert!(validate_device_id("0f3c2a9e-1111-2222-3333-444455556666").is_ok());
        assert!(validate_device_id("   ").is_err());
        assert!(validate_device_id("REPLACE_WITH_YOUR_DEVICE_ID").is_err());
    }

    #[test]
    fn test_validate_playlists() {
        assert!(validate_playlists([ID]).is_ok());
        assert!(matches!(
            validate_playlists(Vec::<String>::new()),
            Err(Error::MissingConfig(_))
        ));
        assert!(validate_playlists([ID, "bogus"]).is_err());
    }

    #[test]
    fn test_validate_config_limits() {
        let mut config = Config {
            playlists: vec![crate::config::PlaylistEntry::Id(ID.to_string())],
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());

        config.download_workers = 0;
        assert!(validate_config(&config).is_err());

        config.download_workers = 2;
        config.download_retry_attempts = 0;
        assert!(validate_config(&config).is_err());

        config.download_retry_attempts = 1;
        config.api_base = "not a url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_waits() {
        let base = Config {
            playlists: vec![crate::config::PlaylistEntry::Id(ID.to_string())],
            ..Config::default()
        };

        for bad in [f64::INFINITY, f64::NAN, -1.0, 1e30] {
            let config = Config {
                delay_between_downloads_seconds: bad,
                ..base.clone()
            };
            assert!(matches!(
                validate_config(&config),
                Err(Error::ConfigValidation { ref field, .. }) if field == "delay_between_downloads_seconds"
            ));

            let config = Config {
                download_retry_backoff_seconds: bad,
                ..base.clone()
            };
            assert!(matches!(
                validate_config(&config),
                Err(Error::ConfigValidation { ref field, .. }) if field == "download_retry_backoff_seconds"
            ));
        }

        let config = Config {
            delay_between_downloads_seconds: 0.0,
            download_retry_backoff_seconds: MAX_WAIT_SECONDS,
            ..base
        };
        assert!(validate_config(&config).is_ok());
    }
}

//! Destination URL validation.
//!
//! URLs are checked syntactically and stored as given; nothing is fetched.

use url::Url;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS URLs are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Validates that `input` is an absolute `http` or `https` URL with a host
/// and no control characters.
///
/// Returns the trimmed input on success.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_destination_url("https://long.example.com/x").is_ok());
/// assert!(validate_destination_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // The stored text becomes a Location header verbatim.
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

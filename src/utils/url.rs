// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::{AppError, Result};

/// Build an endpoint URL by appending path segments to a base URL.
///
/// Each segment is percent-encoded, so a username can never escape its
/// path position.
///
/// # Examples
/// ```
/// use leetmail::utils::url::endpoint;
///
/// let url = endpoint("https://api.example.com/", &["userProfile", "alice"]).unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/userProfile/alice");
/// ```
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| AppError::config(format!("'{base}' cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

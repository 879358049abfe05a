//! Share codes - Compact text form of a build for links

mod code;

pub use code::{decode, decode_or_default, encode};

use thiserror::Error;
use url::Url;

/// Query parameter carrying the share code in a build link
pub const SHARE_PARAM: &str = "b";

/// Share code decoding error
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Share code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Share code is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Share code is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Share code payload is not a JSON object")]
    NotAnObject,
    #[error("Invalid share URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Link to `base` that carries `code` in the `b` query parameter.
/// Any existing `b` parameter is replaced.
pub fn share_url(base: &str, code: &str) -> Result<String, ShareError> {
    let mut url = Url::parse(base)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != SHARE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(SHARE_PARAM, code);
    Ok(url.to_string())
}

/// The share code in a build link, if `input` is a URL with a `b` parameter
pub fn code_from_url(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == SHARE_PARAM)
        .map(|(_, v)| v.into_owned())
}

/// Share code from user input that is either a build link or a bare code
pub fn code_from_input(input: &str) -> String {
    code_from_url(input).unwrap_or_else(|| input.trim().to_string())
}

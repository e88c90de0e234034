//! Response body decoding shared by the HTTP adapters.

use crate::platform::domain::RemoteError;
use serde::Deserialize;
use serde_json::Value;

/// Decodes a response body as JSON, wrapping non-JSON text as a string.
pub(crate) fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Parses a data API error body into a classified [`RemoteError`].
pub(crate) fn remote_error(status: u16, text: &str) -> RemoteError {
    let parsed = serde_json::from_str::<ErrorBody>(text).ok();
    let code = parsed.as_ref().and_then(|body| body.code.clone());
    let message = parsed
        .and_then(|body| body.message.or(body.error))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                format!("request failed with status {status}")
            } else {
                text.trim().to_owned()
            }
        });
    RemoteError::new(Some(status), code.as_deref(), message)
}

use serde_json::Value;

use super::error::ApiError;
use super::models::{Alert, UploadGrant};

/// How the service wrapped a response payload.
///
/// Both endpoints answer either with the payload fields at the top
/// level or with the payload JSON-encoded a second time under a
/// string `body` field (API Gateway proxy integration). This is the
/// single place that ambiguity is resolved; callers only ever see the
/// unwrapped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Direct(Value),
    Nested(Value),
}

impl Envelope {
    pub fn into_value(self) -> Value {
        match self {
            Self::Direct(value) | Self::Nested(value) => value,
        }
    }
}

pub fn unwrap_envelope(value: Value) -> Result<Envelope, ApiError> {
    match value.get("body").and_then(Value::as_str) {
        Some(raw) => Ok(Envelope::Nested(serde_json::from_str(raw)?)),
        None => Ok(Envelope::Direct(value)),
    }
}

/// Extracts the alert collection from either envelope shape. A
/// payload with no `items` field is an empty collection, not an error.
pub fn parse_alert_items(value: Value) -> Result<Vec<Alert>, ApiError> {
    let payload = unwrap_envelope(value)?.into_value();
    match payload.get("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items.clone())?),
    }
}

/// Extracts the pre-signed upload target from either envelope shape.
pub fn parse_upload_grant(value: Value) -> Result<UploadGrant, ApiError> {
    let payload = unwrap_envelope(value)?.into_value();
    if payload.get("uploadUrl").is_none_or(Value::is_null) {
        return Err(ApiError::MissingUploadUrl);
    }
    Ok(serde_json::from_value(payload)?)
}

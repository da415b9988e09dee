use serde::Deserialize;
use serde::de::DeserializeOwned;

use careboard_core::DomainError;

// -------------------------
// Query strings
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
}

// -------------------------
// Body decoding
// -------------------------

/// Decode a JSON mutation body.
///
/// The mutation routes take raw bytes instead of `Json<T>` so that any
/// decode failure (empty body, bad JSON, wrong shape) maps to their generic
/// 500 failure body rather than axum's 4xx rejections.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body).map_err(|e| DomainError::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use careboard_core::TriggerAlertRequest;

    #[test]
    fn decode_body_rejects_empty_and_wrong_shape() {
        assert!(decode_body::<TriggerAlertRequest>(b"").is_err());
        assert!(decode_body::<TriggerAlertRequest>(b"[1,2]").is_err());
        assert!(decode_body::<TriggerAlertRequest>(br#"{"unit": 7}"#).is_err());

        let ok: TriggerAlertRequest = decode_body(br#"{"unit":"ER"}"#).unwrap();
        assert_eq!(ok.unit.as_deref(), Some("ER"));
    }
}

use serde::Deserialize;

use crate::domain::{
    CreateMessage, MessageResource, MessageSid, MessageStatus, MessageText, RawPhoneNumber,
    ValidationError,
};

const FROM_FIELD: &str = "From";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains an invalid message sid: {0}")]
    InvalidSid(#[source] ValidationError),
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResponse {
    sid: String,
    status: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Error body Twilio returns with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
}

pub fn encode_create_message_form(request: &CreateMessage) -> Vec<(String, String)> {
    vec![
        (
            RawPhoneNumber::FIELD.to_owned(),
            request.to().raw().to_owned(),
        ),
        (FROM_FIELD.to_owned(), request.sender().raw().to_owned()),
        (
            MessageText::FIELD.to_owned(),
            request.body().as_str().to_owned(),
        ),
    ]
}

pub fn decode_message_json_response(json: &str) -> Result<MessageResource, TransportError> {
    let parsed: MessageJsonResponse = serde_json::from_str(json)?;
    let sid = MessageSid::new(parsed.sid).map_err(TransportError::InvalidSid)?;

    Ok(MessageResource {
        sid,
        status: MessageStatus::from_wire(&parsed.status),
        to: parsed.to.and_then(|to| RawPhoneNumber::new(to).ok()),
        from: parsed.from.and_then(|from| RawPhoneNumber::new(from).ok()),
        error_code: parsed.error_code,
        error_message: parsed.error_message,
    })
}

/// Decode a Twilio error body; `None` when the body is not one.
pub fn decode_api_error(json: &str) -> Option<ApiErrorBody> {
    serde_json::from_str(json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateMessage {
        CreateMessage::new(
            RawPhoneNumber::new("+15550001").unwrap(),
            RawPhoneNumber::new("+15559999").unwrap(),
            MessageText::new("disk almost full").unwrap(),
        )
    }

    #[test]
    fn encode_create_message_form_uses_twilio_field_names() {
        let params = encode_create_message_form(&request());
        assert_eq!(
            params,
            vec![
                ("To".to_owned(), "+15550001".to_owned()),
                ("From".to_owned(), "+15559999".to_owned()),
                ("Body".to_owned(), "disk almost full".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_message_json_response_maps_fields() {
        let json = r#"
        {
          "sid": "SM0123456789abcdef0123456789abcdef",
          "status": "queued",
          "to": "+15550001",
          "from": "+15559999",
          "body": "disk almost full",
          "error_code": null,
          "error_message": null,
          "num_segments": "1"
        }
        "#;

        let resource = decode_message_json_response(json).unwrap();
        assert_eq!(resource.sid.as_str(), "SM0123456789abcdef0123456789abcdef");
        assert_eq!(resource.status, MessageStatus::Queued);
        assert_eq!(resource.to.as_ref().map(RawPhoneNumber::raw), Some("+15550001"));
        assert_eq!(resource.from.as_ref().map(RawPhoneNumber::raw), Some("+15559999"));
        assert_eq!(resource.error_code, None);
        assert_eq!(resource.error_message, None);
    }

    #[test]
    fn decode_message_json_response_keeps_unknown_status() {
        let json = r#"{ "sid": "SM1", "status": "partially_delivered" }"#;
        let resource = decode_message_json_response(json).unwrap();
        assert_eq!(
            resource.status,
            MessageStatus::Unknown("partially_delivered".to_owned())
        );
        assert_eq!(resource.status.to_string(), "partially_delivered");
    }

    #[test]
    fn decode_message_json_response_rejects_blank_sid() {
        let json = r#"{ "sid": "  ", "status": "queued" }"#;
        let err = decode_message_json_response(json).unwrap_err();
        assert!(matches!(err, TransportError::InvalidSid(_)));
    }

    #[test]
    fn decode_message_json_response_rejects_invalid_json() {
        let err = decode_message_json_response("{ not json }").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }

    #[test]
    fn decode_api_error_reads_twilio_error_body() {
        let json = r#"
        {
          "code": 21211,
          "message": "The 'To' number 123 is not a valid phone number.",
          "more_info": "https://www.twilio.com/docs/errors/21211",
          "status": 400
        }
        "#;

        let body = decode_api_error(json).unwrap();
        assert_eq!(body.code, Some(21211));
        assert_eq!(
            body.message,
            "The 'To' number 123 is not a valid phone number."
        );
        assert_eq!(
            body.more_info.as_deref(),
            Some("https://www.twilio.com/docs/errors/21211")
        );
    }

    #[test]
    fn decode_api_error_returns_none_for_other_bodies() {
        assert_eq!(decode_api_error("<html>Bad Gateway</html>"), None);
        assert_eq!(decode_api_error(""), None);
    }
}

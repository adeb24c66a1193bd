//! Wire types for the chat endpoint.
//!
//! Every turn is one JSON POST. The request carries the user's text (or a
//! control token) and, for location turns, the coordinates. The reply
//! carries display text and an optional set of quick-reply options.

use crate::location::Coordinates;
use serde::{Deserialize, Serialize};

/// Reserved `message` values with client-side handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlToken {
    /// Greeting trigger sent when the window opens.
    Greeting,
    /// Clears the backend session.
    Reset,
    /// Intercepted locally: acquire coordinates, then send a location turn.
    FindOfficeByLocation,
}

impl ControlToken {
    /// Returns the wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            ControlToken::Greeting => "hi",
            ControlToken::Reset => "reset",
            ControlToken::FindOfficeByLocation => "find_office_by_location",
        }
    }

    /// Recognize a payload as a control token.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "hi" => Some(ControlToken::Greeting),
            "reset" => Some(ControlToken::Reset),
            "find_office_by_location" => Some(ControlToken::FindOfficeByLocation),
            _ => None,
        }
    }
}

/// Request body for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// User text or control token.
    pub message: String,
    /// Latitude, present only on location turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude, present only on location turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ChatRequest {
    /// A plain text turn.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// A control token turn.
    pub fn control(token: ControlToken) -> Self {
        Self::text(token.as_str())
    }

    /// A location turn carrying coordinates.
    pub fn location(coordinates: Coordinates) -> Self {
        Self {
            message: ControlToken::FindOfficeByLocation.as_str().into(),
            latitude: Some(coordinates.latitude),
            longitude: Some(coordinates.longitude),
        }
    }
}

/// Reply body for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Text to display as the bot's message.
    pub response: String,
    /// Quick-reply options; absent means "keep whatever is shown".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ReplyOption>>,
}

/// A quick-reply option rendered as a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct ReplyOption {
    /// Label shown on the button and echoed into the transcript.
    pub text: String,
    /// Payload sent back when the option is chosen.
    pub value: String,
}

impl ReplyOption {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Options arrive either as `{"text","value"}` objects or as bare labels.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Label(String),
    Full {
        text: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl From<RawOption> for ReplyOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Label(label) => Self {
                value: label.clone(),
                text: label,
            },
            RawOption::Full { text, value } => Self {
                value: value.unwrap_or_else(|| text.clone()),
                text,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_control_token_parse() {
        assert_eq!(ControlToken::parse("hi"), Some(ControlToken::Greeting));
        assert_eq!(ControlToken::parse("reset"), Some(ControlToken::Reset));
        assert_eq!(
            ControlToken::parse("find_office_by_location"),
            Some(ControlToken::FindOfficeByLocation)
        );
        assert_eq!(ControlToken::parse("Hi there"), None);
        assert_eq!(ControlToken::parse("RESET"), None);
    }

    #[test]
    fn test_text_request_omits_coordinates() {
        let body = serde_json::to_value(ChatRequest::text("track my parcel")).unwrap();
        assert_eq!(body, json!({"message": "track my parcel"}));
    }

    #[test]
    fn test_location_request_shape() {
        let body = serde_json::to_value(ChatRequest::location(Coordinates {
            latitude: 12.97,
            longitude: 77.59,
        }))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "message": "find_office_by_location",
                "latitude": 12.97,
                "longitude": 77.59
            })
        );
    }

    #[test]
    fn test_reply_with_object_options() {
        let reply: ChatReply = serde_json::from_value(json!({
            "response": "X",
            "options": [{"text": "A", "value": "a"}]
        }))
        .unwrap();
        assert_eq!(reply.response, "X");
        assert_eq!(reply.options, Some(vec![ReplyOption::new("A", "a")]));
    }

    #[test]
    fn test_reply_with_label_options() {
        let reply: ChatReply = serde_json::from_value(json!({
            "response": "Hello!",
            "options": ["Track & Trace", {"text": "Go back"}]
        }))
        .unwrap();
        let options = reply.options.unwrap();
        assert_eq!(options[0], ReplyOption::new("Track & Trace", "Track & Trace"));
        assert_eq!(options[1], ReplyOption::new("Go back", "Go back"));
    }

    #[test]
    fn test_reply_without_options() {
        let reply: ChatReply =
            serde_json::from_value(json!({"response": "Please enter a pincode"})).unwrap();
        assert!(reply.options.is_none());
    }

    #[test]
    fn test_reply_ignores_unknown_fields() {
        let reply: ChatReply = serde_json::from_value(json!({
            "response": "Found 3 post offices",
            "options": [],
            "full_data": [{"Name": "Anna Nagar"}]
        }))
        .unwrap();
        assert_eq!(reply.options, Some(vec![]));
    }

    #[test]
    fn test_reply_requires_response() {
        let result: Result<ChatReply, _> = serde_json::from_value(json!({"options": []}));
        assert!(result.is_err());
    }
}

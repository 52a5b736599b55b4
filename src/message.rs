//! Message records exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name shown for messages that carry no user.
pub const ANONYMOUS: &str = "Anonymous";

/// A chat message as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub text: String,
}

impl Message {
    pub fn new(user: Option<String>, text: impl Into<String>) -> Self {
        Self {
            user,
            text: text.into(),
        }
    }

    /// `"<user>: <text>"`, with [`ANONYMOUS`] standing in for a missing user.
    pub fn display_line(&self) -> String {
        let user = self
            .user
            .as_deref()
            .filter(|user| !user.is_empty())
            .unwrap_or(ANONYMOUS);
        format!("{}: {}", user, self.text)
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Error body the backend may attach to a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The detail as display text, or `None` when it is absent or falsy
    /// (`null`, `false`, `0`, `""`). Arrays and objects are rendered as JSON.
    pub fn detail_text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .filter(|detail| is_truthy(detail))
            .map(display_string)
    }
}

/// Truthiness of a JSON value as a browser client sees it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a scalar as it would be interpolated into a string. Strings are
/// taken verbatim, integral floats lose their `.0`, and arrays and objects
/// become compact JSON.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(n) if number.is_f64() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", n as i64)
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// One element of the `GET /messages` array.
///
/// The backend normally sends `{user?, text}` objects, but any other JSON value
/// is accepted and shown stringified. An object counts as a message when its
/// `text` is truthy; scalar `text` and `user` values are shown in string form.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    Message(Message),
    Raw(Value),
}

impl WireMessage {
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(ref fields) = value {
            if let Some(text) = fields.get("text").filter(|text| is_truthy(text)) {
                let user = fields
                    .get("user")
                    .filter(|user| is_truthy(user))
                    .map(display_string);
                return WireMessage::Message(Message::new(user, display_string(text)));
            }
        }
        WireMessage::Raw(value)
    }

    /// Text of the display entry for this element.
    pub fn display_line(&self) -> String {
        match self {
            WireMessage::Message(message) => message.display_line(),
            WireMessage::Raw(Value::String(text)) => text.clone(),
            WireMessage::Raw(other) => other.to_string(),
        }
    }
}

/// Parse a `GET /messages` response body.
pub fn parse_message_list(body: &[u8]) -> serde_json::Result<Vec<WireMessage>> {
    let values: Vec<Value> = serde_json::from_slice(body)?;
    Ok(values.into_iter().map(WireMessage::from_value).collect())
}

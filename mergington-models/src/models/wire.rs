use mergington_dependencies::serde_json::Value;

/// Request body of the signup and unregister calls.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct EmailBody {
    pub email: String,
}

impl EmailBody {
    pub fn new<S: Into<String>>(email: S) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Body of a successful signup or unregister call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    /// Reads any JSON a successful call answered with. The call succeeded regardless, so a
    /// body without a string `message` gives an empty message.
    pub fn from_value(body: Value) -> Self {
        let message = match body {
            Value::Object(mut fields) => match fields.remove("message") {
                Some(Value::String(message)) => message,
                _ => String::new(),
            },
            _ => String::new(),
        };
        Self { message }
    }
}

/// Body of a rejected call.
///
/// `detail` is a plain string for rejections raised by the activity handlers, and a list of
/// `{loc, msg, type}` objects when the API's request validation refused the body (for example
/// an email outside the school domain). A body without `detail` is still a rejection.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct ApiDetail {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ApiDetail {
    pub fn from_message<S: Into<String>>(detail: S) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// Reads any JSON a rejected call answered with. Bodies that are not objects carry no
    /// detail.
    pub fn from_value(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                detail: fields.remove("detail"),
            },
            _ => Self::default(),
        }
    }

    /// Human readable text of the rejection, if the API provided any.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        }
    }
}

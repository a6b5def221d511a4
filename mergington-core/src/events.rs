//! Delegated event binding for the board.
//!
//! Rendered controls carry a `data-action` attribute plus the parameters of that action as
//! further `data-*` attributes. A host listens once, at the board root, and hands the attributes
//! of whatever element fired to [`BoardEvent::from_attributes`]. Re-rendering never needs to
//! re-register anything.

use std::collections::BTreeMap;

use thiserror::Error;

pub const ATTR_ACTION: &str = "data-action";
pub const ATTR_ACTIVITY: &str = "data-activity";
pub const ATTR_EMAIL: &str = "data-email";

pub const ACTION_UNREGISTER: &str = "unregister";
pub const ACTION_SIGNUP: &str = "signup";
pub const ACTION_REFRESH: &str = "refresh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Refresh,
    Signup { email: String, activity: String },
    Unregister { activity: String, email: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("element has no data-action attribute")]
    NoAction,
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("action {action:?} is missing attribute {attribute}")]
    MissingAttribute {
        action: &'static str,
        attribute: &'static str,
    },
}

impl BoardEvent {
    /// Decodes an event from the attributes of the element that triggered it.
    ///
    /// Attribute names may be given with or without their `data-` prefix, so both DOM
    /// attributes and form field names decode to the same event. Values are taken verbatim.
    pub fn from_attributes<I, K, V>(attributes: I) -> Result<Self, EventError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attrs: BTreeMap<String, String> = attributes
            .into_iter()
            .map(|(k, v)| {
                let k = k.as_ref();
                let k = k.strip_prefix("data-").unwrap_or(k).to_string();
                (k, v.into())
            })
            .collect();
        let action = attrs.remove("action").ok_or(EventError::NoAction)?;
        let mut take = |action: &'static str, attribute: &'static str| {
            let key = attribute.strip_prefix("data-").unwrap_or(attribute);
            attrs
                .remove(key)
                .ok_or(EventError::MissingAttribute { action, attribute })
        };
        match action.as_str() {
            ACTION_REFRESH => Ok(BoardEvent::Refresh),
            ACTION_SIGNUP => Ok(BoardEvent::Signup {
                email: take(ACTION_SIGNUP, ATTR_EMAIL)?,
                activity: take(ACTION_SIGNUP, ATTR_ACTIVITY)?,
            }),
            ACTION_UNREGISTER => Ok(BoardEvent::Unregister {
                activity: take(ACTION_UNREGISTER, ATTR_ACTIVITY)?,
                email: take(ACTION_UNREGISTER, ATTR_EMAIL)?,
            }),
            _ => Err(EventError::UnknownAction(action)),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            BoardEvent::Refresh => ACTION_REFRESH,
            BoardEvent::Signup { .. } => ACTION_SIGNUP,
            BoardEvent::Unregister { .. } => ACTION_UNREGISTER,
        }
    }

    /// The attributes a control must carry to fire this event.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![(ATTR_ACTION, self.action().to_string())];
        match self {
            BoardEvent::Refresh => {}
            BoardEvent::Signup { email, activity } | BoardEvent::Unregister { activity, email } => {
                attrs.push((ATTR_ACTIVITY, activity.clone()));
                attrs.push((ATTR_EMAIL, email.clone()));
            }
        }
        attrs
    }
}

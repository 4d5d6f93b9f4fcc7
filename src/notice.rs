use crate::error::Error;
use serde::Serialize;
use std::fmt;

/// A message for the person at the dashboard, produced by a user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "text", rename_all = "lowercase")]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice::Info(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice::Error(text.into())
    }

    /// Server rejections are shown verbatim; anything else gets `context` in front.
    pub fn from_error(context: &str, err: &Error) -> Self {
        match err {
            Error::Rejected(message) => Notice::Error(message.clone()),
            other => Notice::Error(format!("{}: {}", context, other)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Info(text) => write!(f, "{}", text),
            Notice::Error(text) => write!(f, "error: {}", text),
        }
    }
}

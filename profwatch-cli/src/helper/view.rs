use std::fmt;

use profwatch_api::serde_json::{self, json, Value};
use profwatch_api::ApiError;

use crate::helper::ctx::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection, timeout or body read failure.
    Transport,
    Status(u16),
    Decode,
    /// The backend answered with an empty result set.
    Empty,
    Config,
}

impl From<&ApiError> for FailureReason {
    fn from(e: &ApiError) -> Self {
        match e {
            ApiError::Transport { .. } => Self::Transport,
            ApiError::Status { status, .. } => Self::Status(status.as_u16()),
            ApiError::Decode { .. } => Self::Decode,
            ApiError::InvalidBaseUrl { .. } | ApiError::Client(_) => Self::Config,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport"),
            Self::Status(code) => write!(f, "status {code}"),
            Self::Decode => f.write_str("decode"),
            Self::Empty => f.write_str("empty"),
            Self::Config => f.write_str("config"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub reason: FailureReason,
    /// Fixed text shown to the user in place of the results.
    pub message: &'static str,
}

impl Failure {
    pub fn new(reason: FailureReason, message: &'static str) -> Self {
        Self { reason, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

/// Data a view can show once a request succeeds.
pub trait Render {
    fn render_text(&self) -> String;
    fn to_json(&self) -> Value;
}

/// Result region of one form. Every settled request replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<T> {
    Idle,
    Ready(T),
    Failed(Failure),
}

impl<T> Default for View<T> {
    fn default() -> Self {
        View::Idle
    }
}

impl<T> View<T> {
    pub fn apply(&mut self, outcome: Outcome<T>) {
        *self = match outcome {
            Outcome::Success(data) => View::Ready(data),
            Outcome::Failure(failure) => View::Failed(failure),
        };
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            View::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_text(&self) -> Option<&'static str> {
        match self {
            View::Failed(failure) => Some(failure.message),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, View::Failed(_))
    }
}

impl<T: Render> View<T> {
    pub fn render(&self, format: OutputFormat) -> String {
        match (self, format) {
            (View::Idle, OutputFormat::Text) => String::new(),
            (View::Idle, OutputFormat::Json) => "null".into(),
            (View::Ready(data), OutputFormat::Text) => data.render_text(),
            (View::Ready(data), OutputFormat::Json) => to_pretty(&data.to_json()),
            (View::Failed(failure), OutputFormat::Text) => failure.message.into(),
            (View::Failed(failure), OutputFormat::Json) => to_pretty(&json!({
                "error": failure.message,
                "reason": failure.reason.to_string(),
            })),
        }
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

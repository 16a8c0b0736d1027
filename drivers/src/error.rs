use crate::sms::CodecError;
use reqwest::StatusCode;
use std::fmt;

/// The driver operation that was being attempted when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Disconnect,
    Status,
    SmsSend,
    SmsRead,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Connect => "connect",
            Action::Disconnect => "disconnect",
            Action::Status => "status",
            Action::SmsSend => "sms send",
            Action::SmsRead => "sms read",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures surfaced by the driver framework.
///
/// Every failure is propagated to the caller unchanged; nothing is retried
/// internally. Duplicate driver registration is not represented here: it is
/// an init-time contract violation and panics instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown modem model {0:?}")]
    UnknownModel(String),

    #[error("modem {model:?} does not support {operation}")]
    Unsupported {
        model: String,
        operation: &'static str,
    },

    #[error("invalid configuration {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{action} failed")]
    Action {
        action: Action,
        #[source]
        source: ActionError,
    },
}

/// Causes of an [`Error::Action`], in the order they can occur during one
/// request: transport, HTTP status, body decode, device verdict.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    #[error("request failed")]
    Transport(#[from] reqwest::Error),

    #[error("response status {0}")]
    Status(StatusCode),

    /// The body did not match the expected schema. The raw bytes are kept
    /// for diagnostics.
    #[error("failed to unmarshal response: {}", String::from_utf8_lossy(.raw))]
    Unmarshal {
        raw: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    /// The device answered with a result other than `success`.
    #[error("device reported {0:?}")]
    Failed(String),

    #[error("unknown link status {0:?}")]
    UnknownLinkStatus(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A single listed message could not be decoded. The id identifies the
    /// offending record so the caller can skip or inspect it on the device.
    #[error("message {id}")]
    Record {
        id: String,
        #[source]
        source: CodecError,
    },
}

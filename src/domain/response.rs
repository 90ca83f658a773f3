use std::fmt;

use crate::domain::value::{MessageSid, RawPhoneNumber};

/// Lifecycle status of a Twilio message resource.
///
/// Statuses this crate does not know about are preserved in [`MessageStatus::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Queued,
    Sending,
    Sent,
    Failed,
    Delivered,
    Undelivered,
    Accepted,
    Scheduled,
    Canceled,
    Unknown(String),
}

impl MessageStatus {
    /// Map a wire value (`"queued"`, `"sent"`, ...) to a status.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "failed" => Self::Failed,
            "delivered" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "accepted" => Self::Accepted,
            "scheduled" => Self::Scheduled,
            "canceled" => Self::Canceled,
            other => Self::Unknown(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Delivered => "delivered",
            Self::Undelivered => "undelivered",
            Self::Accepted => "accepted",
            Self::Scheduled => "scheduled",
            Self::Canceled => "canceled",
            Self::Unknown(other) => other,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message resource returned by `POST /Accounts/{sid}/Messages.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageResource {
    pub sid: MessageSid,
    pub status: MessageStatus,
    pub to: Option<RawPhoneNumber>,
    pub from: Option<RawPhoneNumber>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

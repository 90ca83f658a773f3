use std::error::Error as StdError;
use std::fmt;

use crate::domain::value::{PhoneNumber, RawPhoneNumber};

/// Notification payload. The body may be blank; senders decide whether that is deliverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    body: String,
}

impl Message {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `true` when the body is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Whoever a notification is addressed to.
///
/// Phone numbers are kept as given, blank entries included; channels skip what they cannot use.
/// The email is only carried for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    email: Option<String>,
    phone_numbers: Vec<String>,
}

impl Recipient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipient reachable on exactly one number.
    pub fn single(email: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self::new()
            .with_email(email)
            .with_phone_number(phone_number)
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_numbers.push(phone_number.into());
        self
    }

    pub fn with_phone_numbers<I, S>(mut self, phone_numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phone_numbers
            .extend(phone_numbers.into_iter().map(Into::into));
        self
    }

    /// Add an already-parsed number in its E.164 form.
    pub fn with_parsed_phone_number(self, phone_number: PhoneNumber) -> Self {
        self.with_phone_number(phone_number.e164())
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// All phone numbers in insertion order, as given.
    pub fn phone_numbers(&self) -> &[String] {
        &self.phone_numbers
    }

    /// Non-blank phone numbers in insertion order, trimmed.
    pub fn usable_phone_numbers(&self) -> Vec<RawPhoneNumber> {
        self.phone_numbers
            .iter()
            .filter_map(|number| RawPhoneNumber::new(number.as_str()).ok())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationStatus {
    Success,
    Failure,
}

/// Why delivery to one phone number did not happen.
#[derive(Debug)]
pub struct DeliveryFailure {
    phone_number: RawPhoneNumber,
    error: Box<dyn StdError + Send + Sync>,
}

impl DeliveryFailure {
    pub fn new(phone_number: RawPhoneNumber, error: Box<dyn StdError + Send + Sync>) -> Self {
        Self {
            phone_number,
            error,
        }
    }

    pub fn phone_number(&self) -> &RawPhoneNumber {
        &self.phone_number
    }

    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.phone_number, self.error)
    }
}

impl StdError for DeliveryFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.error.as_ref())
    }
}

/// Outcome of one notification attempt, as reported to the caller.
#[derive(Debug)]
pub enum NotificationResult {
    Success {
        detail: String,
    },
    Failure {
        detail: String,
        cause: Option<DeliveryFailure>,
    },
}

impl NotificationResult {
    pub fn success(detail: impl Into<String>) -> Self {
        Self::Success {
            detail: detail.into(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self::Failure {
            detail: detail.into(),
            cause: None,
        }
    }

    pub fn failure_with_cause(detail: impl Into<String>, cause: DeliveryFailure) -> Self {
        Self::Failure {
            detail: detail.into(),
            cause: Some(cause),
        }
    }

    pub fn status(&self) -> NotificationStatus {
        match self {
            Self::Success { .. } => NotificationStatus::Success,
            Self::Failure { .. } => NotificationStatus::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == NotificationStatus::Success
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Success { detail } | Self::Failure { detail, .. } => detail,
        }
    }

    pub fn cause(&self) -> Option<&DeliveryFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { cause, .. } => cause.as_ref(),
        }
    }
}

impl fmt::Display for NotificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { detail } => write!(f, "SUCCESS: {detail}"),
            Self::Failure { detail, .. } => write!(f, "FAILURE: {detail}"),
        }
    }
}

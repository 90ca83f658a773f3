//! SMS notification channel backed by the Twilio Messages HTTP API.
//!
//! The crate has a domain layer of strong types, a transport layer for wire-format details, a
//! small client layer that talks HTTP, and a notifier that fans a message out to every phone
//! number of a recipient and folds the outcomes into one [`NotificationResult`].
//!
//! Configuration is read once, from `sms_twilio_sid`, `sms_twilio_token` and
//! `sms_twilio_phone`. If any of them is missing the notifier stays disabled for its whole
//! lifetime.
//!
//! ```rust,no_run
//! use sms_notify::{Message, ProviderConfig, Recipient, SmsNotifier};
//!
//! #[tokio::main]
//! async fn main() {
//!     let notifier = SmsNotifier::new(ProviderConfig::from_env());
//!     let recipient = Recipient::new()
//!         .with_email("ops@example.com")
//!         .with_phone_numbers(["+15550001", "+15550002"]);
//!
//!     let result = notifier
//!         .send_notification(&Message::new("disk almost full"), &recipient)
//!         .await;
//!     println!("{result}");
//! }
//! ```
#![forbid(unsafe_code)]

use std::future::Future;
use std::pin::Pin;

pub mod client;
pub mod config;
pub mod domain;
pub mod notifier;
mod transport;

/// Boxed, `Send` future used at the crate's trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub use client::{Credentials, TwilioClient, TwilioClientBuilder, TwilioError};
pub use config::{
    ACCOUNT_SID_VAR, AUTH_TOKEN_VAR, ConfigStatus, Diagnostics, EnvSource, ProcessEnv,
    ProviderConfig, SENDER_PHONE_VAR, TracingDiagnostics,
};
pub use domain::{
    AccountSid, AuthToken, CreateMessage, DeliveryFailure, Message, MessageResource, MessageSid,
    MessageStatus, MessageText, NotificationResult, NotificationStatus, PhoneNumber,
    RawPhoneNumber, Recipient, ValidationError,
};
pub use notifier::{Notification, SmsNotifier, SmsSender};

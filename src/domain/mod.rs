//! Domain layer: strong types with validation and invariants (no I/O).

mod notification;
mod request;
mod response;
mod validation;
mod value;

/// Country used to read phone numbers that carry no country prefix.
pub use phonenumber::country::Id as Region;

pub use notification::{
    DeliveryFailure, Message, NotificationResult, NotificationStatus, Recipient,
};
pub use request::CreateMessage;
pub use response::{MessageResource, MessageStatus};
pub use validation::ValidationError;
pub use value::{AccountSid, AuthToken, MessageSid, MessageText, PhoneNumber, RawPhoneNumber};

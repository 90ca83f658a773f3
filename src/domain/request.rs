use crate::domain::value::{MessageText, RawPhoneNumber};

/// Parameters of a single create-message call.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    to: RawPhoneNumber,
    from: RawPhoneNumber,
    body: MessageText,
}

impl CreateMessage {
    pub fn new(to: RawPhoneNumber, from: RawPhoneNumber, body: MessageText) -> Self {
        Self { to, from, body }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn sender(&self) -> &RawPhoneNumber {
        &self.from
    }

    pub fn body(&self) -> &MessageText {
        &self.body
    }
}

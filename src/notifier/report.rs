use std::error::Error as StdError;

use crate::domain::{DeliveryFailure, NotificationResult, RawPhoneNumber};

/// Per-number outcomes of one notification, in attempt order.
#[derive(Debug, Default)]
pub(crate) struct DeliveryReport {
    sent: Vec<RawPhoneNumber>,
    failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub(crate) fn record(
        mut self,
        phone_number: RawPhoneNumber,
        outcome: Result<(), Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        match outcome {
            Ok(()) => self.sent.push(phone_number),
            Err(error) => self.failed.push(DeliveryFailure::new(phone_number, error)),
        }
        self
    }

    /// Classify: nothing sent is a failure, nothing failed is a success, anything else is a
    /// failure naming both sides and the first error.
    pub(crate) fn into_result(self) -> NotificationResult {
        let sent = list(self.sent.iter());
        let failed = list(self.failed.iter().map(DeliveryFailure::phone_number));
        let first_failure = self.failed.into_iter().next();

        match (self.sent.is_empty(), first_failure) {
            (true, None) => {
                NotificationResult::failure(format!("Could not send an SMS to {failed}"))
            }
            (true, Some(cause)) => NotificationResult::failure_with_cause(
                format!("Could not send an SMS to {failed}"),
                cause,
            ),
            (false, None) => {
                NotificationResult::success(format!("SMS sent successfully to {sent}"))
            }
            (false, Some(cause)) => NotificationResult::failure_with_cause(
                format!(
                    "SMS sent successfully to {sent}, but could not be sent to {failed} - probable cause: {cause}"
                ),
                cause,
            ),
        }
    }
}

fn list<'a>(numbers: impl Iterator<Item = &'a RawPhoneNumber>) -> String {
    let joined = numbers
        .map(RawPhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

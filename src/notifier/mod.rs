//! Notification channels and the SMS implementation.

mod report;

use std::error::Error as StdError;

use crate::BoxFuture;
use crate::client::TwilioClient;
use crate::config::{ConfigStatus, ProviderConfig};
use crate::domain::{Message, MessageResource, NotificationResult, RawPhoneNumber, Recipient};

use report::DeliveryReport;

const MISSING_CONFIGURATION: &str =
    "Can not send an SMS - missing proper configuration, check logs for missing variables";
const MISSING_BODY_OR_PHONE: &str =
    "Can not send an SMS - message body or recipient's phone number is missing";

/// A way of delivering a [`Message`] to a [`Recipient`].
///
/// Implementations report every outcome through [`NotificationResult`]; they do not return
/// errors or panic on delivery problems.
pub trait Notification: Send + Sync {
    fn send_notification<'a>(
        &'a self,
        message: &'a Message,
        recipient: &'a Recipient,
    ) -> BoxFuture<'a, NotificationResult>;
}

/// Provider client able to deliver one SMS.
pub trait SmsSender: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    fn send_sms<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        from: &'a RawPhoneNumber,
        body: &'a str,
    ) -> BoxFuture<'a, Result<MessageResource, Self::Error>>;
}

enum State<S> {
    Enabled { sender: S, from: RawPhoneNumber },
    Disabled,
}

/// SMS notification channel.
///
/// Enabled or disabled once, at construction. A disabled notifier answers every request with
/// a configuration failure and never reaches the provider.
pub struct SmsNotifier<S = TwilioClient> {
    state: State<S>,
}

impl SmsNotifier<TwilioClient> {
    /// Build a Twilio-backed notifier, or a disabled one when configuration is incomplete.
    pub fn new(config: ConfigStatus) -> Self {
        match config {
            ConfigStatus::Ready(config) => Self::with_sender(
                TwilioClient::new(config.credentials()),
                config.sender_phone().clone(),
            ),
            ConfigStatus::Disabled { missing } => {
                tracing::debug!(?missing, "SMS notifications disabled");
                Self::disabled()
            }
        }
    }

    /// Shorthand for [`ProviderConfig::from_env`] followed by [`SmsNotifier::new`].
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }
}

impl<S: SmsSender> SmsNotifier<S> {
    pub fn with_sender(sender: S, from: RawPhoneNumber) -> Self {
        Self {
            state: State::Enabled { sender, from },
        }
    }

    pub fn disabled() -> Self {
        Self {
            state: State::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, State::Enabled { .. })
    }

    /// Send `message` to every non-blank phone number of `recipient`, one after another.
    ///
    /// A failing number does not stop the others. The result is a success only when every
    /// number was accepted by the provider.
    pub async fn send_notification(
        &self,
        message: &Message,
        recipient: &Recipient,
    ) -> NotificationResult {
        let State::Enabled { sender, from } = &self.state else {
            return NotificationResult::failure(MISSING_CONFIGURATION);
        };

        let phone_numbers = recipient.usable_phone_numbers();
        if message.is_blank() || phone_numbers.is_empty() {
            return NotificationResult::failure(MISSING_BODY_OR_PHONE);
        }

        let mut attempts = Vec::with_capacity(phone_numbers.len());
        for phone_number in phone_numbers {
            let outcome = match sender.send_sms(&phone_number, from, message.body()).await {
                Ok(resource) => {
                    tracing::debug!(
                        phone = %phone_number,
                        sid = resource.sid.as_str(),
                        status = %resource.status,
                        "SMS accepted by provider"
                    );
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(phone = %phone_number, error = %err, "failed to send SMS");
                    Err(Box::new(err) as Box<dyn StdError + Send + Sync>)
                }
            };
            attempts.push((phone_number, outcome));
        }

        let result = attempts
            .into_iter()
            .fold(DeliveryReport::default(), |report, (phone_number, outcome)| {
                report.record(phone_number, outcome)
            })
            .into_result();

        if result.is_success() {
            tracing::info!(recipient = ?recipient.email(), "{}", result.detail());
        } else {
            tracing::warn!(recipient = ?recipient.email(), "{}", result.detail());
        }
        result
    }
}

impl<S: SmsSender> Notification for SmsNotifier<S> {
    fn send_notification<'a>(
        &'a self,
        message: &'a Message,
        recipient: &'a Recipient,
    ) -> BoxFuture<'a, NotificationResult> {
        Box::pin(Self::send_notification(self, message, recipient))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::client::TwilioError;
    use crate::domain::{MessageSid, MessageStatus, NotificationStatus};

    use super::*;

    #[derive(Debug, Clone, Default)]
    struct FakeSender {
        failing: Vec<String>,
        calls: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    impl FakeSender {
        fn failing_for(numbers: &[&str]) -> Self {
            Self {
                failing: numbers.iter().map(|n| (*n).to_owned()).collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(String, String, String)> {
            self.calls.lock().unwrap().clone()
        }

        fn called_numbers(&self) -> Vec<String> {
            self.calls().into_iter().map(|(to, _, _)| to).collect()
        }
    }

    impl SmsSender for FakeSender {
        type Error = TwilioError;

        fn send_sms<'a>(
            &'a self,
            to: &'a RawPhoneNumber,
            from: &'a RawPhoneNumber,
            body: &'a str,
        ) -> BoxFuture<'a, Result<MessageResource, TwilioError>> {
            Box::pin(async move {
                self.calls.lock().unwrap().push((
                    to.raw().to_owned(),
                    from.raw().to_owned(),
                    body.to_owned(),
                ));
                if self.failing.iter().any(|n| n == to.raw()) {
                    return Err(TwilioError::Api {
                        status: 400,
                        code: Some(21211),
                        message: format!("The 'To' number {to} is not a valid phone number."),
                        more_info: None,
                    });
                }
                Ok(MessageResource {
                    sid: MessageSid::new("SM1").unwrap(),
                    status: MessageStatus::Queued,
                    to: Some(to.clone()),
                    from: Some(from.clone()),
                    error_code: None,
                    error_message: None,
                })
            })
        }
    }

    fn sender_phone() -> RawPhoneNumber {
        RawPhoneNumber::new("+15559999").unwrap()
    }

    fn notifier(sender: &FakeSender) -> SmsNotifier<FakeSender> {
        SmsNotifier::with_sender(sender.clone(), sender_phone())
    }

    fn recipient(numbers: &[&str]) -> Recipient {
        Recipient::new()
            .with_email("ops@example.com")
            .with_phone_numbers(numbers.iter().copied())
    }

    #[tokio::test]
    async fn sends_to_every_number_in_order_and_succeeds() {
        let sender = FakeSender::default();
        let result = notifier(&sender)
            .send_notification(
                &Message::new("disk almost full"),
                &recipient(&["+15550001", "+15550002"]),
            )
            .await;

        assert_eq!(result.status(), NotificationStatus::Success);
        assert!(result.detail().contains("+15550001"));
        assert!(result.detail().contains("+15550002"));
        assert_eq!(
            sender.calls(),
            vec![
                (
                    "+15550001".to_owned(),
                    "+15559999".to_owned(),
                    "disk almost full".to_owned()
                ),
                (
                    "+15550002".to_owned(),
                    "+15559999".to_owned(),
                    "disk almost full".to_owned()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn all_numbers_failing_is_failure_without_successes() {
        let sender = FakeSender::failing_for(&["+15550001", "+15550002"]);
        let result = notifier(&sender)
            .send_notification(
                &Message::new("disk almost full"),
                &recipient(&["+15550001", "+15550002"]),
            )
            .await;

        assert_eq!(result.status(), NotificationStatus::Failure);
        assert_eq!(
            result.detail(),
            "Could not send an SMS to [+15550001, +15550002]"
        );
        assert!(result.cause().is_some());
    }

    #[tokio::test]
    async fn failure_does_not_stop_remaining_numbers() {
        let sender = FakeSender::failing_for(&["+15550001"]);
        let result = notifier(&sender)
            .send_notification(
                &Message::new("disk almost full"),
                &recipient(&["+15550001", "+15550002"]),
            )
            .await;

        assert_eq!(sender.called_numbers(), vec!["+15550001", "+15550002"]);
        assert_eq!(result.status(), NotificationStatus::Failure);
        assert!(result.detail().starts_with(
            "SMS sent successfully to [+15550002], but could not be sent to [+15550001]"
        ));
        let cause = result.cause().unwrap();
        assert_eq!(cause.phone_number().raw(), "+15550001");
        assert!(cause.error().to_string().contains("not a valid phone number"));
        assert!(result.detail().contains("probable cause: +15550001="));
    }

    #[tokio::test]
    async fn blank_numbers_are_skipped() {
        let sender = FakeSender::default();
        let result = notifier(&sender)
            .send_notification(
                &Message::new("disk almost full"),
                &recipient(&["  ", "+15550001", ""]),
            )
            .await;

        assert!(result.is_success());
        assert_eq!(result.detail(), "SMS sent successfully to [+15550001]");
        assert_eq!(sender.called_numbers(), vec!["+15550001"]);
    }

    #[tokio::test]
    async fn recipient_without_usable_numbers_never_reaches_provider() {
        for numbers in [&[][..], &["", "   "][..]] {
            let sender = FakeSender::default();
            let result = notifier(&sender)
                .send_notification(&Message::new("disk almost full"), &recipient(numbers))
                .await;

            assert_eq!(result.status(), NotificationStatus::Failure);
            assert_eq!(result.detail(), MISSING_BODY_OR_PHONE);
            assert!(sender.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn blank_body_is_failure_regardless_of_recipient() {
        for body in ["", "   ", "\n\t"] {
            let sender = FakeSender::default();
            let result = notifier(&sender)
                .send_notification(&Message::new(body), &recipient(&["+15550001"]))
                .await;

            assert_eq!(result.detail(), MISSING_BODY_OR_PHONE);
            assert!(!result.is_success());
            assert!(sender.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn single_number_recipient_reports_the_number() {
        let sender = FakeSender::default();
        let result = notifier(&sender)
            .send_notification(
                &Message::new("deploy finished"),
                &Recipient::single("ops@example.com", "+15550001"),
            )
            .await;

        assert!(result.is_success());
        assert_eq!(result.detail(), "SMS sent successfully to [+15550001]");
        assert!(!result.detail().contains("ops@example.com"));
    }

    #[tokio::test]
    async fn single_number_recipient_failing_reports_the_number() {
        let sender = FakeSender::failing_for(&["+15550001"]);
        let result = notifier(&sender)
            .send_notification(
                &Message::new("deploy finished"),
                &Recipient::single("ops@example.com", "+15550001"),
            )
            .await;

        assert_eq!(result.status(), NotificationStatus::Failure);
        assert_eq!(result.detail(), "Could not send an SMS to [+15550001]");
        assert_eq!(result.cause().unwrap().phone_number().raw(), "+15550001");
        assert_eq!(sender.called_numbers(), vec!["+15550001"]);
    }

    #[tokio::test]
    async fn mixed_list_with_blanks_and_duplicates_reports_each_attempt() {
        let sender = FakeSender::failing_for(&["+15550001", "+15550031"]);
        let result = notifier(&sender)
            .send_notification(
                &Message::new("deploy finished"),
                &recipient(&[" +15550002 ", "+15550001", "", "+15550002", "+15550031"]),
            )
            .await;

        assert_eq!(
            sender.called_numbers(),
            vec!["+15550002", "+15550001", "+15550002", "+15550031"]
        );
        assert_eq!(result.status(), NotificationStatus::Failure);
        assert!(result.detail().starts_with(
            "SMS sent successfully to [+15550002, +15550002], \
             but could not be sent to [+15550001, +15550031] - probable cause: +15550001="
        ));
    }

    #[tokio::test]
    async fn disabled_notifier_fails_the_same_way_every_time() {
        let notifier = SmsNotifier::<FakeSender>::disabled();
        assert!(!notifier.is_enabled());

        let message = Message::new("disk almost full");
        let recipient = recipient(&["+15550001"]);
        let first = notifier.send_notification(&message, &recipient).await;
        let second = notifier.send_notification(&message, &recipient).await;

        assert_eq!(first.status(), NotificationStatus::Failure);
        assert_eq!(first.detail(), MISSING_CONFIGURATION);
        assert_eq!(second.status(), first.status());
        assert_eq!(second.detail(), first.detail());
        assert!(first.cause().is_none());
    }

    #[tokio::test]
    async fn disabled_check_comes_before_validation() {
        let notifier = SmsNotifier::<FakeSender>::disabled();
        let result = notifier
            .send_notification(&Message::new(""), &Recipient::new())
            .await;
        assert_eq!(result.detail(), MISSING_CONFIGURATION);
    }

    #[tokio::test]
    async fn notifier_built_from_disabled_config_is_disabled() {
        let notifier = SmsNotifier::new(ConfigStatus::Disabled {
            missing: vec![crate::config::AUTH_TOKEN_VAR],
        });
        assert!(!notifier.is_enabled());

        let result = notifier
            .send_notification(&Message::new("hi"), &recipient(&["+15550001"]))
            .await;
        assert_eq!(result.detail(), MISSING_CONFIGURATION);
    }

    #[test]
    fn notifier_built_from_ready_config_is_enabled() {
        let config = ProviderConfig::new("AC123", "token", "+15559999").unwrap();
        let notifier = SmsNotifier::new(ConfigStatus::Ready(config));
        assert!(notifier.is_enabled());
    }

    #[tokio::test]
    async fn works_as_a_trait_object() {
        let sender = FakeSender::default();
        let channels: Vec<Arc<dyn Notification>> = vec![Arc::new(notifier(&sender))];

        for channel in &channels {
            let result = channel
                .send_notification(&Message::new("hello"), &recipient(&["+15550001"]))
                .await;
            assert!(result.is_success());
        }
        assert_eq!(sender.called_numbers(), vec!["+15550001"]);
    }
}

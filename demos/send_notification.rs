use sms_notify::domain::Region;
use sms_notify::{Message, PhoneNumber, Recipient, SmsNotifier};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Comma separated, e.g. "+15550001,+15550002".
    let phones = std::env::var("SMS_DEMO_PHONES").unwrap_or_default();
    let body = std::env::var("SMS_DEMO_MESSAGE")
        .unwrap_or_else(|_| "Hello from the sms-notify demo.".to_owned());

    let mut recipient = Recipient::new().with_email("demo@example.com");
    for phone in phones.split(',').filter(|phone| !phone.trim().is_empty()) {
        // Numbers without a country prefix are read as US numbers.
        let parsed = PhoneNumber::parse(Some(Region::US), phone)?;
        recipient = recipient.with_parsed_phone_number(parsed);
    }

    let notifier = SmsNotifier::from_env();
    let result = notifier
        .send_notification(&Message::new(body), &recipient)
        .await;

    tracing::info!(status = ?result.status(), "{}", result.detail());
    if let Some(cause) = result.cause() {
        tracing::warn!(error = %cause.error(), phone = %cause.phone_number(), "first failure");
    }

    Ok(())
}

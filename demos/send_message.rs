use std::io;
use std::time::Duration;

use sms_notify::{CreateMessage, Credentials, MessageText, RawPhoneNumber, TwilioClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let required = |key: &str| {
        std::env::var(key).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{key} environment variable is required"),
            )
        })
    };

    let credentials = Credentials::new(
        required(sms_notify::ACCOUNT_SID_VAR)?,
        required(sms_notify::AUTH_TOKEN_VAR)?,
    )?;
    let from = RawPhoneNumber::new(required(sms_notify::SENDER_PHONE_VAR)?)?;
    let to = RawPhoneNumber::new(required("SMS_DEMO_PHONE")?)?;
    let text = MessageText::new(
        std::env::var("SMS_DEMO_MESSAGE")
            .unwrap_or_else(|_| "Hello from the sms-notify demo.".to_owned()),
    )?;

    let client = TwilioClient::builder(credentials)
        .timeout(Duration::from_secs(10))
        .user_agent("sms-notify-demo")
        .build()?;

    let message = client
        .send_message(CreateMessage::new(to, from, text))
        .await?;
    println!(
        "sid: {}, status: {}, error_code: {:?}",
        message.sid.as_str(),
        message.status,
        message.error_code
    );

    Ok(())
}

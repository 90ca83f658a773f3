//! Provider configuration, read once from the environment.
//!
//! Loading never fails: missing values are reported through [`Diagnostics`] and yield
//! [`ConfigStatus::Disabled`], which an [`crate::SmsNotifier`] turns into a channel that
//! refuses every send.

use crate::client::Credentials;
use crate::domain::{AccountSid, AuthToken, RawPhoneNumber, ValidationError};

/// Twilio account SID.
pub const ACCOUNT_SID_VAR: &str = "sms_twilio_sid";
/// Twilio auth token.
pub const AUTH_TOKEN_VAR: &str = "sms_twilio_token";
/// Sender phone number issued by Twilio.
pub const SENDER_PHONE_VAR: &str = "sms_twilio_phone";

/// Where configuration values come from.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Receives configuration problems found while loading.
pub trait Diagnostics: Send + Sync {
    fn missing_variable(&self, key: &str);
}

/// Reports configuration problems as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn missing_variable(&self, key: &str) {
        tracing::warn!(
            variable = key,
            "${{{key}}} environment variable must be set to use SMS notifications"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything needed to talk to Twilio. Immutable once built.
pub struct ProviderConfig {
    account_sid: AccountSid,
    auth_token: AuthToken,
    sender_phone: RawPhoneNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of loading [`ProviderConfig`].
pub enum ConfigStatus {
    Ready(ProviderConfig),
    /// At least one variable was missing or blank; all of them are listed.
    Disabled { missing: Vec<&'static str> },
}

impl ProviderConfig {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        sender_phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
            sender_phone: RawPhoneNumber::new(sender_phone)?,
        })
    }

    /// Load from the process environment, warning through `tracing`.
    pub fn from_env() -> ConfigStatus {
        Self::load(&ProcessEnv, &TracingDiagnostics)
    }

    /// Load from `env`. Every missing or blank variable is reported to `diagnostics`.
    pub fn load(env: &impl EnvSource, diagnostics: &dyn Diagnostics) -> ConfigStatus {
        let mut missing = Vec::new();
        let mut report = |key: &'static str| {
            diagnostics.missing_variable(key);
            missing.push(key);
        };

        let account_sid = read(env, ACCOUNT_SID_VAR, AccountSid::new).or_else(|| {
            report(ACCOUNT_SID_VAR);
            None
        });
        let auth_token = read(env, AUTH_TOKEN_VAR, AuthToken::new).or_else(|| {
            report(AUTH_TOKEN_VAR);
            None
        });
        let sender_phone = read(env, SENDER_PHONE_VAR, RawPhoneNumber::new).or_else(|| {
            report(SENDER_PHONE_VAR);
            None
        });

        match (account_sid, auth_token, sender_phone) {
            (Some(account_sid), Some(auth_token), Some(sender_phone)) => {
                ConfigStatus::Ready(Self {
                    account_sid,
                    auth_token,
                    sender_phone,
                })
            }
            _ => ConfigStatus::Disabled { missing },
        }
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }

    pub fn sender_phone(&self) -> &RawPhoneNumber {
        &self.sender_phone
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::from_parts(self.account_sid.clone(), self.auth_token.clone())
    }
}

/// `None` when `key` is unset or its value is rejected by `parse` (blank).
fn read<T>(
    env: &impl EnvSource,
    key: &str,
    parse: fn(String) -> Result<T, ValidationError>,
) -> Option<T> {
    env.var(key).and_then(|value| parse(value).ok())
}

impl ConfigStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

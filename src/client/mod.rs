//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::BoxFuture;
use crate::domain::{
    AccountSid, AuthToken, CreateMessage, MessageResource, MessageText, RawPhoneNumber,
    ValidationError,
};
use crate::notifier::SmsSender;

const DEFAULT_API_BASE: &str = "https://api.twilio.com/2010-04-01/";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        credentials: &'a Credentials,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        credentials: &'a Credentials,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .basic_auth(
                    credentials.account_sid.as_str(),
                    Some(credentials.auth_token.as_str()),
                )
                .form(&params)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account credentials for Twilio API calls (HTTP basic auth).
pub struct Credentials {
    account_sid: AccountSid,
    auth_token: AuthToken,
}

impl Credentials {
    /// Validate both parts and build credentials.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            auth_token: AuthToken::new(auth_token)?,
        })
    }

    pub fn from_parts(account_sid: AccountSid, auth_token: AuthToken) -> Self {
        Self {
            account_sid,
            auth_token,
        }
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (a Twilio error body),
/// - validation/parse failures.
pub enum TwilioError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a Twilio error body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Twilio rejected the request and explained why.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
        more_info: Option<String>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured API base URL cannot be used to build request URLs.
    #[error("invalid API base URL: {endpoint}")]
    InvalidEndpoint { endpoint: String },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`TwilioClient`].
///
/// Use this when you need to customize the API base URL, timeout, or user-agent.
pub struct TwilioClientBuilder {
    credentials: Credentials,
    api_base: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TwilioClientBuilder {
    /// Create a builder with the default API base and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the versioned API base (`https://api.twilio.com/2010-04-01/`).
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TwilioClient`].
    pub fn build(self) -> Result<TwilioClient, TwilioError> {
        messages_url(&self.api_base, &self.credentials.account_sid)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TwilioError::Transport(Box::new(err)))?;

        Ok(TwilioClient {
            credentials: self.credentials,
            api_base: self.api_base,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Minimal Twilio Programmable Messaging client.
///
/// Creates one message per call via `POST {api_base}Accounts/{sid}/Messages.json`.
pub struct TwilioClient {
    credentials: Credentials,
    api_base: String,
    http: Arc<dyn HttpTransport>,
}

impl TwilioClient {
    /// Create a client using the default API base.
    ///
    /// For more customization, use [`TwilioClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: DEFAULT_API_BASE.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> TwilioClientBuilder {
        TwilioClientBuilder::new(credentials)
    }

    /// Create (send) one SMS.
    ///
    /// Errors:
    /// - [`TwilioError::Api`] when Twilio answers non-2xx with its JSON error body,
    /// - [`TwilioError::HttpStatus`] for any other non-2xx response,
    /// - [`TwilioError::Parse`] when a 2xx body is not a message resource.
    pub async fn send_message(
        &self,
        request: CreateMessage,
    ) -> Result<MessageResource, TwilioError> {
        let url = messages_url(&self.api_base, &self.credentials.account_sid)?;
        let params = crate::transport::encode_create_message_form(&request);

        let response = self
            .http
            .post_form(url.as_str(), &self.credentials, params)
            .await
            .map_err(TwilioError::Transport)?;

        if !(200..=299).contains(&response.status) {
            if let Some(api) = crate::transport::decode_api_error(&response.body) {
                return Err(TwilioError::Api {
                    status: response.status,
                    code: api.code,
                    message: api.message,
                    more_info: api.more_info,
                });
            }
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(TwilioError::HttpStatus {
                status: response.status,
                body,
            });
        }

        crate::transport::decode_message_json_response(&response.body)
            .map_err(|err| TwilioError::Parse(Box::new(err)))
    }
}

impl SmsSender for TwilioClient {
    type Error = TwilioError;

    fn send_sms<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        from: &'a RawPhoneNumber,
        body: &'a str,
    ) -> BoxFuture<'a, Result<MessageResource, TwilioError>> {
        Box::pin(async move {
            let body = MessageText::new(body)?;
            self.send_message(CreateMessage::new(to.clone(), from.clone(), body))
                .await
        })
    }
}

fn messages_url(api_base: &str, account_sid: &AccountSid) -> Result<Url, TwilioError> {
    let invalid = || TwilioError::InvalidEndpoint {
        endpoint: api_base.to_owned(),
    };
    let mut url = Url::parse(api_base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .pop_if_empty()
        .extend(["Accounts", account_sid.as_str(), "Messages.json"]);
    Ok(url)
}

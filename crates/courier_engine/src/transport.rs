use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::markup::InlineKeyboard;
use crate::types::{ApiError, BotIdentity, ChatMemberStatus, CopyOutcome, MessageMeta};

/// Production host of the Bot API.
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Floor applied when a rate-limit response carries no usable hint.
const MIN_RETRY_AFTER_SECS: u64 = 1;

/// The three platform operations the engine consumes, plus best-effort
/// message metadata. Implementations issue exactly one remote request per
/// call; retry policy belongs to the run loop.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_me(&self) -> Result<BotIdentity, ApiError>;

    async fn chat_member_status(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<ChatMemberStatus, ApiError>;

    async fn copy_one(
        &self,
        dest_channel: i64,
        source_channel: i64,
        message_id: i64,
        caption: Option<&str>,
        reply_markup: Option<&InlineKeyboard>,
    ) -> CopyOutcome;

    /// Best-effort lookup of message metadata. The platform offers no
    /// fetch-by-id for a bot identity, so the default is `None`; caption
    /// rules and filters are inert for such messages.
    async fn message_meta(&self, _chat_id: i64, _message_id: i64) -> Option<MessageMeta> {
        None
    }
}

/// Bot API client over HTTPS. Field names on the wire are byte-exact to the
/// platform convention.
#[derive(Debug, Clone)]
pub struct TelegramBotApi {
    client: reqwest::Client,
    base_url: Url,
    token: String,
    parse_mode: Option<String>,
}

impl TelegramBotApi {
    pub fn new(token: impl Into<String>) -> Self {
        // The default host is a compile-time constant and always parses.
        let base_url = Url::parse(DEFAULT_BASE_URL).expect("default base url");
        Self::with_base_url(token, base_url)
    }

    /// Points the client at a different host (used by tests against a mock
    /// server).
    pub fn with_base_url(token: impl Into<String>, base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.into(),
            parse_mode: None,
        }
    }

    /// Parse mode sent alongside an override caption.
    pub fn with_parse_mode(mut self, parse_mode: impl Into<String>) -> Self {
        self.parse_mode = Some(parse_mode.into());
        self
    }

    fn endpoint(&self, method: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/bot{}/{}", self.token, method));
        url
    }
}

#[async_trait]
impl BotApi for TelegramBotApi {
    async fn get_me(&self) -> Result<BotIdentity, ApiError> {
        let envelope: ApiEnvelope<UserPayload> = self
            .client
            .get(self.endpoint("getMe"))
            .send()
            .await
            .map_err(to_network_error)?
            .json()
            .await
            .map_err(to_network_error)?;

        match envelope.result {
            Some(user) if envelope.ok => Ok(BotIdentity {
                id: user.id,
                first_name: user.first_name,
                username: user.username,
            }),
            _ => Err(envelope.into_api_error()),
        }
    }

    async fn chat_member_status(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<ChatMemberStatus, ApiError> {
        let envelope: ApiEnvelope<ChatMemberPayload> = self
            .client
            .get(self.endpoint("getChatMember"))
            .query(&[
                ("chat_id", chat_id.to_string()),
                ("user_id", user_id.to_string()),
            ])
            .send()
            .await
            .map_err(to_network_error)?
            .json()
            .await
            .map_err(to_network_error)?;

        match envelope.result {
            Some(member) if envelope.ok => Ok(ChatMemberStatus::from_wire(&member.status)),
            _ => Err(envelope.into_api_error()),
        }
    }

    async fn copy_one(
        &self,
        dest_channel: i64,
        source_channel: i64,
        message_id: i64,
        caption: Option<&str>,
        reply_markup: Option<&InlineKeyboard>,
    ) -> CopyOutcome {
        let mut body = json!({
            "chat_id": dest_channel,
            "from_chat_id": source_channel,
            "message_id": message_id,
        });
        if let Some(caption) = caption {
            body["caption"] = json!(caption);
            if let Some(mode) = &self.parse_mode {
                body["parse_mode"] = json!(mode);
            }
        }
        if let Some(markup) = reply_markup {
            if let Ok(value) = serde_json::to_value(markup) {
                body["reply_markup"] = value;
            }
        }

        let response = match self
            .client
            .post(self.endpoint("copyMessage"))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return CopyOutcome::NetworkError {
                    description: err.to_string(),
                }
            }
        };

        match response.json::<ApiEnvelope<MessageIdPayload>>().await {
            Ok(envelope) => classify_copy_response(envelope),
            Err(err) => CopyOutcome::NetworkError {
                description: format!("malformed response: {err}"),
            },
        }
    }
}

/// Convenience for the channel-registration flow: does the bot hold admin
/// rights in the channel?
pub async fn is_channel_admin(
    api: &dyn BotApi,
    chat_id: i64,
    user_id: i64,
) -> Result<bool, ApiError> {
    Ok(api.chat_member_status(chat_id, user_id).await?.is_admin())
}

fn classify_copy_response(envelope: ApiEnvelope<MessageIdPayload>) -> CopyOutcome {
    if envelope.ok {
        return match envelope.result {
            Some(result) => CopyOutcome::Success {
                new_message_id: result.message_id,
            },
            None => CopyOutcome::NetworkError {
                description: "ok response without a result".to_string(),
            },
        };
    }

    let description = envelope
        .description
        .unwrap_or_else(|| "unknown error".to_string());

    if envelope.error_code == Some(429) {
        let retry_after_secs = envelope
            .parameters
            .and_then(|p| p.retry_after)
            .unwrap_or(0)
            .max(MIN_RETRY_AFTER_SECS);
        return CopyOutcome::RateLimited { retry_after_secs };
    }

    if is_skippable(envelope.error_code, &description) {
        return CopyOutcome::Skippable {
            reason: description,
        };
    }

    CopyOutcome::RealError { description }
}

/// A missing or empty source message is an expected condition, as is any
/// Bad Request the platform raises for content it refuses to copy.
fn is_skippable(code: Option<i64>, description: &str) -> bool {
    let lower = description.to_ascii_lowercase();
    lower.contains("message to copy not found")
        || lower.contains("message is empty")
        || code == Some(400)
}

fn to_network_error(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

impl<T> ApiEnvelope<T> {
    fn into_api_error(self) -> ApiError {
        ApiError::Api {
            code: self.error_code,
            description: self
                .description
                .unwrap_or_else(|| "malformed response".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: i64,
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMemberPayload {
    status: String,
}

#[derive(Debug, Deserialize)]
struct MessageIdPayload {
    message_id: i64,
}

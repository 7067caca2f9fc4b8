use std::time::Duration;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::repository::{ChatPort, MembershipPort};
use crate::domain::types::{InlineButton, InlineKeyboard, MembershipStatus};
use crate::error::BotServiceError;

/// Fixed timeout for every Telegram Bot API call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// ── Telegram Bot API wire types ───────────────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChatMemberInfo {
    status: String,
    #[serde(default)]
    is_member: Option<bool>,
}

#[derive(Deserialize)]
struct SentMessage {
    #[allow(dead_code)]
    message_id: i64,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyMarkup>,
}

#[derive(Serialize)]
struct ReplyMarkup {
    inline_keyboard: Vec<Vec<WireButton>>,
}

#[derive(Serialize)]
struct WireButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

impl From<&InlineKeyboard> for ReplyMarkup {
    fn from(keyboard: &InlineKeyboard) -> Self {
        let inline_keyboard = keyboard
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match button {
                        InlineButton::Url { text, url } => WireButton {
                            text: text.clone(),
                            url: Some(url.clone()),
                            callback_data: None,
                        },
                        InlineButton::Callback { text, data } => WireButton {
                            text: text.clone(),
                            url: None,
                            callback_data: Some(data.clone()),
                        },
                    })
                    .collect()
            })
            .collect();
        Self { inline_keyboard }
    }
}

#[derive(Serialize)]
struct AnswerCallbackBody<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct GetChatMemberBody<'a> {
    chat_id: &'a str,
    user_id: i64,
}

#[derive(Serialize)]
struct SetWebhookBody<'a> {
    url: &'a str,
    drop_pending_updates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
}

fn status_from_wire(info: &ChatMemberInfo) -> MembershipStatus {
    match info.status.as_str() {
        "creator" => MembershipStatus::Creator,
        "administrator" => MembershipStatus::Administrator,
        "member" => MembershipStatus::Member,
        "restricted" => MembershipStatus::Restricted {
            is_member: info.is_member.unwrap_or(false),
        },
        "left" => MembershipStatus::Left,
        "kicked" => MembershipStatus::Kicked,
        _ => MembershipStatus::Unknown,
    }
}

// ── API client ────────────────────────────────────────────────────────────────

/// Thin Telegram Bot API client over the designated channel.
#[derive(Clone)]
pub struct TelegramApi {
    http: reqwest::Client,
    base_url: String,
    channel: String,
}

impl TelegramApi {
    pub fn new(bot_token: &str, channel: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("create HTTP client"),
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
            channel: channel.to_owned(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, BotServiceError> {
        let url = format!("{}/{method}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BotServiceError::Telegram(anyhow!("{method}: {e}")))?;
        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotServiceError::Telegram(anyhow!("{method}: {e}")))?;

        if parsed.ok {
            parsed
                .result
                .ok_or_else(|| BotServiceError::Telegram(anyhow!("{method}: ok without result")))
        } else {
            let description = parsed
                .description
                .unwrap_or_else(|| "unknown error".to_owned());
            Err(BotServiceError::Telegram(anyhow!("{method}: {description}")))
        }
    }

    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<(), BotServiceError> {
        let body = SetWebhookBody {
            url,
            drop_pending_updates: true,
            secret_token,
        };
        let _: bool = self.call("setWebhook", &body).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<(), BotServiceError> {
        let _: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }
}

impl MembershipPort for TelegramApi {
    async fn status_of(&self, user_id: i64) -> Result<MembershipStatus, BotServiceError> {
        let info: ChatMemberInfo = self
            .call(
                "getChatMember",
                &GetChatMemberBody {
                    chat_id: &self.channel,
                    user_id,
                },
            )
            .await?;
        Ok(status_from_wire(&info))
    }
}

impl ChatPort for TelegramApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), BotServiceError> {
        let body = SendMessageBody {
            chat_id,
            text,
            parse_mode: "HTML",
            reply_markup: keyboard.map(ReplyMarkup::from),
        };
        let _: SentMessage = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotServiceError> {
        let body = AnswerCallbackBody {
            callback_query_id: callback_id,
            text,
        };
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }
}

use crate::domain::repository::{ChatPort, CodeLedger, IssuanceJournal, MembershipPort};
use crate::domain::types::{
    CHECKING_TEXT, InlineKeyboard, JOIN_PROMPT_TEXT, PromptConfig, RETRY_TEXT, reward_text,
};
use crate::error::BotServiceError;
use crate::usecase::verify::{VerifyInput, VerifyOutcome, VerifyUseCase};

/// One classified inbound webhook event.
///
/// The per-user state machine (`AwaitingStart → Prompted → Verified`) is
/// degenerate: every message re-prompts, and "Verified" is inferred from
/// ledger presence rather than stored anywhere.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Any message, `/start` included — both get the join prompt.
    Message { chat_id: i64 },
    VerifyPressed {
        callback_id: String,
        chat_id: i64,
        user_id: i64,
        username: Option<String>,
    },
    /// Well-formed payload this bot has no reaction to.
    Unrecognized,
}

/// Routes one inbound event to "send join prompt" or "verify".
///
/// Outbound send failures are logged and dropped — the user can always press
/// the button again, and the webhook must still answer 200.
pub struct DispatchUpdateUseCase<C, M, L, J>
where
    C: ChatPort,
    M: MembershipPort,
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub chat: C,
    pub verify: VerifyUseCase<M, L, J>,
    pub prompt: PromptConfig,
}

impl<C, M, L, J> DispatchUpdateUseCase<C, M, L, J>
where
    C: ChatPort,
    M: MembershipPort,
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub async fn execute(&self, event: InboundEvent) -> Result<(), BotServiceError> {
        match event {
            InboundEvent::Message { chat_id } => {
                self.send_join_prompt(chat_id).await;
                Ok(())
            }
            InboundEvent::VerifyPressed {
                callback_id,
                chat_id,
                user_id,
                username,
            } => {
                if let Err(e) = self
                    .chat
                    .answer_callback(&callback_id, Some(CHECKING_TEXT))
                    .await
                {
                    tracing::warn!(error = %e, "answerCallbackQuery failed");
                }

                let outcome = self
                    .verify
                    .execute(VerifyInput { user_id, username })
                    .await?;

                match outcome {
                    VerifyOutcome::Verified(issued) => {
                        tracing::info!(
                            user_id,
                            newly_issued = issued.newly_issued,
                            "verification succeeded"
                        );
                        self.send(
                            chat_id,
                            &reward_text(&issued.code),
                            Some(&self.prompt.reward_keyboard()),
                        )
                        .await;
                    }
                    VerifyOutcome::NotMember => {
                        self.send(chat_id, RETRY_TEXT, None).await;
                        self.send_join_prompt(chat_id).await;
                    }
                }
                Ok(())
            }
            InboundEvent::Unrecognized => Ok(()),
        }
    }

    async fn send_join_prompt(&self, chat_id: i64) {
        self.send(chat_id, JOIN_PROMPT_TEXT, Some(&self.prompt.join_keyboard()))
            .await;
    }

    async fn send(&self, chat_id: i64, text: &str, keyboard: Option<&InlineKeyboard>) {
        if let Err(e) = self.chat.send_message(chat_id, text, keyboard).await {
            tracing::warn!(error = %e, chat_id, "sendMessage failed");
        }
    }
}

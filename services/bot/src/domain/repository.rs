#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use crate::domain::types::{CodeRecord, InlineKeyboard, LedgerWrite, MembershipStatus};
use crate::error::BotServiceError;

/// Ledger of issued reward codes, one record per user, ever.
pub trait CodeLedger: Send + Sync {
    async fn find(&self, user_id: i64) -> Result<Option<CodeRecord>, BotServiceError>;

    /// Insert unless a record for the user already exists. The record that
    /// ended up stored is returned — on a race the existing one wins.
    async fn insert_if_absent(&self, record: CodeRecord) -> Result<LedgerWrite, BotServiceError>;
}

/// Port for membership lookups against the designated channel.
pub trait MembershipPort: Send + Sync {
    async fn status_of(&self, user_id: i64) -> Result<MembershipStatus, BotServiceError>;
}

/// Port for outbound chat messages.
pub trait ChatPort: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), BotServiceError>;

    /// Acknowledge a pressed inline button, optionally with a toast text.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotServiceError>;
}

/// One human-readable line per issuance.
#[derive(Debug, Clone)]
pub struct IssuanceEntry {
    pub issued_at: DateTime<Utc>,
    /// `@username`, first name, or the numeric user id as a fallback.
    pub label: String,
    pub code: String,
}

/// Append-only journal of issuances (local file, optionally mirrored).
pub trait IssuanceJournal: Send + Sync {
    async fn record(&self, entry: &IssuanceEntry) -> Result<(), BotServiceError>;
}

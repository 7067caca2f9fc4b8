use std::sync::{Arc, Mutex};

use gatekeeper_bot::domain::repository::{
    ChatPort, CodeLedger, IssuanceEntry, IssuanceJournal, MembershipPort,
};
use gatekeeper_bot::domain::types::{
    CodeRecord, InlineKeyboard, LedgerWrite, MembershipPolicy, MembershipStatus, PromptConfig,
};
use gatekeeper_bot::error::BotServiceError;
use gatekeeper_bot::infra::journal::FileIssuanceJournal;
use gatekeeper_bot::infra::store::FileCodeLedger;
use gatekeeper_bot::infra::telegram::TelegramApi;
use gatekeeper_bot::state::AppState;

// ── MockLedger ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockLedger {
    pub records: Arc<Mutex<Vec<CodeRecord>>>,
}

impl MockLedger {
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn with(records: Vec<CodeRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Shared handle to the record list for post-execution inspection.
    pub fn records_handle(&self) -> Arc<Mutex<Vec<CodeRecord>>> {
        Arc::clone(&self.records)
    }
}

impl CodeLedger for MockLedger {
    async fn find(&self, user_id: i64) -> Result<Option<CodeRecord>, BotServiceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id)
            .cloned())
    }

    async fn insert_if_absent(&self, record: CodeRecord) -> Result<LedgerWrite, BotServiceError> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter().find(|r| r.user_id == record.user_id) {
            return Ok(LedgerWrite {
                record: existing.clone(),
                newly_issued: false,
            });
        }
        records.push(record.clone());
        Ok(LedgerWrite {
            record,
            newly_issued: true,
        })
    }
}

// ── MockMembership ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum MockMembership {
    Status(MembershipStatus),
    Failing,
}

impl MembershipPort for MockMembership {
    async fn status_of(&self, _user_id: i64) -> Result<MembershipStatus, BotServiceError> {
        match self {
            Self::Status(status) => Ok(*status),
            Self::Failing => Err(BotServiceError::Telegram(anyhow::anyhow!(
                "getChatMember: connection refused"
            ))),
        }
    }
}

// ── MockChat ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

#[derive(Debug, Clone)]
pub struct AnsweredCallback {
    pub callback_id: String,
    pub text: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockChat {
    pub sent: Arc<Mutex<Vec<SentMessage>>>,
    pub answered: Arc<Mutex<Vec<AnsweredCallback>>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<SentMessage>>> {
        Arc::clone(&self.sent)
    }

    pub fn answered_handle(&self) -> Arc<Mutex<Vec<AnsweredCallback>>> {
        Arc::clone(&self.answered)
    }
}

impl ChatPort for MockChat {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), BotServiceError> {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_owned(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), BotServiceError> {
        self.answered.lock().unwrap().push(AnsweredCallback {
            callback_id: callback_id.to_owned(),
            text: text.map(ToOwned::to_owned),
        });
        Ok(())
    }
}

// ── Journals ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockJournal {
    pub entries: Arc<Mutex<Vec<IssuanceEntry>>>,
}

impl MockJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries_handle(&self) -> Arc<Mutex<Vec<IssuanceEntry>>> {
        Arc::clone(&self.entries)
    }
}

impl IssuanceJournal for MockJournal {
    async fn record(&self, entry: &IssuanceEntry) -> Result<(), BotServiceError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Journal whose every write fails — issuance must survive it.
#[derive(Clone)]
pub struct FailingJournal;

impl IssuanceJournal for FailingJournal {
    async fn record(&self, _entry: &IssuanceEntry) -> Result<(), BotServiceError> {
        Err(BotServiceError::Internal(anyhow::anyhow!("disk full")))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_record(user_id: i64, code: &str) -> CodeRecord {
    CodeRecord {
        user_id,
        code: code.to_owned(),
        username: Some("@alice".to_owned()),
    }
}

pub fn test_prompt() -> PromptConfig {
    PromptConfig {
        channel_link: "https://t.me/testchannel".to_owned(),
        reward_link: "https://reward.example".to_owned(),
    }
}

/// App state over a throwaway ledger file and a Telegram client that is
/// never reached by the paths under test.
pub fn test_state(webhook_secret: Option<&str>, webhook_url: Option<&str>) -> AppState {
    let ledger_path =
        std::env::temp_dir().join(format!("gatekeeper-http-{}.json", uuid::Uuid::new_v4()));
    let journal_path =
        std::env::temp_dir().join(format!("gatekeeper-http-{}.txt", uuid::Uuid::new_v4()));
    AppState {
        ledger: FileCodeLedger::load(ledger_path),
        telegram: TelegramApi::new("000000:TEST-TOKEN", "@testchannel"),
        journal: FileIssuanceJournal::new(journal_path, None),
        policy: MembershipPolicy::default(),
        prompt: test_prompt(),
        webhook_url: webhook_url.map(ToOwned::to_owned),
        webhook_secret: webhook_secret.map(ToOwned::to_owned),
    }
}

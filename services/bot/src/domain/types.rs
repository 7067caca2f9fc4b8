/// One issued reward code, keyed by Telegram user id.
///
/// At most one record ever exists per user; once written its `code` never
/// changes. The ledger file is the durable form of a set of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRecord {
    pub user_id: i64,
    pub code: String,
    /// Display label captured at issuance time (`@username` or first name).
    pub username: Option<String>,
}

/// Result of a ledger write: the record that ended up stored, and whether
/// this call created it. On a lost race the existing record wins and
/// `newly_issued` is false.
#[derive(Debug, Clone)]
pub struct LedgerWrite {
    pub record: CodeRecord,
    pub newly_issued: bool,
}

/// Membership status of a user in the designated channel, as reported by
/// Telegram `getChatMember`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Creator,
    Administrator,
    Member,
    /// Restricted members are still in the channel when `is_member` is set.
    Restricted { is_member: bool },
    Left,
    Kicked,
    /// Any status string this service does not know about.
    Unknown,
}

/// Policy for mapping a [`MembershipStatus`] to a verified/not-verified
/// decision. Whether `restricted` counts is deployment configuration, not a
/// hardcoded choice.
#[derive(Debug, Clone, Copy)]
pub struct MembershipPolicy {
    pub restricted_is_member: bool,
}

impl MembershipPolicy {
    pub fn verified(&self, status: MembershipStatus) -> bool {
        match status {
            MembershipStatus::Creator
            | MembershipStatus::Administrator
            | MembershipStatus::Member => true,
            MembershipStatus::Restricted { is_member } => {
                self.restricted_is_member && is_member
            }
            MembershipStatus::Left | MembershipStatus::Kicked | MembershipStatus::Unknown => false,
        }
    }
}

impl Default for MembershipPolicy {
    fn default() -> Self {
        Self {
            restricted_is_member: true,
        }
    }
}

// ── Inline keyboards ──────────────────────────────────────────────────────────

/// A single inline-keyboard button: either an external link or a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineButton {
    Url { text: String, url: String },
    Callback { text: String, data: String },
}

/// Rows of inline buttons attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineKeyboard(pub Vec<Vec<InlineButton>>);

impl InlineKeyboard {
    pub fn rows(&self) -> &[Vec<InlineButton>] {
        &self.0
    }
}

// ── Prompt content ────────────────────────────────────────────────────────────

/// Callback data carried by the "Verify" button.
pub const VERIFY_CALLBACK_DATA: &str = "verify";

/// Reward code length in characters.
pub const CODE_LEN: usize = 8;

/// Charset for generating reward codes (digits).
pub const CODE_CHARSET: &[u8] = b"0123456789";

pub const JOIN_PROMPT_TEXT: &str = "Hello! Join the telegram channel and verify";
pub const RETRY_TEXT: &str = "\u{274c} Try again! Please join the channel first.";
pub const CHECKING_TEXT: &str = "Checking your membership...";

/// Reward message body. Sent with HTML parse mode; the code charset contains
/// no characters that need escaping.
pub fn reward_text(code: &str) -> String {
    format!(
        "\u{1f389} Congratulations! You win a scratch card\n\nYour code: <code>{code}</code>"
    )
}

/// Links shown on the join-and-verify / reward keyboards.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub channel_link: String,
    pub reward_link: String,
}

impl PromptConfig {
    /// Two-row keyboard: channel link, then the "Verify" callback button.
    pub fn join_keyboard(&self) -> InlineKeyboard {
        InlineKeyboard(vec![
            vec![InlineButton::Url {
                text: "Join Channel".to_owned(),
                url: self.channel_link.clone(),
            }],
            vec![InlineButton::Callback {
                text: "\u{2705} Verify".to_owned(),
                data: VERIFY_CALLBACK_DATA.to_owned(),
            }],
        ])
    }

    /// Single reward-link button shown alongside an issued code.
    pub fn reward_keyboard(&self) -> InlineKeyboard {
        InlineKeyboard(vec![vec![InlineButton::Url {
            text: "\u{1f39f}\u{fe0f} Open Scratch Card".to_owned(),
            url: self.reward_link.clone(),
        }]])
    }
}

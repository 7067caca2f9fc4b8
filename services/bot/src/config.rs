/// Bot service configuration loaded from environment variables.
#[derive(Debug)]
pub struct BotConfig {
    /// Telegram bot credential. Env var: `TELEGRAM_TOKEN`.
    pub telegram_token: String,
    /// Designated channel, `@username` or numeric `-100…` id. Env var:
    /// `CHANNEL_ID`.
    pub channel_id: String,
    /// Invite link behind the "Join Channel" button. Derived from an
    /// `@username` channel when `CHANNEL_LINK` is unset.
    pub channel_link: String,
    /// URL behind the reward button. Env var: `REWARD_LINK`.
    pub reward_link: String,
    /// Externally reachable webhook URL, used only by the registration
    /// endpoint. Env var: `WEBHOOK_URL`.
    pub webhook_url: Option<String>,
    /// Shared secret checked against `X-Telegram-Bot-Api-Secret-Token` on
    /// inbound updates. Env var: `WEBHOOK_SECRET`.
    pub webhook_secret: Option<String>,
    /// Whether `restricted` members with the `is_member` flag count as
    /// verified (default true). Env var: `RESTRICTED_IS_MEMBER`.
    pub restricted_is_member: bool,
    /// Ledger file path (default `users.json`). Env var: `LEDGER_PATH`.
    pub ledger_path: String,
    /// Issuance log path (default `logs.txt`). Env var: `ISSUANCE_LOG_PATH`.
    pub issuance_log_path: String,
    /// TCP port to listen on (default 3117). Env var: `BOT_PORT`.
    pub bot_port: u16,
    /// GitHub replication of the issuance log; enabled when both
    /// `MIRROR_GITHUB_TOKEN` and `MIRROR_GITHUB_REPO` are set.
    pub mirror: Option<MirrorConfig>,
}

/// Credentials and target for mirroring the issuance log.
#[derive(Debug)]
pub struct MirrorConfig {
    pub token: String,
    /// `owner/name`.
    pub repo: String,
    /// Env var: `MIRROR_GITHUB_BRANCH` (default `main`).
    pub branch: String,
    /// Path of the mirrored file inside the repository. Env var:
    /// `MIRROR_GITHUB_PATH` (default `logs.txt`).
    pub path: String,
}

impl BotConfig {
    pub fn from_env() -> Self {
        let channel_id = std::env::var("CHANNEL_ID").expect("CHANNEL_ID");
        let channel_link = std::env::var("CHANNEL_LINK")
            .ok()
            .or_else(|| {
                channel_id
                    .strip_prefix('@')
                    .map(|name| format!("https://t.me/{name}"))
            })
            .expect("CHANNEL_LINK (required when CHANNEL_ID is not an @username)");

        let mirror = match (
            std::env::var("MIRROR_GITHUB_TOKEN").ok(),
            std::env::var("MIRROR_GITHUB_REPO").ok(),
        ) {
            (Some(token), Some(repo)) => Some(MirrorConfig {
                token,
                repo,
                branch: std::env::var("MIRROR_GITHUB_BRANCH")
                    .unwrap_or_else(|_| "main".to_owned()),
                path: std::env::var("MIRROR_GITHUB_PATH")
                    .unwrap_or_else(|_| "logs.txt".to_owned()),
            }),
            _ => None,
        };

        Self {
            telegram_token: std::env::var("TELEGRAM_TOKEN").expect("TELEGRAM_TOKEN"),
            channel_id,
            channel_link,
            reward_link: std::env::var("REWARD_LINK")
                .unwrap_or_else(|_| "https://scratchcard.page.gd".to_owned()),
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
            webhook_secret: std::env::var("WEBHOOK_SECRET").ok(),
            restricted_is_member: std::env::var("RESTRICTED_IS_MEMBER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            ledger_path: std::env::var("LEDGER_PATH").unwrap_or_else(|_| "users.json".to_owned()),
            issuance_log_path: std::env::var("ISSUANCE_LOG_PATH")
                .unwrap_or_else(|_| "logs.txt".to_owned()),
            bot_port: std::env::var("BOT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3117),
            mirror,
        }
    }
}

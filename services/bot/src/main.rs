use tracing::info;

use gatekeeper_bot::config::BotConfig;
use gatekeeper_bot::domain::types::{MembershipPolicy, PromptConfig};
use gatekeeper_bot::infra::journal::{FileIssuanceJournal, GithubMirror};
use gatekeeper_bot::infra::store::FileCodeLedger;
use gatekeeper_bot::infra::telegram::TelegramApi;
use gatekeeper_bot::router::build_router;
use gatekeeper_bot::state::AppState;

#[tokio::main]
async fn main() {
    gatekeeper_core::tracing::init_tracing();

    let config = BotConfig::from_env();

    let ledger = FileCodeLedger::load(&config.ledger_path);
    let telegram = TelegramApi::new(&config.telegram_token, &config.channel_id);
    let mirror = config.mirror.as_ref().map(GithubMirror::new);
    let journal = FileIssuanceJournal::new(&config.issuance_log_path, mirror);

    let state = AppState {
        ledger,
        telegram,
        journal,
        policy: MembershipPolicy {
            restricted_is_member: config.restricted_is_member,
        },
        prompt: PromptConfig {
            channel_link: config.channel_link.clone(),
            reward_link: config.reward_link.clone(),
        },
        webhook_url: config.webhook_url.clone(),
        webhook_secret: config.webhook_secret.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.bot_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("bot service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

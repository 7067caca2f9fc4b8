use crate::domain::types::{MembershipPolicy, PromptConfig};
use crate::infra::journal::FileIssuanceJournal;
use crate::infra::store::FileCodeLedger;
use crate::infra::telegram::TelegramApi;
use crate::usecase::dispatch::DispatchUpdateUseCase;
use crate::usecase::issue_code::IssueCodeUseCase;
use crate::usecase::verify::VerifyUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub ledger: FileCodeLedger,
    pub telegram: TelegramApi,
    pub journal: FileIssuanceJournal,
    pub policy: MembershipPolicy,
    pub prompt: PromptConfig,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
}

impl AppState {
    /// Wire the dispatcher over the live Telegram client and file-backed
    /// ledger. The Telegram client serves as both the chat and the
    /// membership port.
    pub fn dispatcher(
        &self,
    ) -> DispatchUpdateUseCase<TelegramApi, TelegramApi, FileCodeLedger, FileIssuanceJournal> {
        DispatchUpdateUseCase {
            chat: self.telegram.clone(),
            verify: VerifyUseCase {
                membership: self.telegram.clone(),
                issue: IssueCodeUseCase {
                    ledger: self.ledger.clone(),
                    journal: self.journal.clone(),
                },
                policy: self.policy,
            },
            prompt: self.prompt.clone(),
        }
    }
}

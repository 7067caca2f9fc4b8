use crate::domain::repository::{CodeLedger, IssuanceJournal, MembershipPort};
use crate::domain::types::MembershipPolicy;
use crate::error::BotServiceError;
use crate::usecase::issue_code::{IssueCodeInput, IssueCodeUseCase, IssuedCode};

pub struct VerifyInput {
    pub user_id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Verified(IssuedCode),
    NotMember,
}

/// Membership check followed by idempotent code issuance.
///
/// A failed `getChatMember` call counts as "not a member" — no retries, the
/// user can simply press Verify again.
pub struct VerifyUseCase<M, L, J>
where
    M: MembershipPort,
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub membership: M,
    pub issue: IssueCodeUseCase<L, J>,
    pub policy: MembershipPolicy,
}

impl<M, L, J> VerifyUseCase<M, L, J>
where
    M: MembershipPort,
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub async fn execute(&self, input: VerifyInput) -> Result<VerifyOutcome, BotServiceError> {
        let status = match self.membership.status_of(input.user_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, user_id = input.user_id, "membership lookup failed");
                return Ok(VerifyOutcome::NotMember);
            }
        };

        if !self.policy.verified(status) {
            return Ok(VerifyOutcome::NotMember);
        }

        let issued = self
            .issue
            .execute(IssueCodeInput {
                user_id: input.user_id,
                username: input.username,
            })
            .await?;

        Ok(VerifyOutcome::Verified(issued))
    }
}

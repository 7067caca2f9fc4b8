use chrono::Utc;
use rand::RngExt;

use crate::domain::repository::{CodeLedger, IssuanceEntry, IssuanceJournal};
use crate::domain::types::{CODE_CHARSET, CODE_LEN, CodeRecord};
use crate::error::BotServiceError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

pub struct IssueCodeInput {
    pub user_id: i64,
    pub username: Option<String>,
}

/// Code handed back to the user, with a flag telling whether this call
/// minted it.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub code: String,
    pub newly_issued: bool,
}

/// `get_or_create` over the ledger: an already-known user gets the stored
/// code back unchanged, a first-time user gets a freshly minted one.
pub struct IssueCodeUseCase<L, J>
where
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub ledger: L,
    pub journal: J,
}

impl<L, J> IssueCodeUseCase<L, J>
where
    L: CodeLedger,
    J: IssuanceJournal,
{
    pub async fn execute(&self, input: IssueCodeInput) -> Result<IssuedCode, BotServiceError> {
        if let Some(existing) = self.ledger.find(input.user_id).await? {
            return Ok(IssuedCode {
                code: existing.code,
                newly_issued: false,
            });
        }

        let record = CodeRecord {
            user_id: input.user_id,
            code: generate_code(),
            username: input.username,
        };

        // The ledger resolves the concurrent-first-issuance race: whichever
        // record got stored is the one every caller hands out.
        let write = self.ledger.insert_if_absent(record).await?;

        if write.newly_issued {
            let entry = IssuanceEntry {
                issued_at: Utc::now(),
                label: write
                    .record
                    .username
                    .clone()
                    .unwrap_or_else(|| write.record.user_id.to_string()),
                code: write.record.code.clone(),
            };
            // Journal trouble never blocks handing the code to the user.
            if let Err(e) = self.journal.record(&entry).await {
                tracing::warn!(error = %e, user_id = write.record.user_id, "issuance journal write failed");
            }
        }

        Ok(IssuedCode {
            code: write.record.code,
            newly_issued: write.newly_issued,
        })
    }
}

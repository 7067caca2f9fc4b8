use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::repository::CodeLedger;
use crate::domain::types::{CodeRecord, LedgerWrite};
use crate::error::BotServiceError;

const TEMP_FILE_SUFFIX: &str = ".tmp";

/// On-disk shape of one ledger entry. The file is a JSON object keyed by the
/// user id as a string, same as the historical `users.json` layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    code: String,
    #[serde(default)]
    username: String,
}

/// Whole-file JSON ledger. The in-memory map is the source of truth; every
/// read-modify-write cycle serializes through one async lock, and each
/// mutation overwrites the full file.
#[derive(Clone)]
pub struct FileCodeLedger {
    path: Arc<PathBuf>,
    records: Arc<Mutex<HashMap<String, StoredRecord>>>,
}

impl FileCodeLedger {
    /// Load the ledger from disk. A missing file is an empty ledger; an
    /// unreadable or corrupt one is logged and also treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "corrupt ledger file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "unreadable ledger file, starting empty");
                HashMap::new()
            }
        };
        Self {
            path: Arc::new(path),
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Overwrite the backing file with the full mapping. Must be called with
    /// the map lock held so saves cannot interleave. A failed save is logged
    /// and swallowed; the in-memory mapping stays authoritative.
    fn persist(&self, records: &HashMap<String, StoredRecord>) {
        if let Err(e) = self.try_persist(records) {
            tracing::warn!(error = %e, path = %self.path.display(), "ledger save failed");
        }
    }

    fn try_persist(&self, records: &HashMap<String, StoredRecord>) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(TEMP_FILE_SUFFIX);
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, self.path.as_ref())?;
        Ok(())
    }
}

fn to_record(user_id: i64, stored: &StoredRecord) -> CodeRecord {
    CodeRecord {
        user_id,
        code: stored.code.clone(),
        username: if stored.username.is_empty() {
            None
        } else {
            Some(stored.username.clone())
        },
    }
}

impl CodeLedger for FileCodeLedger {
    async fn find(&self, user_id: i64) -> Result<Option<CodeRecord>, BotServiceError> {
        let records = self.records.lock().await;
        Ok(records
            .get(&user_id.to_string())
            .map(|stored| to_record(user_id, stored)))
    }

    async fn insert_if_absent(&self, record: CodeRecord) -> Result<LedgerWrite, BotServiceError> {
        let mut records = self.records.lock().await;
        let key = record.user_id.to_string();

        if let Some(existing) = records.get(&key) {
            return Ok(LedgerWrite {
                record: to_record(record.user_id, existing),
                newly_issued: false,
            });
        }

        records.insert(
            key,
            StoredRecord {
                code: record.code.clone(),
                username: record.username.clone().unwrap_or_default(),
            },
        );
        self.persist(&records);

        Ok(LedgerWrite {
            record,
            newly_issued: true,
        })
    }
}

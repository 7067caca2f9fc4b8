use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::SecondsFormat;
use serde::Deserialize;

use crate::config::MirrorConfig;
use crate::domain::repository::{IssuanceEntry, IssuanceJournal};
use crate::error::BotServiceError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
const GITHUB_API: &str = "https://api.github.com";
const MIRROR_COMMIT_MESSAGE: &str = "update issuance log";

fn format_line(entry: &IssuanceEntry) -> String {
    format!(
        "{}\t{}\t{}\n",
        entry.issued_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        entry.label,
        entry.code
    )
}

/// Append-only local issuance log, optionally replicated to a file in a
/// GitHub repository.
#[derive(Clone)]
pub struct FileIssuanceJournal {
    path: PathBuf,
    mirror: Option<GithubMirror>,
}

impl FileIssuanceJournal {
    pub fn new(path: impl Into<PathBuf>, mirror: Option<GithubMirror>) -> Self {
        Self {
            path: path.into(),
            mirror,
        }
    }

    fn append_local(&self, line: &str) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open issuance log {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .context("append issuance log line")?;
        Ok(())
    }
}

impl IssuanceJournal for FileIssuanceJournal {
    async fn record(&self, entry: &IssuanceEntry) -> Result<(), BotServiceError> {
        let line = format_line(entry);
        self.append_local(&line)?;
        if let Some(mirror) = &self.mirror {
            mirror.append(&line).await?;
        }
        Ok(())
    }
}

// ── GitHub mirror ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    content: String,
}

/// Read-modify-write replication of the issuance log through the GitHub
/// contents API.
#[derive(Clone)]
pub struct GithubMirror {
    http: reqwest::Client,
    /// `owner/name`.
    repo: String,
    path: String,
    branch: String,
    token: String,
}

impl GithubMirror {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("create HTTP client"),
            repo: config.repo.clone(),
            path: config.path.clone(),
            branch: config.branch.clone(),
            token: config.token.clone(),
        }
    }

    fn contents_url(&self) -> String {
        format!("{GITHUB_API}/repos/{}/contents/{}", self.repo, self.path)
    }

    pub async fn append(&self, line: &str) -> Result<(), BotServiceError> {
        let (mut content, sha) = self.fetch_current().await?;
        content.push_str(line);
        self.put(&content, sha.as_deref()).await
    }

    /// Current mirrored content plus its blob sha; a 404 means the file does
    /// not exist yet and the first put creates it.
    async fn fetch_current(&self) -> Result<(String, Option<String>), BotServiceError> {
        let response = self
            .http
            .get(self.contents_url())
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "gatekeeper-bot")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .context("fetch mirrored log")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok((String::new(), None));
        }

        let body: ContentsResponse = response
            .error_for_status()
            .context("fetch mirrored log")?
            .json()
            .await
            .context("parse contents response")?;

        // GitHub folds the base64 payload across lines.
        let compact: String = body.content.split_whitespace().collect();
        let decoded = BASE64
            .decode(compact.as_bytes())
            .context("decode mirrored log")?;
        let text = String::from_utf8(decoded).context("mirrored log is not utf-8")?;
        Ok((text, Some(body.sha)))
    }

    async fn put(&self, content: &str, sha: Option<&str>) -> Result<(), BotServiceError> {
        let mut body = serde_json::json!({
            "message": MIRROR_COMMIT_MESSAGE,
            "content": BASE64.encode(content.as_bytes()),
            "branch": self.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = serde_json::json!(sha);
        }

        self.http
            .put(self.contents_url())
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, "gatekeeper-bot")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await
            .context("push mirrored log")?
            .error_for_status()
            .context("push mirrored log")?;
        Ok(())
    }
}

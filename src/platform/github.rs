//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::metadata::{embed_metadata, extract_metadata};
use crate::platform::{
    COMMITS_PER_PAGE, GitService, MetadataStore, PULLS_PER_PAGE, PullRequestService,
};
use crate::types::{CommitComparison, MergeOutcome, PullRequest, RawCommit, RepoConfig};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

// REST response types for the git endpoints octocrab does not wrap

#[derive(Deserialize)]
struct CompareResponse {
    total_commits: usize,
    commits: Vec<CommitEntry>,
}

#[derive(Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Deserialize)]
struct MergeResponse {
    sha: String,
}

impl From<CommitEntry> for RawCommit {
    fn from(entry: CommitEntry) -> Self {
        Self {
            id: entry.sha,
            message: entry.commit.message,
        }
    }
}

/// GitHub service using octocrab for PR operations and raw REST for git data
pub struct GitHubService {
    client: Octocrab,
    repo: RepoConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API host for raw requests
    api_host: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, repo: RepoConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = repo.host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("semantic-pr")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            repo,
            token: token.to_string(),
            http_client,
            api_host,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "https://{}/repos/{}/{}{}",
            self.api_host, self.repo.owner, self.repo.repo, path
        );
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Raw PR body, including the metadata block
    async fn raw_body(&self, pr_number: u64) -> Result<String> {
        let pr = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .get(pr_number)
            .await?;
        Ok(pr.body.unwrap_or_default())
    }

    async fn write_body(&self, pr_number: u64, body: &str, labels: Option<&[String]>) -> Result<()> {
        let issues = self.client.issues(&self.repo.owner, &self.repo.repo);
        let builder = issues.update(pr_number).body(body);
        match labels {
            Some(labels) => builder.labels(labels).send().await?,
            None => builder.send().await?,
        };
        Ok(())
    }
}

/// Read a failed response into an error, keeping GitHub's message
async fn api_error(context: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Error::GitHubApi(format!("{context} failed ({status}): {text}"))
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        head_sha: pr.head.sha.clone(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl GitService for GitHubService {
    async fn compare_commits(&self, base: &str, head: &str) -> Result<CommitComparison> {
        debug!(base, head, "comparing commits");
        let response = self
            .request(Method::GET, &format!("/compare/{base}...{head}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("compare", response).await);
        }

        let data: CompareResponse = response.json().await?;
        let comparison = CommitComparison {
            total_commits: data.total_commits,
            commits: data.commits.into_iter().map(RawCommit::from).collect(),
        };
        debug!(
            total = comparison.total_commits,
            returned = comparison.commits.len(),
            "compared commits"
        );
        Ok(comparison)
    }

    async fn resolve_commit(&self, rev: &str) -> Result<String> {
        debug!(rev, "resolving commit");
        let response = self
            .request(Method::GET, &format!("/commits/{rev}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("resolve commit", response).await);
        }

        let entry: CommitEntry = response.json().await?;
        Ok(entry.sha)
    }

    async fn list_commits(&self, head: &str, page: u32) -> Result<Vec<RawCommit>> {
        debug!(head, page, "listing commits");
        let response = self
            .request(Method::GET, "/commits")
            .query(&[
                ("sha", head.to_string()),
                ("per_page", COMMITS_PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("list commits", response).await);
        }

        let entries: Vec<CommitEntry> = response.json().await?;
        Ok(entries.into_iter().map(RawCommit::from).collect())
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        debug!(branch, sha, "creating ref");
        let response = self
            .request(Method::POST, "/git/refs")
            .json(&json!({ "ref": format!("refs/heads/{branch}"), "sha": sha }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("create ref", response).await);
        }
        debug!(branch, "created ref");
        Ok(())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        debug!(branch, sha, "fast-forwarding ref");
        // The endpoint takes `heads/<branch>`, not `refs/heads/<branch>`
        let response = self
            .request(Method::PATCH, &format!("/git/refs/heads/{branch}"))
            .json(&json!({ "sha": sha, "force": false }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("update ref", response).await);
        }
        debug!(branch, "fast-forwarded ref");
        Ok(())
    }

    async fn merge(&self, base: &str, head: &str, message: &str) -> Result<MergeOutcome> {
        debug!(base, head, "merging branches");
        let response = self
            .request(Method::POST, "/merges")
            .json(&json!({ "base": base, "head": head, "commit_message": message }))
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                let merge: MergeResponse = response.json().await?;
                debug!(sha = %merge.sha, "merge commit created");
                Ok(MergeOutcome::Merged { sha: merge.sha })
            }
            StatusCode::NO_CONTENT => Ok(MergeOutcome::UpToDate),
            StatusCode::CONFLICT => Ok(MergeOutcome::Conflict),
            _ => Err(api_error("merge", response).await),
        }
    }
}

#[async_trait]
impl PullRequestService for GitHubService {
    async fn list_open_prs(&self, base: &str, page: u32) -> Result<Vec<PullRequest>> {
        debug!(base, page, "listing open PRs");
        let prs = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .list()
            .state(octocrab::params::State::Open)
            .base(base)
            .sort(octocrab::params::pulls::Sort::Created)
            .per_page(PULLS_PER_PAGE as u8)
            .page(page)
            .send()
            .await?;

        Ok(prs.items.iter().map(pr_from_octocrab).collect())
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .get(pr_number)
            .await?;
        Ok(pr_from_octocrab(&pr))
    }

    async fn create_pr(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "adding labels");
        self.client
            .issues(&self.repo.owner, &self.repo.repo)
            .add_labels(pr_number, labels)
            .await?;
        Ok(())
    }

    async fn update_pr(&self, pr_number: u64, body: &str, labels: &[String]) -> Result<()> {
        debug!(pr_number, ?labels, "updating PR body and labels");
        // Keep the metadata block; it holds the conflict lock
        let metadata = extract_metadata(&self.raw_body(pr_number).await?);
        let body = embed_metadata(body, &metadata);
        self.write_body(pr_number, &body, Some(labels)).await?;
        debug!(pr_number, "updated PR");
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.repo.owner, &self.repo.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for GitHubService {
    async fn get(&self, pr_number: u64, key: &str) -> Result<Option<serde_json::Value>> {
        let metadata = extract_metadata(&self.raw_body(pr_number).await?);
        Ok(metadata.get(key).cloned())
    }

    async fn set(&self, pr_number: u64, key: &str, value: serde_json::Value) -> Result<()> {
        debug!(pr_number, key, %value, "setting PR metadata");
        let body = self.raw_body(pr_number).await?;
        let mut metadata = extract_metadata(&body);
        metadata.insert(key.to_string(), value);
        self.write_body(pr_number, &embed_metadata(&body, &metadata), None)
            .await
    }
}

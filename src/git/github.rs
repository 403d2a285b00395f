use crate::config::Config;
use crate::domain::branch::{full_ref, lookup_ref};
use crate::domain::SemanticVersion;
use crate::error::{Result, VersionBranchError};
use crate::git::{
    parse_manifest_version, CommitRef, PullRequestBranches, RefStore, RepoSlug, RepositoryReader,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// GitHub REST API backend bound to one repository
pub struct GitHubBackend {
    client: Client,
    api_url: Url,
    raw_url: Url,
    manifest_path: String,
    repo: RepoSlug,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct Commit {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRef<'a> {
    #[serde(rename = "ref")]
    name: &'a str,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct PullRequestSide {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    base: PullRequestSide,
    head: PullRequestSide,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

impl GitHubBackend {
    /// Create a backend for `repo` using the endpoints and timeout from `config`
    pub fn new(config: &Config, repo: RepoSlug, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| VersionBranchError::config(format!("Invalid user_agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("token {token}")).map_err(|_| {
                VersionBranchError::config("GitHub token contains invalid characters")
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VersionBranchError::config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(GitHubBackend {
            client,
            api_url: base_url(&config.api_url, "api_url")?,
            raw_url: base_url(&config.raw_url, "raw_url")?,
            manifest_path: config.manifest_path.trim_start_matches('/').to_string(),
            repo,
        })
    }

    /// API URL under `repos/<owner>/<repo>`; each `/`-separated part of
    /// `path` becomes one percent-encoded segment
    fn repo_url(&self, path: &str) -> Url {
        let repo = ["repos", self.repo.owner.as_str(), self.repo.repo.as_str()];
        with_segments(&self.api_url, repo.into_iter().chain(path.split('/')))
    }

    fn manifest_url(&self, branch: &str) -> Url {
        let segments = [self.repo.owner.as_str(), self.repo.repo.as_str()]
            .into_iter()
            .chain(branch.split('/'))
            .chain(self.manifest_path.split('/'));
        with_segments(&self.raw_url, segments)
    }

    fn api_get(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
    }

    /// Send a request, mapping transport failures to `Network` and
    /// non-success statuses to `Backend` with that status
    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .map_err(|err| VersionBranchError::network(format!("{}: {}", what, err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            return Err(VersionBranchError::backend(
                Some(status.as_u16()),
                format!("{}: {}", what, message),
            ));
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        response
            .json::<T>()
            .map_err(|err| VersionBranchError::backend(None, format!("{}: {}", what, err)))
    }
}

fn base_url(value: &str, field: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| VersionBranchError::config(format!("Invalid {}: {}", field, e)))?;
    if url.cannot_be_a_base() {
        return Err(VersionBranchError::config(format!(
            "Invalid {}: {} cannot hold a path",
            field, value
        )));
    }
    Ok(url)
}

fn with_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

impl RefStore for GitHubBackend {
    fn get_ref(&self, branch: &str) -> Result<CommitRef> {
        let what = format!("get ref {}", lookup_ref(branch));
        let url = self.repo_url(&format!("git/ref/{}", lookup_ref(branch)));
        let response = self.send(self.api_get(url), &what)?;
        let git_ref: GitRef = Self::decode(response, &what)?;

        debug!(reference = %git_ref.name, sha = %git_ref.object.sha, "get ref result");
        Ok(CommitRef::new(git_ref.object.sha))
    }

    fn get_commit(&self, branch: &str) -> Result<CommitRef> {
        let what = format!("get commit {}", full_ref(branch));
        let url = self.repo_url(&format!("commits/{}", full_ref(branch)));
        let response = self.send(self.api_get(url), &what)?;
        let commit: Commit = Self::decode(response, &what)?;

        debug!(sha = %commit.sha, "get commit result");
        Ok(CommitRef::new(commit.sha))
    }

    fn create_ref(&self, branch: &str, sha: &str) -> Result<()> {
        let full = full_ref(branch);
        let what = format!("create ref {}", full);
        let request = self
            .client
            .post(self.repo_url("git/refs"))
            .header(ACCEPT, "application/vnd.github+json")
            .json(&CreateRef { name: &full, sha });
        let response = self.send(request, &what)?;
        let created: GitRef = Self::decode(response, &what)?;

        debug!(reference = %created.name, sha = %created.object.sha, "create ref result");
        Ok(())
    }
}

impl RepositoryReader for GitHubBackend {
    fn fetch_manifest_version(&self, branch: &str) -> Result<SemanticVersion> {
        let url = self.manifest_url(branch);
        let what = format!("fetch {}", url);
        let request = self.client.get(url).header(ACCEPT, "application/json");
        let body = self
            .send(request, &what)?
            .text()
            .map_err(|err| VersionBranchError::network(format!("{}: {}", what, err)))?;

        parse_manifest_version(&body, &format!("{}@{}", self.manifest_path, branch))
    }

    fn fetch_pull_request(&self, number: u64) -> Result<PullRequestBranches> {
        let what = format!("get pull request #{}", number);
        let url = self.repo_url(&format!("pulls/{}", number));
        let response = self.send(self.api_get(url), &what)?;
        let pull: PullRequest = Self::decode(response, &what)?;

        Ok(PullRequestBranches {
            base_branch: pull.base.name,
            head_branch: pull.head.name,
        })
    }
}

use crate::config::Config;
use crate::error::{AnalyzerError, Result};
use crate::tree::{RepositoryTree, TreeEntry};
use async_recursion::async_recursion;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info, warn};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const API_TIMEOUT_SECS: u64 = 30;
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));

/// Identifier of a repository at an optional reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Owner or organization name
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch, tag, or commit to analyze; the default branch when absent
    pub reference: Option<String>,
}

impl RepoId {
    /// Creates an identifier from its parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            reference: None,
        }
    }

    /// Returns a copy pinned to the given reference
    pub fn at(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Parses `owner/repo`, `owner/repo/ref`, or a full GitHub URL
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AnalyzerError::InvalidRepo("empty identifier".into()));
        }

        if input.contains("github.com") {
            return Self::parse_url(input);
        }

        let parts: Vec<&str> = input.split('/').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [owner, repo] => Ok(Self::new(*owner, *repo)),
            [owner, repo, reference] => Ok(Self::new(*owner, *repo).at(*reference)),
            _ => Err(AnalyzerError::InvalidRepo(input.to_string())),
        }
    }

    fn parse_url(input: &str) -> Result<Self> {
        let normalized = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else {
            format!("https://{}", input)
        };

        let url = Url::parse(&normalized)
            .map_err(|e| AnalyzerError::InvalidRepo(format!("{}: {}", input, e)))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [owner, repo, ..] => {
                let repo = repo.trim_end_matches(".git");
                if owner.is_empty() || repo.is_empty() {
                    return Err(AnalyzerError::InvalidRepo(input.to_string()));
                }
                Ok(Self::new(*owner, repo))
            }
            _ => Err(AnalyzerError::InvalidRepo(input.to_string())),
        }
    }

    /// `owner/repo` form used in log lines and error messages
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// License information as reported by the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Human-readable license name
    pub name: String,
    /// SPDX identifier, when GitHub recognizes the license
    #[serde(default)]
    pub spdx_id: Option<String>,
}

/// Repository metadata, sourced verbatim from the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Name of the repository
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Primary programming language
    #[serde(default)]
    pub language: Option<String>,
    /// Topic tags
    #[serde(default)]
    pub topics: Vec<String>,
    /// Star count
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count
    #[serde(default)]
    pub forks_count: u64,
    /// License, when declared
    #[serde(default)]
    pub license: Option<License>,
    /// Default branch name
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// One item of a `contents` listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// A single file body returned by the contents/readme endpoints
#[derive(Debug, Deserialize)]
struct FileContent {
    content: String,
}

/// Client for the GitHub REST API
///
/// Performs plain single-shot requests: no retry, no backoff, no internal
/// rate limiting. Failures map to [`AnalyzerError::NotFound`],
/// [`AnalyzerError::RateLimited`], or [`AnalyzerError::FetchFailed`].
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    api_base: String,
}

impl GitHubClient {
    /// Creates a client from the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.ensure_token()?;
        if config.github_token.is_none() {
            warn!("No GitHub token configured; unauthenticated requests have a lower rate-limit ceiling");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            token: config.github_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", ACCEPT_HEADER)
            .header("User-Agent", USER_AGENT);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        debug!("GET {}", url);
        Ok(request.send().await?)
    }

    /// Fetches repository metadata
    pub async fn get_repository(&self, id: &RepoId) -> Result<RepositoryMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_base, id.owner, id.repo);
        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), &id.slug()));
        }

        let metadata = response.json::<RepositoryMetadata>().await?;
        info!("Fetched metadata for {}", id.slug());
        Ok(metadata)
    }

    /// Fetches and decodes the repository README, if one exists
    pub async fn get_readme(&self, id: &RepoId) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, id.owner, id.repo);
        let response = self.get(&self.with_ref(&url, id)?).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No README found for {}", id.slug());
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response.status(), &id.slug()));
        }

        let file = response.json::<FileContent>().await?;
        decode_content(&file.content).map(Some)
    }

    /// Fetches and parses the repository `package.json`, if one exists
    pub async fn get_package_manifest(&self, id: &RepoId) -> Result<Option<serde_json::Value>> {
        let url = format!(
            "{}/repos/{}/{}/contents/package.json",
            self.api_base, id.owner, id.repo
        );
        let response = self.get(&self.with_ref(&url, id)?).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No package.json found for {}", id.slug());
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response.status(), &id.slug()));
        }

        let file = response.json::<FileContent>().await?;
        let decoded = decode_content(&file.content)?;
        Ok(Some(serde_json::from_str(&decoded)?))
    }

    /// Fetches the flattened file/directory listing of the repository
    ///
    /// Walks the `contents` endpoint directory-by-directory. A directory is
    /// expanded only while its depth is below `max_depth`; beyond the bound
    /// it is listed as an entry but not expanded, which caps the number of
    /// outbound requests. Any non-success status aborts the whole fetch.
    pub async fn fetch_tree(&self, id: &RepoId, max_depth: usize) -> Result<RepositoryTree> {
        let mut entries = Vec::new();
        self.walk_contents(id, "", 0, max_depth, &mut entries)
            .await?;
        info!(
            "Fetched tree for {} ({} entries, depth bound {})",
            id.slug(),
            entries.len(),
            max_depth
        );
        Ok(RepositoryTree::from_entries(entries))
    }

    #[async_recursion]
    async fn walk_contents(
        &self,
        id: &RepoId,
        path: &str,
        depth: usize,
        max_depth: usize,
        out: &mut Vec<TreeEntry>,
    ) -> Result<()> {
        let url = if path.is_empty() {
            format!("{}/repos/{}/{}/contents", self.api_base, id.owner, id.repo)
        } else {
            format!(
                "{}/repos/{}/{}/contents/{}",
                self.api_base, id.owner, id.repo, path
            )
        };

        let response = self.get(&self.with_ref(&url, id)?).await?;
        if !response.status().is_success() {
            let context = if path.is_empty() {
                id.slug()
            } else {
                format!("{}:{}", id.slug(), path)
            };
            return Err(status_error(response.status(), &context));
        }

        let items = response.json::<Vec<ContentItem>>().await?;
        for item in items {
            match item.kind.as_str() {
                "dir" => {
                    out.push(TreeEntry::dir(item.path.clone()));
                    if depth < max_depth {
                        self.walk_contents(id, &item.path, depth + 1, max_depth, out)
                            .await?;
                    }
                }
                // Symlinks and submodules are listed like files
                _ => out.push(TreeEntry::file(item.path)),
            }
        }

        Ok(())
    }

    /// Appends the `ref` query parameter, percent-encoded; branch names may
    /// contain characters that would otherwise corrupt the request URL
    fn with_ref(&self, url: &str, id: &RepoId) -> Result<String> {
        match &id.reference {
            Some(reference) => {
                let mut parsed = Url::parse(url)
                    .map_err(|e| AnalyzerError::Config(format!("Invalid API URL {}: {}", url, e)))?;
                parsed.query_pairs_mut().append_pair("ref", reference);
                Ok(parsed.into())
            }
            None => Ok(url.to_string()),
        }
    }
}

fn status_error(status: StatusCode, context: &str) -> AnalyzerError {
    match status.as_u16() {
        404 => AnalyzerError::NotFound(context.to_string()),
        403 | 429 => AnalyzerError::RateLimited(format!("GitHub returned {} for {}", status, context)),
        code => AnalyzerError::FetchFailed(code),
    }
}

/// Decodes base64 file content as delivered by the contents API, which
/// wraps the payload across multiple lines
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| AnalyzerError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::Decode(e.to_string()))
}

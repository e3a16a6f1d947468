//! Sanity HTTP query API client.
//!
//! ```text
//! GET https://{project}.apicdn.sanity.io/v{version}/data/query/{dataset}
//!       ?query=<GROQ>&perspective=published
//! → { "result": ..., "ms": 12, "query": "..." }
//! ```
//!
//! Published content goes through the CDN host when `cms.use_cdn` is set.
//! Draft mode switches to the `drafts` perspective, which requires a read
//! token and always uses the live API host.

use super::backend::{ContentSource, SourceError};
use super::queries;
use crate::config::CmsConfig;
use crate::content::{Page, Post, Settings, SitemapItem};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Which document versions the query API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Published,
    Drafts,
}

impl Perspective {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Drafts => "drafts",
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

pub struct SanityClient {
    project_id: String,
    dataset: String,
    api_version: String,
    use_cdn: bool,
    perspective: Perspective,
    token: Option<String>,
    client: Client,
}

impl SanityClient {
    /// Build a client from `[cms]` config, reading the draft token from the
    /// process environment.
    pub fn from_config(cms: &CmsConfig, draft_mode: bool) -> Result<Self, SourceError> {
        Self::from_config_with(cms, draft_mode, |key| std::env::var(key).ok())
    }

    fn from_config_with(
        cms: &CmsConfig,
        draft_mode: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SourceError> {
        if cms.project_id.trim().is_empty() {
            return Err(SourceError::MissingProjectId);
        }

        let (perspective, token) = if draft_mode {
            let token = lookup(&cms.token_env)
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| SourceError::MissingToken(cms.token_env.clone()))?;
            info!("draft mode: querying drafts perspective");
            (Perspective::Drafts, Some(token))
        } else {
            (Perspective::Published, None)
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(cms.timeout_secs))
            .user_agent(concat!("bodymetrics-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            project_id: cms.project_id.trim().to_string(),
            dataset: cms.dataset.clone(),
            api_version: cms.api_version.trim_start_matches('v').to_string(),
            // Drafts are never cached on the CDN.
            use_cdn: cms.use_cdn && !draft_mode,
            perspective,
            token,
            client,
        })
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    fn host(&self) -> String {
        let api = if self.use_cdn { "apicdn" } else { "api" };
        format!("https://{}.{api}.sanity.io", self.project_id)
    }

    /// Full query URL with the GROQ text and perspective as parameters.
    pub fn query_url(&self, query: &str) -> Result<Url, SourceError> {
        let base = format!(
            "{}/v{}/data/query/{}",
            self.host(),
            self.api_version,
            self.dataset
        );
        Ok(Url::parse_with_params(
            &base,
            &[("query", query), ("perspective", self.perspective.as_str())],
        )?)
    }

    fn query<T: DeserializeOwned>(&self, name: &str, query: &str) -> Result<T, SourceError> {
        let url = self.query_url(query)?;
        debug!(query = name, host = %self.host(), "CMS query");

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode_response(status, &body)
    }
}

/// Decode a query API response body, surfacing non-2xx statuses as errors.
fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, SourceError> {
    if !(200..300).contains(&status) {
        return Err(SourceError::Status {
            status,
            body: body.chars().take(500).collect(),
        });
    }
    let parsed: QueryResponse<T> = serde_json::from_str(body)?;
    Ok(parsed.result)
}

impl ContentSource for SanityClient {
    fn settings(&self) -> Result<Settings, SourceError> {
        let settings: Option<Settings> = self.query("settings", queries::SETTINGS_QUERY)?;
        Ok(settings.unwrap_or_default())
    }

    fn posts(&self) -> Result<Vec<Post>, SourceError> {
        let posts: Option<Vec<Post>> = self.query("posts", queries::POSTS_QUERY)?;
        Ok(posts.unwrap_or_default())
    }

    fn pages(&self) -> Result<Vec<Page>, SourceError> {
        let pages: Option<Vec<Page>> = self.query("pages", queries::PAGES_QUERY)?;
        Ok(pages.unwrap_or_default())
    }

    fn sitemap_items(&self) -> Result<Vec<SitemapItem>, SourceError> {
        let items: Option<Vec<SitemapItem>> = self.query("sitemap", queries::SITEMAP_QUERY)?;
        Ok(items.unwrap_or_default())
    }

    fn describe(&self) -> String {
        format!(
            "Sanity {}/{} ({})",
            self.project_id,
            self.dataset,
            self.perspective.as_str()
        )
    }
}

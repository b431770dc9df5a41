// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use failure::Error;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::ReportError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Password GitHub expects when a token is sent as the basic-auth user name.
const TOKEN_PASSWORD: &str = "x-oauth-basic";

const PER_PAGE: &str = "100";

lazy_static! {
    static ref NEXT_LINK: Regex =
        Regex::new(r#"<([^>]*)>\s*;\s*rel="next""#).expect("valid link pattern");
}

/// Anything that can list the pull requests of a repository.
pub trait PullRequestSource {
    /// Checks the credentials, returning the authenticated login.
    fn verify_credentials(&self, logger: &slog::Logger) -> Result<String, Error>;

    /// Every pull request of `org/repo`, in any state, across all pages.
    fn pull_requests(
        &self,
        org: &str,
        repo: &str,
        logger: &slog::Logger,
    ) -> Result<Vec<PullRequest>, Error>;
}

pub struct GitHubApiBasicAuth {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubApiBasicAuth {
    pub fn new(api_url: &str, token: String) -> Result<GitHubApiBasicAuth, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(GitHubApiBasicAuth {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn get_json(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(url)
            .basic_auth(self.token.clone(), Some(TOKEN_PASSWORD))
            .send()
    }

    pub fn pulls_url(&self, org: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/pulls?state=all&per_page={}",
            self.api_url, org, repo, PER_PAGE
        )
    }

    fn get_page<T>(&self, url: &str, logger: &slog::Logger) -> Result<Page<T>, Error>
    where
        T: serde::de::DeserializeOwned + Debug,
    {
        let mut response = self
            .get_json(url)
            .and_then(|response| response.error_for_status())
            .map_err(|e| ReportError::Fetch(e.to_string()))?;
        trace!(logger, "Response: {:?}", response);

        let next = response
            .headers()
            .get(LINK)
            .and_then(|link| link.to_str().ok())
            .and_then(next_page_url);
        let text = response
            .text()
            .map_err(|e| ReportError::Fetch(e.to_string()))?;
        trace!(logger, "Response text: {}", text);
        let values = serde_json::from_str(text.as_str())
            .map_err(|e| {
                ReportError::Fetch(format!("unexpected response from {}: {}", url, e))
            })?;

        Ok(Page { values, next })
    }
}

impl PullRequestSource for GitHubApiBasicAuth {
    fn verify_credentials(&self, logger: &slog::Logger) -> Result<String, Error> {
        let url = format!("{}/user", self.api_url);
        debug!(logger, "Verifying token"; "url" => url.as_str());

        let mut response = self
            .get_json(url.as_str())
            .map_err(|e| ReportError::Authentication(e.to_string()))?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ReportError::Authentication(format!(
                    "token rejected ({})",
                    response.status()
                ))
                .into());
            }
            status if !status.is_success() => {
                return Err(ReportError::Authentication(format!(
                    "unexpected status {}",
                    status
                ))
                .into());
            }
            _ => {}
        }

        let user: User = response
            .json()
            .map_err(|e| ReportError::Authentication(e.to_string()))?;
        Ok(user.login)
    }

    fn pull_requests(
        &self,
        org: &str,
        repo: &str,
        logger: &slog::Logger,
    ) -> Result<Vec<PullRequest>, Error> {
        let url = self.pulls_url(org, repo);
        get_all(url.as_str(), |page_url| self.get_page(page_url, logger), logger)
    }
}

#[derive(Deserialize, PartialEq, Debug, Clone)]
pub struct User {
    pub login: String,
}

#[derive(Deserialize, PartialEq, Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub state: String,
}

impl PullRequest {
    pub fn body(&self) -> &str {
        self.body.as_ref().map(String::as_str).unwrap_or("")
    }
}

/// One page of a listing plus the URL of the page after it.
#[derive(PartialEq, Debug, Clone)]
pub struct Page<T> {
    pub values: Vec<T>,
    pub next: Option<String>,
}

impl<T> Page<T>
where
    T: Debug,
{
    /// Follows `next` links until the listing is exhausted.
    pub fn unpaginate<F>(self, fetch_page: F, logger: &slog::Logger) -> Result<Vec<T>, Error>
    where
        F: Fn(&str) -> Result<Page<T>, Error>,
    {
        let mut current = self;

        let mut res: Vec<T> = Vec::new();
        res.append(&mut current.values);

        while let Some(next_url) = current.next {
            debug!(logger, "Requesting next page: {}", next_url);
            current = fetch_page(next_url.as_str())?;
            trace!(logger, "Page: {:?}", current);
            res.append(&mut current.values);
        }

        Ok(res)
    }
}

/// Every value of the listing starting at `url`.
pub fn get_all<T, F>(url: &str, fetch_page: F, logger: &slog::Logger) -> Result<Vec<T>, Error>
where
    T: Debug,
    F: Fn(&str) -> Result<Page<T>, Error>,
{
    let logger = logger.new(o!(
        "url" => url.to_string(),
    ));

    trace!(logger, "Obtaining first page");
    let first_page = fetch_page(url)?;

    trace!(logger, "Getting remaining pages");
    first_page.unpaginate(fetch_page, &logger)
}

/// The `rel="next"` target of an RFC 8288 `Link` header, if any.
pub fn next_page_url(link_header: &str) -> Option<String> {
    NEXT_LINK
        .captures(link_header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use structopt::StructOpt;

use crate::csv_sink::DEFAULT_OUTPUT_FILE;
use crate::error::ReportError;
use crate::github::DEFAULT_API_URL;
use crate::report::{DateWindow, DATE_FORMAT};

/// Raw options, from the command line or the environment.
///
/// Everything is optional here so that a missing value is reported by
/// [`Config::from_opt`] rather than by the argument parser.
#[derive(StructOpt, Debug, Default)]
#[structopt()]
pub struct Opt {
    #[structopt(
        long = "github-api-token",
        env = "GITHUB_API_TOKEN",
        raw(hide_env_values = "true")
    )]
    pub github_api_token: Option<String>,
    #[structopt(long = "github-api-url", env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,
    #[structopt(short = "o", long = "org", env = "ORG_NAME")]
    pub org_name: Option<String>,
    #[structopt(short = "r", long = "repo", env = "REPO_NAME")]
    pub repo_name: Option<String>,
    /// MM/DD/YYYY, no lower bound when unset
    #[structopt(short = "s", long = "start-date", env = "START_DATE")]
    pub start_date: Option<String>,
    /// MM/DD/YYYY, defaults to now
    #[structopt(short = "e", long = "end-date", env = "END_DATE")]
    pub end_date: Option<String>,
    #[structopt(short = "f", long = "output-file", env = "OUTPUT_FILE")]
    pub output_file: Option<String>,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u64,
}

/// Validated settings for one run.
#[derive(PartialEq, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub organization: String,
    pub repository: String,
    pub window: DateWindow,
    pub output_file: PathBuf,
}

impl Config {
    pub fn from_opt(opt: Opt, now: DateTime<Utc>) -> Result<Config, ReportError> {
        let token = required(opt.github_api_token, "GITHUB_API_TOKEN")?;
        let organization = required(opt.org_name, "ORG_NAME")?;
        let repository = required(opt.repo_name, "REPO_NAME")?;

        let start = optional_date(opt.start_date)?;
        let end = optional_date(opt.end_date)?;
        let window = DateWindow::new(start, end, now);

        let api_url =
            non_empty(opt.github_api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let output_file = non_empty(opt.output_file)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        Ok(Config {
            token,
            api_url,
            organization,
            repository,
            window,
            output_file,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("organization", &self.organization)
            .field("repository", &self.repository)
            .field("window", &self.window)
            .field("output_file", &self.output_file)
            .finish()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ReportError::Configuration(format!(
            "invalid date {:?}, expected MM/DD/YYYY: {}",
            value, e
        ))
    })
}

fn optional_date(value: Option<String>) -> Result<Option<NaiveDate>, ReportError> {
    match non_empty(value) {
        Some(date) => parse_date(&date).map(Some),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, ReportError> {
    non_empty(value).ok_or_else(|| ReportError::Configuration(format!("{} not set", name)))
}

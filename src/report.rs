// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use chrono::{DateTime, NaiveDate, Utc};
use failure::Error;

use crate::github::{PullRequest, PullRequestSource};
use crate::tickets::extract_tickets;

/// Date format used both for configuration and for the report.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// One row of the report.
///
/// `tickets` holds the raw pull request description until the record has
/// been through [`assemble`], and the `;`-joined ticket list afterwards.
#[derive(PartialEq, Debug, Clone)]
pub struct PullRequestRecord {
    pub organization: String,
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub created_date: NaiveDate,
    pub tickets: String,
}

impl PullRequestRecord {
    pub fn new(organization: &str, repository: &str, pr: PullRequest) -> PullRequestRecord {
        let tickets = pr.body().to_string();
        PullRequestRecord {
            organization: organization.to_string(),
            repository: repository.to_string(),
            number: pr.number,
            title: pr.title,
            created_date: pr.created_at.naive_utc().date(),
            tickets,
        }
    }

    /// The six report columns, in output order.
    pub fn fields(&self) -> [String; 6] {
        [
            self.organization.clone(),
            self.repository.clone(),
            self.number.to_string(),
            self.title.clone(),
            self.created_date.format(DATE_FORMAT).to_string(),
            self.tickets.clone(),
        ]
    }
}

/// Open interval of creation timestamps a pull request must fall into.
/// A window without a start has no lower bound.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window from midnight UTC of `start` to midnight UTC of `end`, or to
    /// `now` when there is no end date.
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> DateWindow {
        DateWindow {
            start: start.map(midnight_utc),
            end: end.map(midnight_utc).unwrap_or(now),
        }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *timestamp > start) && *timestamp < self.end
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_utc(date.and_hms(0, 0, 0), Utc)
}

/// Pull requests kept for the report, and who the listing was made as.
#[derive(PartialEq, Debug, Clone)]
pub struct Report {
    pub login: String,
    pub records: Vec<PullRequestRecord>,
}

/// Lists every pull request of `org/repo` and keeps those created inside
/// `window`, with their descriptions still raw.
pub fn fetch_records<S>(
    source: &S,
    org: &str,
    repo: &str,
    window: &DateWindow,
    logger: &slog::Logger,
) -> Result<Report, Error>
where
    S: PullRequestSource,
{
    let logger = logger.new(o!(
        "org" => org.to_string(),
        "repo" => repo.to_string(),
    ));

    let login = source.verify_credentials(&logger)?;
    info!(logger, "User authenticated"; "login" => login.as_str());

    debug!(logger, "Obtaining pull requests");
    let pull_requests = source.pull_requests(org, repo, &logger)?;
    debug!(logger, "Obtained pull requests"; "count" => pull_requests.len());

    let records: Vec<PullRequestRecord> = pull_requests
        .into_iter()
        .filter(|pr| {
            let keep = window.contains(&pr.created_at);
            trace!(logger, "PR {} created {}", pr.number, pr.created_at; "keep" => keep);
            keep
        })
        .map(|pr| PullRequestRecord::new(org, repo, pr))
        .collect();
    info!(logger, "Pull requests in date window"; "count" => records.len());

    Ok(Report { login, records })
}

/// Replaces every record's raw description with the tickets it mentions.
pub fn assemble(records: &mut [PullRequestRecord], logger: &slog::Logger) {
    for record in records.iter_mut() {
        let tickets = extract_tickets(&[record.tickets.as_str()]);
        debug!(logger, "Unique IDs parsed";
            "pr_number" => record.number,
            "tickets" => tickets.as_str()
        );
        record.tickets = tickets;
    }
}

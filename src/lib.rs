// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate chrono;
extern crate csv;
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
extern crate regex;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate slog;
extern crate structopt;

pub mod config;
pub mod csv_sink;
pub mod error;
pub mod github;
pub mod report;
pub mod tickets;

use failure::Error;

use config::Config;
use github::PullRequestSource;
use report::Report;

/// Fetches the pull requests in the configured window, reduces their
/// descriptions to ticket lists and writes the CSV report.
pub fn run<S>(
    config: &Config,
    source: &S,
    logger: &slog::Logger,
) -> Result<Report, Error>
where
    S: PullRequestSource,
{
    debug!(logger, "Configuration: {:?}", config);

    let mut fetched = report::fetch_records(
        source,
        &config.organization,
        &config.repository,
        &config.window,
        logger,
    )?;
    trace!(logger, "Records: {:?}", fetched.records);

    report::assemble(&mut fetched.records, logger);

    csv_sink::write_records(&config.output_file, &fetched.records, logger)?;

    Ok(fetched)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate chrono;
extern crate dotenv;
extern crate failure;
extern crate pr_ticket_report;
#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_bunyan;
extern crate structopt;

use std::process;

use chrono::Utc;
use failure::Error;
use slog::Drain;
use structopt::StructOpt;

use pr_ticket_report::config::{Config, Opt};
use pr_ticket_report::error;
use pr_ticket_report::github::GitHubApiBasicAuth;

fn app(config: &Config, logger: &slog::Logger) -> Result<(), Error> {
    debug!(logger, "Starting application");
    let client = GitHubApiBasicAuth::new(&config.api_url, config.token.clone())?;

    let report = pr_ticket_report::run(config, &client, logger)?;
    debug!(logger, "Report finished"; "records" => report.records.len());

    println!("User authenticated: {}", report.login);
    println!("Created CSV file: {}", config.output_file.display());
    Ok(())
}

fn log_level(verbose: u64) -> slog::Level {
    match verbose {
        0 => slog::Level::Warning,
        1 => slog::Level::Info,
        2 => slog::Level::Debug,
        _ => slog::Level::Trace,
    }
}

fn run_main() -> i32 {
    let dotenv = dotenv::dotenv();
    let opt = Opt::from_args();

    let drain = slog_bunyan::default(std::io::stderr()).fuse();
    let (drain, _guard) = slog_async::Async::new(drain).build_with_guard();
    let drain = slog::LevelFilter::new(drain.fuse(), log_level(opt.verbose)).fuse();
    let logger = slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")));

    match dotenv {
        Ok(path) => debug!(logger, "Loaded environment file"; "path" => path.display().to_string()),
        Err(e) => debug!(logger, "No environment file loaded: {}", e),
    }

    let result = Config::from_opt(opt, Utc::now())
        .map_err(Error::from)
        .and_then(|config| app(&config, &logger));

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!(logger, "{}", err);
            eprintln!("{}", err);
            for cause in err.iter_causes() {
                eprintln!("  caused by: {}", cause);
            }
            error::exit_code(&err)
        }
    }
}

fn main() {
    process::exit(run_main());
}

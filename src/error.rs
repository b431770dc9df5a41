// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use failure::Fail;

/// Every way a report run can fail. None of them is recovered from.
#[derive(Debug, Fail, PartialEq, Clone)]
pub enum ReportError {
    #[fail(display = "configuration error: {}", _0)]
    Configuration(String),
    #[fail(display = "error authenticating with GitHub: {}", _0)]
    Authentication(String),
    #[fail(display = "error getting list of PRs: {}", _0)]
    Fetch(String),
    #[fail(display = "error writing report: {}", _0)]
    Write(String),
}

impl ReportError {
    pub fn exit_code(&self) -> i32 {
        match *self {
            ReportError::Configuration(_) => 2,
            _ => 1,
        }
    }
}

/// Exit code for an arbitrary error reaching the top-level handler.
pub fn exit_code(err: &failure::Error) -> i32 {
    err.downcast_ref::<ReportError>()
        .map(ReportError::exit_code)
        .unwrap_or(1)
}

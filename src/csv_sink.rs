// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use failure::Error;

use crate::error::ReportError;
use crate::report::PullRequestRecord;

pub const DEFAULT_OUTPUT_FILE: &str = "bugs_in_prs.csv";

/// Writes `records` as header-less CSV to `path`, replacing any existing file.
pub fn write_records(
    path: &Path,
    records: &[PullRequestRecord],
    logger: &slog::Logger,
) -> Result<(), Error> {
    let logger = logger.new(o!(
        "path" => path.display().to_string(),
    ));

    debug!(logger, "Creating output file");
    let file = File::create(path)
        .map_err(|e| ReportError::Write(format!("cannot create {}: {}", path.display(), e)))?;
    write_to(file, records)
        .map_err(|e| ReportError::Write(format!("cannot write {}: {}", path.display(), e)))?;
    info!(logger, "Wrote records"; "count" => records.len());

    Ok(())
}

/// Writes `records` as header-less CSV rows to `writer`.
pub fn write_to<W: Write>(writer: W, records: &[PullRequestRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for record in records {
        writer.write_record(&record.fields())?;
    }
    writer.flush()?;
    Ok(())
}

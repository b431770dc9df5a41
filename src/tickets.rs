// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use itertools::Itertools;
use regex::Regex;

/// Separator between ticket identifiers in the report.
pub const TICKET_SEPARATOR: &str = ";";

lazy_static! {
    static ref TICKET_ID: Regex =
        Regex::new(r"[A-Z]{2,5}-[0-9]+").expect("valid ticket pattern");
}

/// All ticket identifiers (`ABC-123`) found in `texts`, in first-seen order,
/// without duplicates, joined with `;`. No matches gives an empty string.
pub fn extract_tickets<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let texts: Vec<S> = texts.into_iter().collect();
    texts
        .iter()
        .flat_map(|text| TICKET_ID.find_iter(text.as_ref()))
        .map(|m| m.as_str())
        .unique()
        .join(TICKET_SEPARATOR)
}
